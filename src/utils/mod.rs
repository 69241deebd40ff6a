/// Constants
pub mod constants;
/// Logger setup
pub mod logger;
