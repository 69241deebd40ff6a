/// Indexer snapshot records and conversions into engine types
pub mod snapshot;
