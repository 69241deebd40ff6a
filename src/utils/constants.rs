/// LP fee rate applied when a pool record carries none (0.3%)
pub const DEFAULT_LP_FEE: &str = "0.003";

/// DAO fee rate applied when a pool record carries none
pub const DEFAULT_DAO_FEE: &str = "0";

/// Hop bound used by the arbitrage driver
pub const DEFAULT_MAX_HOPS: usize = 5;

/// Seconds between scan passes in watch mode
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 30;
