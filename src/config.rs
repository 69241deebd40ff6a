use std::env;
use std::str::FromStr;

use alloy::primitives::U256;
use eyre::{Result, WrapErr};

use crate::arb::route::GasMultipliers;
use crate::utils::constants::{DEFAULT_MAX_HOPS, DEFAULT_SCAN_INTERVAL_SECS};

/// Runtime configuration, read from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    /// Path of the pool snapshot JSON
    pub pools_path: String,
    /// Path of the token config JSON
    pub tokens_path: String,
    /// Path of the borrowables JSON
    pub borrowables_path: String,
    /// Path of the trade sizes JSON
    pub trade_sizes_path: String,
    /// Hop bound for route enumeration
    pub max_hops: usize,
    /// Raw profit the repay step demands on top of the borrow
    pub minimum_profit: U256,
    /// Gas multipliers summed per hop kind
    pub gas_multipliers: GasMultipliers,
    /// Seconds between scan passes in watch mode
    pub scan_interval_secs: u64,
}

impl Config {
    /// Read the configuration from the environment.
    ///
    /// # Errors
    /// * If a numeric variable does not parse
    pub fn from_env() -> Result<Self> {
        let defaults = GasMultipliers::default();
        Ok(Self {
            pools_path: var_or("POOLS_PATH", "snapshots/pools.json"),
            tokens_path: var_or("TOKENS_PATH", "snapshots/tokens.json"),
            borrowables_path: var_or("BORROWABLES_PATH", "snapshots/borrowables.json"),
            trade_sizes_path: var_or("TRADE_SIZES_PATH", "snapshots/trade_sizes.json"),
            max_hops: parse_var("MAX_HOPS", DEFAULT_MAX_HOPS)?,
            minimum_profit: parse_var("MINIMUM_PROFIT", U256::ZERO)?,
            gas_multipliers: GasMultipliers {
                stable: parse_var("GAS_MULTIPLIER_STABLE", defaults.stable)?,
                constant_product: parse_var(
                    "GAS_MULTIPLIER_CONSTANT_PRODUCT",
                    defaults.constant_product,
                )?,
            },
            scan_interval_secs: parse_var("SCAN_INTERVAL_SECS", DEFAULT_SCAN_INTERVAL_SECS)?,
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .wrap_err_with(|| format!("{name} is not a valid value: {value}")),
        Err(_) => Ok(default),
    }
}
