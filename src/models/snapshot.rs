//! Records as they arrive from the indexer, and their conversions into
//! engine types.
//!
//! Raw amounts travel as decimal strings; the indexer serialises 256-bit
//! integers that way. Malformed records fail the whole load: a snapshot
//! with holes in it is not worth searching.

use std::collections::HashMap;
use std::str::FromStr;

use alloy::primitives::U256;
use eyre::{Result, WrapErr};
use serde::Deserialize;

use crate::arb::decimal::Dec;
use crate::arb::driver::{Borrowable, TradeSize};
use crate::arb::pool::{Pool, PoolCore, StableParams};
use crate::arb::types::{Token, TokenAddress};
use crate::utils::constants::{DEFAULT_DAO_FEE, DEFAULT_LP_FEE};

/// A pool as the indexer reports it. `stable_params` present means a
/// stable pool; absent means constant-product.
#[derive(Clone, Debug, Deserialize)]
pub struct PoolRecord {
    /// The address of the pool
    pub address: String,
    /// The address of the first token
    pub token0: String,
    /// The address of the second token
    pub token1: String,
    /// Raw reserve of the first token, as a decimal string
    pub amount0: String,
    /// Raw reserve of the second token, as a decimal string
    pub amount1: String,
    /// LP fee rate; the default fee applies when absent
    #[serde(default)]
    pub lp_fee: Option<String>,
    /// DAO fee rate; zero when absent
    #[serde(default)]
    pub dao_fee: Option<String>,
    /// Stable-curve parameters
    #[serde(default)]
    pub stable_params: Option<StableParamsRecord>,
}

/// Stable-curve parameters as the indexer reports them.
#[derive(Clone, Debug, Deserialize)]
pub struct StableParamsRecord {
    /// Oracle price of token1 in token0 units; absent while the feed is down
    #[serde(default)]
    pub price_ratio: Option<String>,
    /// Slippage scale
    pub alpha: String,
    /// Steepness at or below equilibrium
    pub gamma1: String,
    /// Steepness above equilibrium
    pub gamma2: String,
    /// Trade floor for token0 → token1 swaps
    pub min_trade_size_0_to_1: String,
    /// Trade floor for token1 → token0 swaps
    pub min_trade_size_1_to_0: String,
    /// Price impact cap in percent
    pub max_price_impact: String,
}

/// A token config entry.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenRecord {
    /// The address of the token
    pub address: String,
    /// The number of decimals
    pub decimals: u8,
}

/// A borrowable token entry.
#[derive(Clone, Debug, Deserialize)]
pub struct BorrowableRecord {
    /// The address of the token
    pub token: String,
    /// Key of the token's price feed
    pub oracle_key: String,
    /// The number of decimals
    pub decimals: u8,
}

/// Borrow limit and oracle price for one borrowable.
#[derive(Clone, Debug, Deserialize)]
pub struct TradeSizeRecord {
    /// The address of the token
    pub token: String,
    /// Maximum raw borrow, as a decimal string
    pub trade_size: String,
    /// Oracle price of the token
    pub price: String,
}

impl TryFrom<PoolRecord> for Pool {
    type Error = eyre::Report;

    fn try_from(record: PoolRecord) -> Result<Self> {
        let core = PoolCore {
            amount0: parse_raw(&record.amount0)
                .wrap_err_with(|| format!("pool {}: bad amount0", record.address))?,
            amount1: parse_raw(&record.amount1)
                .wrap_err_with(|| format!("pool {}: bad amount1", record.address))?,
            lp_fee: parse_fee(record.lp_fee.as_deref(), DEFAULT_LP_FEE)
                .wrap_err_with(|| format!("pool {}: bad lp_fee", record.address))?,
            dao_fee: parse_fee(record.dao_fee.as_deref(), DEFAULT_DAO_FEE)
                .wrap_err_with(|| format!("pool {}: bad dao_fee", record.address))?,
            address: record.address,
            token0: record.token0,
            token1: record.token1,
        };

        match record.stable_params {
            Some(params) => Ok(Self::Stable(core, params.try_into()?)),
            None => Ok(Self::ConstantProduct(core)),
        }
    }
}

impl TryFrom<StableParamsRecord> for StableParams {
    type Error = eyre::Report;

    fn try_from(record: StableParamsRecord) -> Result<Self> {
        let price_ratio = match record.price_ratio.as_deref() {
            Some(ratio) => Some(parse_dec(ratio).wrap_err("bad price_ratio")?),
            None => None,
        };
        Ok(Self {
            price_ratio,
            alpha: parse_dec(&record.alpha).wrap_err("bad alpha")?,
            gamma1: parse_dec(&record.gamma1).wrap_err("bad gamma1")?,
            gamma2: parse_dec(&record.gamma2).wrap_err("bad gamma2")?,
            min_trade_size_0_to_1: parse_dec(&record.min_trade_size_0_to_1)
                .wrap_err("bad min_trade_size_0_to_1")?,
            min_trade_size_1_to_0: parse_dec(&record.min_trade_size_1_to_0)
                .wrap_err("bad min_trade_size_1_to_0")?,
            max_price_impact: parse_dec(&record.max_price_impact)
                .wrap_err("bad max_price_impact")?,
        })
    }
}

impl From<TokenRecord> for Token {
    fn from(record: TokenRecord) -> Self {
        Self::new(record.address, record.decimals)
    }
}

impl From<BorrowableRecord> for Borrowable {
    fn from(record: BorrowableRecord) -> Self {
        Self {
            token: record.token,
            oracle_key: record.oracle_key,
            decimals: record.decimals,
        }
    }
}

/// Convert the pool records of one snapshot.
///
/// # Errors
/// Returns the first conversion failure; a partial snapshot is not searched.
pub fn pools_from_records(records: Vec<PoolRecord>) -> Result<Vec<Pool>> {
    records.into_iter().map(Pool::try_from).collect()
}

/// Convert the token config records.
#[must_use]
pub fn tokens_from_records(records: Vec<TokenRecord>) -> Vec<Token> {
    records.into_iter().map(Token::from).collect()
}

/// Convert the borrowable records.
#[must_use]
pub fn borrowables_from_records(records: Vec<BorrowableRecord>) -> Vec<Borrowable> {
    records.into_iter().map(Borrowable::from).collect()
}

/// Convert the trade-size records into the driver's lookup map.
///
/// # Errors
/// Returns the first record with an unparseable size or price.
pub fn trade_sizes_from_records(
    records: Vec<TradeSizeRecord>,
) -> Result<HashMap<TokenAddress, TradeSize>> {
    records
        .into_iter()
        .map(|record| {
            let amount = parse_raw(&record.trade_size)
                .wrap_err_with(|| format!("trade size for {}: bad amount", record.token))?;
            let price = parse_dec(&record.price)
                .wrap_err_with(|| format!("trade size for {}: bad price", record.token))?;
            Ok((record.token, TradeSize { amount, price }))
        })
        .collect()
}

fn parse_raw(value: &str) -> Result<U256> {
    U256::from_str(value).wrap_err_with(|| format!("not a raw amount: {value}"))
}

fn parse_dec(value: &str) -> Result<Dec> {
    Dec::from_str(value).wrap_err_with(|| format!("not a decimal: {value}"))
}

fn parse_fee(value: Option<&str>, default: &str) -> Result<Dec> {
    parse_dec(value.unwrap_or(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_product_pool_with_default_fees() {
        let record: PoolRecord = serde_json::from_str(
            r#"{
                "address": "pool1",
                "token0": "tokenA",
                "token1": "tokenB",
                "amount0": "1000000",
                "amount1": "2000000"
            }"#,
        )
        .unwrap();
        let pool = Pool::try_from(record).unwrap();

        let Pool::ConstantProduct(core) = &pool else {
            panic!("expected a constant-product pool");
        };
        assert_eq!(core.amount0, U256::from(1_000_000u64));
        assert_eq!(core.lp_fee, Dec::from_str("0.003").unwrap());
        assert_eq!(core.dao_fee, Dec::from_str("0").unwrap());
    }

    #[test]
    fn test_stable_pool_record() {
        let record: PoolRecord = serde_json::from_str(
            r#"{
                "address": "pool2",
                "token0": "tokenA",
                "token1": "tokenB",
                "amount0": "1000000000000",
                "amount1": "1000000000000",
                "lp_fee": "0.002",
                "dao_fee": "0.001",
                "stable_params": {
                    "price_ratio": "1",
                    "alpha": "10",
                    "gamma1": "4",
                    "gamma2": "5",
                    "min_trade_size_0_to_1": "0.0001",
                    "min_trade_size_1_to_0": "0.0001",
                    "max_price_impact": "1.5"
                }
            }"#,
        )
        .unwrap();
        let pool = Pool::try_from(record).unwrap();

        let Pool::Stable(core, params) = &pool else {
            panic!("expected a stable pool");
        };
        assert_eq!(core.lp_fee, Dec::from_str("0.002").unwrap());
        assert_eq!(params.price_ratio, Some(Dec::from(1)));
        assert_eq!(params.gamma2, Dec::from(5));
    }

    #[test]
    fn test_missing_oracle_price_is_preserved() {
        let record: StableParamsRecord = serde_json::from_str(
            r#"{
                "alpha": "10",
                "gamma1": "4",
                "gamma2": "5",
                "min_trade_size_0_to_1": "0",
                "min_trade_size_1_to_0": "0",
                "max_price_impact": "1"
            }"#,
        )
        .unwrap();
        let params = StableParams::try_from(record).unwrap();
        assert_eq!(params.price_ratio, None);
    }

    #[test]
    fn test_bad_amount_fails_the_load() {
        let records = vec![PoolRecord {
            address: "pool1".to_string(),
            token0: "tokenA".to_string(),
            token1: "tokenB".to_string(),
            amount0: "not-a-number".to_string(),
            amount1: "1".to_string(),
            lp_fee: None,
            dao_fee: None,
            stable_params: None,
        }];
        assert!(pools_from_records(records).is_err());
    }

    #[test]
    fn test_trade_sizes() {
        let records = vec![TradeSizeRecord {
            token: "tokenA".to_string(),
            trade_size: "5000000".to_string(),
            price: "1.25".to_string(),
        }];
        let sizes = trade_sizes_from_records(records).unwrap();
        assert_eq!(sizes["tokenA"].amount, U256::from(5_000_000u64));
    }
}
