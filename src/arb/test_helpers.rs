use std::str::FromStr;

use alloy::primitives::U256;

use crate::arb::decimal::Dec;
use crate::arb::pool::{Pool, PoolCore, StableParams};
use crate::arb::types::Token;

#[allow(dead_code)]
pub fn dec(s: &str) -> Dec {
    Dec::from_str(s).unwrap()
}

#[allow(dead_code)]
pub fn tokens(entries: &[(&str, u8)]) -> Vec<Token> {
    entries
        .iter()
        .map(|(address, decimals)| Token::new((*address).to_string(), *decimals))
        .collect()
}

/// Constant-product pool with the default 0.3% LP fee and no DAO fee
#[allow(dead_code)]
pub fn cpmm(address: &str, token0: &str, token1: &str, amount0: u64, amount1: u64) -> Pool {
    Pool::ConstantProduct(PoolCore {
        address: address.to_string(),
        token0: token0.to_string(),
        token1: token1.to_string(),
        amount0: U256::from(amount0),
        amount1: U256::from(amount1),
        lp_fee: dec("0.003"),
        dao_fee: dec("0"),
    })
}

/// Stable pool with 0.2% LP / 0.1% DAO fees, no trade floors, and a
/// high price-impact cap
#[allow(dead_code)]
#[allow(clippy::too_many_arguments)]
pub fn stable(
    address: &str,
    token0: &str,
    token1: &str,
    amount0: u128,
    amount1: u128,
    price_ratio: &str,
    alpha: &str,
    gamma1: &str,
    gamma2: &str,
) -> Pool {
    Pool::Stable(
        PoolCore {
            address: address.to_string(),
            token0: token0.to_string(),
            token1: token1.to_string(),
            amount0: U256::from(amount0),
            amount1: U256::from(amount1),
            lp_fee: dec("0.002"),
            dao_fee: dec("0.001"),
        },
        stable_params(price_ratio, alpha, gamma1, gamma2),
    )
}

#[allow(dead_code)]
pub fn stable_params(price_ratio: &str, alpha: &str, gamma1: &str, gamma2: &str) -> StableParams {
    StableParams {
        price_ratio: Some(dec(price_ratio)),
        alpha: dec(alpha),
        gamma1: dec(gamma1),
        gamma2: dec(gamma2),
        min_trade_size_0_to_1: dec("0"),
        min_trade_size_1_to_0: dec("0"),
        max_price_impact: dec("1000"),
    }
}

/// The three-pool cycle A → B → C → A used by the driver and path tests;
/// `base2` is the A-side reserve of the repay leg, so anything above
/// 100_000 makes the cycle profitable.
#[allow(dead_code)]
pub fn triangle_pools(base2: u64) -> Vec<Pool> {
    vec![
        cpmm("P1", "A", "B", 100_000, 100_000),
        cpmm("P2", "B", "C", 100_000, 100_000),
        cpmm("P3", "C", "A", 100_000, base2),
    ]
}
