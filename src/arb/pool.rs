use alloy::primitives::U256;

use crate::arb::decimal::Dec;
use crate::arb::types::{PoolAddress, TokenAddress};

/// Fields shared by every pool variant: the two token sides, their raw
/// liquidity, and the fee split (LP fees stay in the pool, DAO fees leave).
#[derive(Clone, Debug, PartialEq)]
pub struct PoolCore {
    /// The address of the pool
    pub address: PoolAddress,
    /// The address of the first token in the pool
    pub token0: TokenAddress,
    /// The address of the second token in the pool
    pub token1: TokenAddress,
    /// The raw reserve of the first token
    pub amount0: U256,
    /// The raw reserve of the second token
    pub amount1: U256,
    /// The liquidity-provider fee rate
    pub lp_fee: Dec,
    /// The DAO fee rate
    pub dao_fee: Dec,
}

/// Curve parameters of a stable pool.
///
/// `price_ratio` is the oracle price of token1 in units of token0; it is
/// `None` when the oracle feed is missing, in which case simulation fails
/// with `OracleUnavailable`. `alpha` scales slippage, `gamma1`/`gamma2`
/// shape the curve's steepness on each side of equilibrium.
#[derive(Clone, Debug, PartialEq)]
pub struct StableParams {
    /// Oracle price of token1 in units of token0
    pub price_ratio: Option<Dec>,
    /// Slippage scale
    pub alpha: Dec,
    /// Steepness when the token0 side is at or below equilibrium
    pub gamma1: Dec,
    /// Steepness when the token0 side is above equilibrium
    pub gamma2: Dec,
    /// Trade floor for token0 → token1 swaps, in human-readable units
    pub min_trade_size_0_to_1: Dec,
    /// Trade floor for token1 → token0 swaps, in human-readable units
    pub min_trade_size_1_to_0: Dec,
    /// Price impact cap, in percent
    pub max_price_impact: Dec,
}

/// A liquidity pool from the snapshot.
#[derive(Clone, Debug, PartialEq)]
pub enum Pool {
    /// An `x·y = k` pool
    ConstantProduct(PoolCore),
    /// A stable-curve pool
    Stable(PoolCore, StableParams),
}

impl Pool {
    /// The fields shared by both variants
    #[must_use]
    pub const fn core(&self) -> &PoolCore {
        match self {
            Self::ConstantProduct(core) | Self::Stable(core, _) => core,
        }
    }

    /// The address of the pool
    #[must_use]
    pub fn address(&self) -> &str {
        &self.core().address
    }

    /// Whether the given token is one of the pool's two sides
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        let core = self.core();
        core.token0 == token || core.token1 == token
    }

    /// The side opposite to `token`. Callers check [`Pool::contains`] first;
    /// for a foreign token this returns token0.
    #[must_use]
    pub fn other_token(&self, token: &str) -> &TokenAddress {
        let core = self.core();
        if core.token0 == token {
            &core.token1
        } else {
            &core.token0
        }
    }

    /// Combined fee rate taken out of a swap's gross output
    #[must_use]
    pub fn total_fee(&self) -> Dec {
        let core = self.core();
        &core.lp_fee + &core.dao_fee
    }
}
