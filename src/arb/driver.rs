//! The arbitrage driver: borrowables in, trade plan out.
//!
//! For every borrowable token the driver prices all cycles back to that
//! token at two magnitudes (the configured trade size and half of it), plus
//! the closed-form optimal borrow for every three-pool constant-product
//! cycle. Routes that return more than they take in are kept, ranked by
//! gross output, and the best one becomes the borrow → route-swap → repay
//! plan.

use std::collections::HashMap;

use alloy::primitives::U256;
use bigdecimal::Zero;

use crate::arb::decimal::{from_raw, to_raw_floor, Dec};
use crate::arb::error::RouteError;
use crate::arb::optimal::{optimal_borrow_sizes, CycleReserves};
use crate::arb::paths::possible_paths;
use crate::arb::pool::Pool;
use crate::arb::route::{calculate_route, find_pool, routes, GasMultipliers, Route};
use crate::arb::types::{PoolAddress, Token, TokenAddress};

/// A token the driver may borrow and must repay within one transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Borrowable {
    /// The address of the token
    pub token: TokenAddress,
    /// Key of the token's price feed in the oracle
    pub oracle_key: String,
    /// The number of decimals of the token
    pub decimals: u8,
}

/// Borrow limit and reference price for one borrowable.
#[derive(Clone, Debug, PartialEq)]
pub struct TradeSize {
    /// Maximum raw amount to borrow
    pub amount: U256,
    /// Oracle price used to size the limit
    pub price: Dec,
}

/// The three-step plan handed to the transaction builder: borrow the input,
/// swap along the path, repay the borrow plus the minimum profit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TradePlan {
    /// The token to borrow
    pub borrow_token: TokenAddress,
    /// Raw amount to borrow
    pub borrow_amount: U256,
    /// The pools the router must traverse, in order
    pub router_path: Vec<PoolAddress>,
    /// Raw amount that must come back: borrow plus minimum profit
    pub expected_return: U256,
}

/// Everything a search pass produces: the profitable routes, ranked, and
/// the plan for the best one.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    /// Profitable routes across all borrowables, by gross output descending
    pub routes: Vec<Route>,
    /// Plan for the top route, when there is one
    pub plan: Option<TradePlan>,
}

/// Run one full search pass over the snapshot.
///
/// # Errors
/// Duplicate pool or token entries in the snapshot abort the pass.
pub fn search(
    borrowables: &[Borrowable],
    trade_sizes: &HashMap<TokenAddress, TradeSize>,
    pools: &[Pool],
    tokens: &[Token],
    gas: &GasMultipliers,
    max_hops: usize,
    minimum_profit: U256,
) -> Result<SearchOutcome, RouteError> {
    let mut profitable = Vec::new();

    for borrowable in borrowables {
        let Some(trade) = trade_sizes.get(&borrowable.token) else {
            log::warn!("no trade size configured for {}, skipping", borrowable.token);
            continue;
        };

        for magnitude in [trade.amount, trade.amount / U256::from(2)] {
            if magnitude.is_zero() {
                continue;
            }
            for route in routes(
                magnitude,
                &borrowable.token,
                &borrowable.token,
                max_hops,
                pools,
                tokens,
                gas,
            )? {
                if route.quote_output_amount > route.input_amount {
                    profitable.push(route);
                }
            }
        }

        profitable.extend(optimal_cycle_routes(
            borrowable,
            trade.amount,
            pools,
            tokens,
            gas,
            max_hops,
        )?);
    }

    profitable.sort_by(|a, b| b.quote_output_amount.cmp(&a.quote_output_amount));
    let plan = profitable.first().map(|best| plan_for(best, minimum_profit));
    Ok(SearchOutcome {
        routes: profitable,
        plan,
    })
}

/// The borrow → swap → repay plan for a route.
#[must_use]
pub fn plan_for(route: &Route, minimum_profit: U256) -> TradePlan {
    TradePlan {
        borrow_token: route.input_token.clone(),
        borrow_amount: route.input_amount,
        router_path: route.path.clone(),
        expected_return: route.input_amount + minimum_profit,
    }
}

/// Price every three-pool constant-product cycle at its closed-form optimal
/// borrow, capped by the borrowable's trade size. Non-CPMM cycles and
/// cycles with no positive root are skipped.
fn optimal_cycle_routes(
    borrowable: &Borrowable,
    cap: U256,
    pools: &[Pool],
    tokens: &[Token],
    gas: &GasMultipliers,
    max_hops: usize,
) -> Result<Vec<Route>, RouteError> {
    let mut found = Vec::new();
    if max_hops < 3 {
        return Ok(found);
    }

    for path in possible_paths(&borrowable.token, &borrowable.token, 3, pools) {
        if path.len() != 3 {
            continue;
        }
        let reserves = match cpmm_cycle_reserves(&borrowable.token, &path, pools) {
            Ok(Some(reserves)) => reserves,
            Ok(None) => continue,
            Err(error) if error.is_fatal() => return Err(error),
            Err(error) => {
                log::debug!("cycle {path:?} not sizable: {error}");
                continue;
            }
        };
        let (with_plus, with_minus) = match optimal_borrow_sizes(&reserves) {
            Ok(roots) => roots,
            Err(error) => {
                log::debug!("no optimal size for cycle {path:?}: {error}");
                continue;
            }
        };
        let Some(best) = [with_plus, with_minus]
            .into_iter()
            .filter(|root| root > &Dec::zero())
            .max()
        else {
            continue;
        };
        let Ok(raw) = to_raw_floor(&best, 0) else {
            continue;
        };
        let borrow = raw.min(cap);
        if borrow.is_zero() {
            continue;
        }

        match calculate_route(borrow, &borrowable.token, &path, pools, tokens, gas) {
            Ok(route) if route.quote_output_amount > route.input_amount => found.push(route),
            Ok(_) => {}
            Err(error) if error.is_fatal() => return Err(error),
            Err(error) => {
                log::debug!("optimally sized route {path:?} skipped: {error}");
            }
        }
    }
    Ok(found)
}

/// Orient a three-pool cycle's reserves along the travel direction.
/// Returns `None` when any leg is not a constant-product pool.
fn cpmm_cycle_reserves(
    input_token: &str,
    path: &[PoolAddress],
    pools: &[Pool],
) -> Result<Option<CycleReserves>, RouteError> {
    let mut current = input_token.to_string();
    let mut legs = Vec::with_capacity(path.len());
    for address in path {
        let pool = find_pool(address, pools)?;
        let Pool::ConstantProduct(core) = pool else {
            return Ok(None);
        };
        let (reserve_in, reserve_out) = if core.token0 == current {
            (core.amount0, core.amount1)
        } else {
            (core.amount1, core.amount0)
        };
        legs.push((
            from_raw(reserve_in, 0),
            from_raw(reserve_out, 0),
            pool.total_fee(),
        ));
        current = pool.other_token(&current).clone();
    }

    let legs: [(Dec, Dec, Dec); 3] = match legs.try_into() {
        Ok(legs) => legs,
        Err(_) => return Ok(None),
    };
    let [(base0, x0, fee0), (x1, y1, fee1), (y2, base2, fee2)] = legs;
    Ok(Some(CycleReserves {
        base0,
        x0,
        x1,
        y1,
        y2,
        base2,
        fee0,
        fee1,
        fee2,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    fn borrowable(token: &str) -> Borrowable {
        Borrowable {
            token: token.to_string(),
            oracle_key: format!("{token} oracle"),
            decimals: 0,
        }
    }

    fn trade_sizes(entries: &[(&str, u64)]) -> HashMap<TokenAddress, TradeSize> {
        entries
            .iter()
            .map(|(token, amount)| {
                (
                    (*token).to_string(),
                    TradeSize {
                        amount: U256::from(*amount),
                        price: dec("1"),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_triangle_arbitrage_detected() {
        // the repay leg holds excess base token, so the cycle pays
        let pools = triangle_pools(104_000);
        let tokens = tokens(&[("A", 0), ("B", 0), ("C", 0)]);
        let outcome = search(
            &[borrowable("A")],
            &trade_sizes(&[("A", 1_000)]),
            &pools,
            &tokens,
            &GasMultipliers::default(),
            5,
            U256::from(1u64),
        )
        .unwrap();

        assert!(!outcome.routes.is_empty());
        for route in &outcome.routes {
            assert!(route.quote_output_amount > route.input_amount);
            assert_eq!(route.input_token, "A");
            assert_eq!(route.output_token, "A");
        }

        // the optimally sized borrow (≈508) beats both fixed magnitudes:
        // 1000 nets exactly its input back after rounding and 500 nets 507
        let best = &outcome.routes[0];
        assert_eq!(best.input_amount, U256::from(508u64));
        assert_eq!(best.quote_output_amount, U256::from(513u64));

        let plan = outcome.plan.unwrap();
        assert_eq!(plan.borrow_token, "A");
        assert_eq!(plan.borrow_amount, U256::from(508u64));
        assert_eq!(plan.router_path, best.path);
        assert_eq!(plan.expected_return, U256::from(509u64));
    }

    #[test]
    fn test_optimal_borrow_respects_cap() {
        let pools = triangle_pools(104_000);
        let tokens = tokens(&[("A", 0), ("B", 0), ("C", 0)]);
        let outcome = search(
            &[borrowable("A")],
            &trade_sizes(&[("A", 300)]),
            &pools,
            &tokens,
            &GasMultipliers::default(),
            5,
            U256::ZERO,
        )
        .unwrap();

        for route in &outcome.routes {
            assert!(route.input_amount <= U256::from(300u64));
        }
    }

    #[test]
    fn test_balanced_market_yields_nothing() {
        let pools = triangle_pools(100_000);
        let tokens = tokens(&[("A", 0), ("B", 0), ("C", 0)]);
        let outcome = search(
            &[borrowable("A")],
            &trade_sizes(&[("A", 1_000)]),
            &pools,
            &tokens,
            &GasMultipliers::default(),
            5,
            U256::ZERO,
        )
        .unwrap();

        assert!(outcome.routes.is_empty());
        assert!(outcome.plan.is_none());
    }

    #[test]
    fn test_borrowable_without_trade_size_is_skipped() {
        let pools = triangle_pools(104_000);
        let tokens = tokens(&[("A", 0), ("B", 0), ("C", 0)]);
        let outcome = search(
            &[borrowable("A"), borrowable("Z")],
            &trade_sizes(&[("A", 1_000)]),
            &pools,
            &tokens,
            &GasMultipliers::default(),
            5,
            U256::ZERO,
        )
        .unwrap();

        // Z contributes nothing but does not break the pass
        assert!(outcome.routes.iter().all(|route| route.input_token == "A"));
    }
}
