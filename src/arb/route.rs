//! Route evaluation: chaining per-hop swap simulations along a path.
//!
//! `calculate_route` folds a path over the snapshot, carrying the running
//! token and amount and accumulating fee rates, price impact, and gas
//! multipliers. `routes` enumerates every path between two tokens,
//! evaluates each, silently drops the ones that fail, and ranks the
//! survivors by their quoted output.

use alloy::primitives::U256;

use crate::arb::constant_product;
use crate::arb::decimal::{from_raw, to_raw_floor, Dec};
use crate::arb::error::{RouteError, SwapError};
use crate::arb::paths::possible_paths;
use crate::arb::pool::Pool;
use crate::arb::stable::StablePool;
use crate::arb::types::{PoolAddress, Token, TokenAddress};

/// Relative gas cost tags per pool kind. The engine only sums them; the
/// values are whatever the caller's execution layer wants to see.
#[derive(Clone, Debug, PartialEq)]
pub struct GasMultipliers {
    /// Added per stable hop
    pub stable: Dec,
    /// Added per constant-product hop
    pub constant_product: Dec,
}

impl Default for GasMultipliers {
    fn default() -> Self {
        Self {
            stable: Dec::from(2),
            constant_product: Dec::from(1),
        }
    }
}

/// A fully priced path.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    /// The token the route starts from
    pub input_token: TokenAddress,
    /// The token the route ends on
    pub output_token: TokenAddress,
    /// The pools traversed, in order
    pub path: Vec<PoolAddress>,
    /// Raw amount entering the first hop
    pub input_amount: U256,
    /// Raw amount leaving the last hop
    pub quote_output_amount: U256,
    /// Sum of the LP fee rates along the path
    pub quote_lp_fee: Dec,
    /// Sum of the DAO fee rates along the path
    pub quote_dao_fee: Dec,
    /// Sum of the per-hop price impacts
    pub price_impact: Dec,
    /// Sum of the per-hop gas multipliers
    pub gas_multiplier: Dec,
}

impl Route {
    /// Gross gain of the route; `None` when it is not profitable
    #[must_use]
    pub fn profit(&self) -> Option<U256> {
        self.quote_output_amount.checked_sub(self.input_amount)
    }
}

/// Price `input_amount` of `input_token` along `path`.
///
/// Stable hops convert amounts to human-readable form via the token config
/// and price against a fresh [`StablePool`] built from the snapshot, so no
/// simulation ever leaks state into another. Constant-product hops work on
/// raw amounts directly.
///
/// # Errors
/// * snapshot problems: `UnknownPool`, `DuplicatePool`, `UnknownToken`,
///   `DuplicateToken`, `TokenMismatch`
/// * hop failures: any [`SwapError`], wrapped in `RouteError::Swap`
pub fn calculate_route(
    input_amount: U256,
    input_token: &str,
    path: &[PoolAddress],
    pools: &[Pool],
    tokens: &[Token],
    gas: &GasMultipliers,
) -> Result<Route, RouteError> {
    let mut current_token = input_token.to_string();
    let mut current_amount = input_amount;
    let mut quote_lp_fee = Dec::from(0);
    let mut quote_dao_fee = Dec::from(0);
    let mut price_impact = Dec::from(0);
    let mut gas_multiplier = Dec::from(0);

    for address in path {
        let pool = find_pool(address, pools)?;
        let core = pool.core();
        let token0 = find_token(&core.token0, tokens)?;
        let token1 = find_token(&core.token1, tokens)?;
        let zero_for_one = if core.token0 == current_token {
            true
        } else if core.token1 == current_token {
            false
        } else {
            return Err(RouteError::TokenMismatch {
                token: current_token,
                pool: core.address.clone(),
            });
        };
        let (token_in, token_out) = if zero_for_one {
            (token0, token1)
        } else {
            (token1, token0)
        };

        let (output, impact, gas_cost) = match pool {
            Pool::Stable(_, params) => {
                let engine = StablePool::new(
                    from_raw(core.amount0, token0.decimals),
                    from_raw(core.amount1, token1.decimals),
                    core.lp_fee.clone(),
                    core.dao_fee.clone(),
                    params,
                )
                .map_err(RouteError::from)?;
                let amount = from_raw(current_amount, token_in.decimals);
                let swap = if zero_for_one {
                    engine.simulate_token0_for_token1(&amount)
                } else {
                    engine.simulate_token1_for_token0(&amount)
                }
                .map_err(RouteError::from)?;
                let output = to_raw_floor(&swap.output, token_out.decimals)
                    .map_err(SwapError::from)
                    .map_err(RouteError::from)?;
                (output, swap.price_impact, gas.stable.clone())
            }
            Pool::ConstantProduct(_) => {
                let (reserve_in, reserve_out) = if zero_for_one {
                    (core.amount0, core.amount1)
                } else {
                    (core.amount1, core.amount0)
                };
                let output = constant_product::simulate_swap(
                    current_amount,
                    reserve_in,
                    reserve_out,
                    &pool.total_fee(),
                )
                .map_err(RouteError::from)?;
                let impact =
                    constant_product::price_impact(current_amount, reserve_in, reserve_out)
                        .map_err(RouteError::from)?;
                (output, impact, gas.constant_product.clone())
            }
        };

        quote_lp_fee = quote_lp_fee + &core.lp_fee;
        quote_dao_fee = quote_dao_fee + &core.dao_fee;
        price_impact = price_impact + impact;
        gas_multiplier = gas_multiplier + gas_cost;
        current_token = token_out.address.clone();
        current_amount = output;
    }

    Ok(Route {
        input_token: input_token.to_string(),
        output_token: current_token,
        path: path.to_vec(),
        input_amount,
        quote_output_amount: current_amount,
        quote_lp_fee,
        quote_dao_fee,
        price_impact,
        gas_multiplier,
    })
}

/// Enumerate and price every route from `input_token` to `output_token`,
/// dropping routes that fail and sorting the rest by quoted output,
/// descending. Ties keep their enumeration order.
///
/// # Errors
/// Duplicate pool or token entries condemn the whole snapshot and abort the
/// call; every other failure only drops its route.
pub fn routes(
    input_amount: U256,
    input_token: &str,
    output_token: &str,
    max_hops: usize,
    pools: &[Pool],
    tokens: &[Token],
    gas: &GasMultipliers,
) -> Result<Vec<Route>, RouteError> {
    let mut priced = Vec::new();
    for path in possible_paths(input_token, output_token, max_hops, pools) {
        match calculate_route(input_amount, input_token, &path, pools, tokens, gas) {
            Ok(route) => priced.push(route),
            Err(error) if error.is_fatal() => return Err(error),
            Err(error) => {
                log::debug!("skipping route {path:?} for {input_token}: {error}");
            }
        }
    }
    priced.sort_by(|a, b| b.quote_output_amount.cmp(&a.quote_output_amount));
    Ok(priced)
}

/// Resolve a pool by address; the snapshot must contain it exactly once.
pub(crate) fn find_pool<'a>(address: &str, pools: &'a [Pool]) -> Result<&'a Pool, RouteError> {
    let mut found = None;
    for pool in pools {
        if pool.address() == address {
            if found.is_some() {
                return Err(RouteError::DuplicatePool(address.to_string()));
            }
            found = Some(pool);
        }
    }
    found.ok_or_else(|| RouteError::UnknownPool(address.to_string()))
}

/// Resolve a token by address; the config must contain it exactly once.
pub(crate) fn find_token<'a>(address: &str, tokens: &'a [Token]) -> Result<&'a Token, RouteError> {
    let mut found = None;
    for token in tokens {
        if token.address == address {
            if found.is_some() {
                return Err(RouteError::DuplicateToken(address.to_string()));
            }
            found = Some(token);
        }
    }
    found.ok_or_else(|| RouteError::UnknownToken(address.to_string()))
}
