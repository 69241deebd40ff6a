//! Swap simulation for stable-curve pools.
//!
//! A stable pool holds sizes `x` (token0) and `y` (token1) plus an oracle
//! price `p` of token1 in token0 units; all math runs on `x` and the scaled
//! side `py = p·y`. The curve
//!
//! ```text
//! F(x, py) = α·(4·x·py)^γ · (x + py − 1) + x·py − ¼
//! ```
//!
//! is normalised by the pool's invariant `d`: the pool state satisfies
//! `F(x/d, py/d) = 0`. `γ` switches between `γ1` and `γ2` depending on which
//! side of equilibrium the evaluation point sits on. There is no closed form
//! for `d` or for a post-trade pool side, so both are located numerically
//! with the hybrid Newton/bisection solver; prices come from the tangent of
//! the curve at the current state.
//!
//! `F` only ever sees `d`-normalised inputs. The `−1` and `−¼` constants are
//! wrong for absolute sizes, which is why the raw curve functions stay
//! private to this module.

use bigdecimal::{One, Zero};

use crate::arb::decimal::{div, pow, sqrt, Dec};
use crate::arb::error::{MathError, SwapError};
use crate::arb::pool::StableParams;
use crate::arb::roots::{calc_zero, LowerBound};

/// A stable pool ready to price trades. Sizes are human-readable amounts.
///
/// Simulations do not touch the pool; the `swap_*` methods apply a simulated
/// trade in place and recompute the invariant.
#[derive(Clone, Debug, PartialEq)]
pub struct StablePool {
    pool0_size: Dec,
    pool1_size: Dec,
    price_ratio: Dec,
    alpha: Dec,
    gamma1: Dec,
    gamma2: Dec,
    lp_fee: Dec,
    dao_fee: Dec,
    min_trade_size_0_to_1: Dec,
    min_trade_size_1_to_0: Dec,
    max_price_impact: Dec,
    invariant: Dec,
}

/// Outcome of a forward (input-given) simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct StableSwap {
    /// Amount handed to the trader, net of fees
    pub output: Dec,
    /// Fee amount that re-enters the pool
    pub lp_fee_amount: Dec,
    /// Fee amount that leaves the pool
    pub dao_fee_amount: Dec,
    /// Price impact in percent
    pub price_impact: Dec,
    /// Post-trade size of the token0 side
    pub new_pool0_size: Dec,
    /// Post-trade size of the token1 side, LP fee included
    pub new_pool1_size: Dec,
}

/// Outcome of a reverse (output-given) simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct StableReverse {
    /// Required input for the requested output
    pub input: Dec,
    /// Fee amount that would re-enter the pool
    pub lp_fee_amount: Dec,
    /// Fee amount that would leave the pool
    pub dao_fee_amount: Dec,
    /// Price impact in percent
    pub price_impact: Dec,
}

/// The curve parameters, borrowed from a pool so the invariant can be
/// solved both during and after construction.
struct Curve<'a> {
    alpha: &'a Dec,
    gamma1: &'a Dec,
    gamma2: &'a Dec,
}

impl Curve<'_> {
    /// `γ1` at or below equilibrium, `γ2` above; chosen per evaluation
    /// point, so the branch can flip between solver iterations.
    fn gamma(&self, x: &Dec, py: &Dec) -> &Dec {
        if x <= py {
            self.gamma1
        } else {
            self.gamma2
        }
    }

    /// `α·(4·x·py)^γ`
    fn coeff(&self, x: &Dec, py: &Dec) -> Result<Dec, MathError> {
        let base = Dec::from(4) * x * py;
        Ok(self.alpha * &pow(&base, self.gamma(x, py))?)
    }

    /// `F(x, py)` for `d`-normalised inputs
    fn invariant_fn(&self, x: &Dec, py: &Dec) -> Result<Dec, MathError> {
        let edge = x + py - Dec::one();
        Ok(self.coeff(x, py)? * edge + x * py - quarter())
    }

    /// `∂F/∂x`
    fn d_invariant_dx(&self, x: &Dec, py: &Dec) -> Result<Dec, MathError> {
        let coeff = self.coeff(x, py)?;
        let edge = x + py - Dec::one();
        let slope = div(&(&coeff * self.gamma(x, py)), x)?;
        Ok(slope * edge + coeff + py)
    }

    /// `∂F/∂py`
    fn d_invariant_dpy(&self, x: &Dec, py: &Dec) -> Result<Dec, MathError> {
        let coeff = self.coeff(x, py)?;
        let edge = x + py - Dec::one();
        let slope = div(&(&coeff * self.gamma(x, py)), py)?;
        Ok(slope * edge + coeff + x)
    }
}

impl StablePool {
    /// Build a pool from snapshot state and solve its invariant.
    ///
    /// # Errors
    /// * `OracleUnavailable` when the params carry no price ratio
    /// * `Nonconvergent` when the invariant cannot be located
    pub fn new(
        pool0_size: Dec,
        pool1_size: Dec,
        lp_fee: Dec,
        dao_fee: Dec,
        params: &StableParams,
    ) -> Result<Self, SwapError> {
        let price_ratio = params
            .price_ratio
            .clone()
            .ok_or(SwapError::OracleUnavailable)?;
        let curve = Curve {
            alpha: &params.alpha,
            gamma1: &params.gamma1,
            gamma2: &params.gamma2,
        };
        let scaled_pool1 = &price_ratio * &pool1_size;
        let invariant = compute_invariant(&curve, &pool0_size, &scaled_pool1)?;

        Ok(Self {
            pool0_size,
            pool1_size,
            price_ratio,
            alpha: params.alpha.clone(),
            gamma1: params.gamma1.clone(),
            gamma2: params.gamma2.clone(),
            lp_fee,
            dao_fee,
            min_trade_size_0_to_1: params.min_trade_size_0_to_1.clone(),
            min_trade_size_1_to_0: params.min_trade_size_1_to_0.clone(),
            max_price_impact: params.max_price_impact.clone(),
            invariant,
        })
    }

    /// The token0 side of the pool
    #[must_use]
    pub const fn pool0_size(&self) -> &Dec {
        &self.pool0_size
    }

    /// The token1 side of the pool
    #[must_use]
    pub const fn pool1_size(&self) -> &Dec {
        &self.pool1_size
    }

    /// The pool's invariant `d`
    #[must_use]
    pub const fn invariant(&self) -> &Dec {
        &self.invariant
    }

    /// `F(x/d, py/d)` at the current state; zero up to the solver tolerance
    ///
    /// # Errors
    /// * `MathError` when the curve cannot be evaluated
    pub fn invariant_residual(&self) -> Result<Dec, MathError> {
        let x = div(&self.pool0_size, &self.invariant)?;
        let py = div(&self.scaled_pool1(), &self.invariant)?;
        self.curve().invariant_fn(&x, &py)
    }

    /// Simulate swapping `amount` of token0 for token1.
    ///
    /// # Errors
    /// * `TradeTooSmall` when `amount` is at or below the trade floor
    /// * `PriceImpactExceeded` when the impact leaves `[0, limit]`
    /// * `Nonconvergent` when the post-trade side cannot be solved
    pub fn simulate_token0_for_token1(&self, amount: &Dec) -> Result<StableSwap, SwapError> {
        if amount <= &self.min_trade_size_0_to_1 {
            return Err(SwapError::TradeTooSmall {
                amount: amount.clone(),
                minimum: self.min_trade_size_0_to_1.clone(),
            });
        }

        let new_pool0 = &self.pool0_size + amount;
        let new_pool1 = self.solve_for_pool1_size(&new_pool0)?;
        let impact = self.token1_price_impact(&new_pool0, &new_pool1)?;
        self.check_impact(&impact)?;

        let gross = &self.pool1_size - &new_pool1;
        Ok(self.settle(gross, impact, new_pool0, new_pool1, true))
    }

    /// Simulate swapping `amount` of token1 for token0.
    ///
    /// # Errors
    /// Same failure modes as [`StablePool::simulate_token0_for_token1`],
    /// with the token1 → token0 trade floor.
    pub fn simulate_token1_for_token0(&self, amount: &Dec) -> Result<StableSwap, SwapError> {
        if amount <= &self.min_trade_size_1_to_0 {
            return Err(SwapError::TradeTooSmall {
                amount: amount.clone(),
                minimum: self.min_trade_size_1_to_0.clone(),
            });
        }

        let new_pool1 = &self.pool1_size + amount;
        let new_pool0 = self.solve_for_pool0_size(&(&self.price_ratio * &new_pool1))?;
        let impact = self.token0_price_impact(&new_pool0, &new_pool1)?;
        self.check_impact(&impact)?;

        let gross = &self.pool0_size - &new_pool0;
        Ok(self.settle(gross, impact, new_pool0, new_pool1, false))
    }

    /// Required token0 input for a net token1 output of `output`.
    ///
    /// The gross amount leaving the pool is `output / (1 − lp_fee − dao_fee)`,
    /// the exact inverse of the forward fee application, so a forward
    /// simulation followed by the reverse quote of its output reproduces the
    /// original input.
    ///
    /// # Errors
    /// * `InsufficientLiquidity` when the gross requirement reaches the
    ///   token1 side
    /// * otherwise as [`StablePool::simulate_token0_for_token1`]
    pub fn reverse_token0_for_token1(&self, output: &Dec) -> Result<StableReverse, SwapError> {
        let gross = self.gross_for_output(output)?;
        if gross >= self.pool1_size {
            return Err(SwapError::InsufficientLiquidity {
                requested: gross,
                available: self.pool1_size.clone(),
            });
        }

        let new_pool1 = &self.pool1_size - &gross;
        let new_pool0 = self.solve_for_pool0_size(&(&self.price_ratio * &new_pool1))?;
        let input = &new_pool0 - &self.pool0_size;
        if input <= self.min_trade_size_0_to_1 {
            return Err(SwapError::TradeTooSmall {
                amount: input,
                minimum: self.min_trade_size_0_to_1.clone(),
            });
        }
        let impact = self.token1_price_impact(&new_pool0, &new_pool1)?;
        self.check_impact(&impact)?;

        Ok(StableReverse {
            input,
            lp_fee_amount: &self.lp_fee * &gross,
            dao_fee_amount: &self.dao_fee * &gross,
            price_impact: impact,
        })
    }

    /// Required token1 input for a net token0 output of `output`.
    ///
    /// # Errors
    /// Mirror image of [`StablePool::reverse_token0_for_token1`].
    pub fn reverse_token1_for_token0(&self, output: &Dec) -> Result<StableReverse, SwapError> {
        let gross = self.gross_for_output(output)?;
        if gross >= self.pool0_size {
            return Err(SwapError::InsufficientLiquidity {
                requested: gross,
                available: self.pool0_size.clone(),
            });
        }

        let new_pool0 = &self.pool0_size - &gross;
        let new_pool1 = self.solve_for_pool1_size(&new_pool0)?;
        let input = &new_pool1 - &self.pool1_size;
        if input <= self.min_trade_size_1_to_0 {
            return Err(SwapError::TradeTooSmall {
                amount: input,
                minimum: self.min_trade_size_1_to_0.clone(),
            });
        }
        let impact = self.token0_price_impact(&new_pool0, &new_pool1)?;
        self.check_impact(&impact)?;

        Ok(StableReverse {
            input,
            lp_fee_amount: &self.lp_fee * &gross,
            dao_fee_amount: &self.dao_fee * &gross,
            price_impact: impact,
        })
    }

    /// Apply a token0 → token1 swap to the pool and recompute the invariant.
    ///
    /// # Errors
    /// As [`StablePool::simulate_token0_for_token1`].
    pub fn swap_token0_for_token1(&mut self, amount: &Dec) -> Result<Dec, SwapError> {
        let swap = self.simulate_token0_for_token1(amount)?;
        self.apply(&swap)?;
        Ok(swap.output)
    }

    /// Apply a token1 → token0 swap to the pool and recompute the invariant.
    ///
    /// # Errors
    /// As [`StablePool::simulate_token1_for_token0`].
    pub fn swap_token1_for_token0(&mut self, amount: &Dec) -> Result<Dec, SwapError> {
        let swap = self.simulate_token1_for_token0(amount)?;
        self.apply(&swap)?;
        Ok(swap.output)
    }

    fn apply(&mut self, swap: &StableSwap) -> Result<(), SwapError> {
        self.pool0_size = swap.new_pool0_size.clone();
        self.pool1_size = swap.new_pool1_size.clone();
        let invariant = compute_invariant(&self.curve(), &self.pool0_size, &self.scaled_pool1())?;
        self.invariant = invariant;
        Ok(())
    }

    /// Fee split and post-trade sizes for a solved gross output.
    fn settle(
        &self,
        gross: Dec,
        price_impact: Dec,
        solved_pool0: Dec,
        solved_pool1: Dec,
        zero_for_one: bool,
    ) -> StableSwap {
        let lp_fee_amount = &self.lp_fee * &gross;
        let dao_fee_amount = &self.dao_fee * &gross;
        let output = &gross - &lp_fee_amount - &dao_fee_amount;
        // the LP fee re-enters the side the gross output left
        let (new_pool0_size, new_pool1_size) = if zero_for_one {
            (solved_pool0, solved_pool1 + &lp_fee_amount)
        } else {
            (solved_pool0 + &lp_fee_amount, solved_pool1)
        };
        StableSwap {
            output,
            lp_fee_amount,
            dao_fee_amount,
            price_impact,
            new_pool0_size,
            new_pool1_size,
        }
    }

    fn gross_for_output(&self, output: &Dec) -> Result<Dec, SwapError> {
        let keep = Dec::one() - &self.lp_fee - &self.dao_fee;
        Ok(div(output, &keep)?)
    }

    fn curve(&self) -> Curve<'_> {
        Curve {
            alpha: &self.alpha,
            gamma1: &self.gamma1,
            gamma2: &self.gamma2,
        }
    }

    /// The token1 side scaled into token0 units
    fn scaled_pool1(&self) -> Dec {
        &self.price_ratio * &self.pool1_size
    }

    /// Given a new token0 side, the token1 side that keeps the pool on the
    /// curve. The current side is both the Newton guess and the bisection
    /// upper bound: the solved side only ever shrinks.
    fn solve_for_pool1_size(&self, new_pool0: &Dec) -> Result<Dec, MathError> {
        let curve = self.curve();
        let x = div(new_pool0, &self.invariant)?;
        let guess = div(&self.scaled_pool1(), &self.invariant)?;
        let solved = calc_zero(
            |py: &Dec| curve.invariant_fn(&x, py),
            |py: &Dec| curve.d_invariant_dpy(&x, py),
            &guess,
            &guess,
            false,
            LowerBound::Eager(Dec::zero()),
        )?;
        div(&(&solved * &self.invariant), &self.price_ratio)
    }

    /// Symmetric solve: given a new scaled token1 side, find the token0 side.
    fn solve_for_pool0_size(&self, new_scaled_pool1: &Dec) -> Result<Dec, MathError> {
        let curve = self.curve();
        let py = div(new_scaled_pool1, &self.invariant)?;
        let guess = div(&self.pool0_size, &self.invariant)?;
        let solved = calc_zero(
            |x: &Dec| curve.invariant_fn(x, &py),
            |x: &Dec| curve.d_invariant_dx(x, &py),
            &guess,
            &guess,
            false,
            LowerBound::Eager(Dec::zero()),
        )?;
        Ok(&solved * &self.invariant)
    }

    /// `-slope` of the curve at a normalised point, in token1-per-token0
    /// terms: `(∂F/∂x) / (∂F/∂py) / p`.
    fn neg_tangent(&self, x: &Dec, py: &Dec) -> Result<Dec, MathError> {
        let curve = self.curve();
        let ratio = div(&curve.d_invariant_dx(x, py)?, &curve.d_invariant_dpy(x, py)?)?;
        div(&ratio, &self.price_ratio)
    }

    /// Price of token0 in units of token1 at a pool state
    fn token0_price(&self, pool0: &Dec, pool1: &Dec) -> Result<Dec, MathError> {
        let x = div(pool0, &self.invariant)?;
        let py = div(&(&self.price_ratio * pool1), &self.invariant)?;
        self.neg_tangent(&x, &py)
    }

    /// Price of token1 in units of token0 at a pool state
    fn token1_price(&self, pool0: &Dec, pool1: &Dec) -> Result<Dec, MathError> {
        div(&Dec::one(), &self.token0_price(pool0, pool1)?)
    }

    /// Impact on the price of token1 (what a token0 → token1 trade buys),
    /// in percent
    fn token1_price_impact(&self, new_pool0: &Dec, new_pool1: &Dec) -> Result<Dec, MathError> {
        let current = self.token1_price(&self.pool0_size, &self.pool1_size)?;
        let along = self.token1_price(new_pool0, new_pool1)?;
        Ok((div(&along, &current)? - Dec::one()) * hundred())
    }

    /// Impact on the price of token0, in percent
    fn token0_price_impact(&self, new_pool0: &Dec, new_pool1: &Dec) -> Result<Dec, MathError> {
        let current = self.token0_price(&self.pool0_size, &self.pool1_size)?;
        let along = self.token0_price(new_pool0, new_pool1)?;
        Ok((div(&along, &current)? - Dec::one()) * hundred())
    }

    fn check_impact(&self, impact: &Dec) -> Result<(), SwapError> {
        if impact < &Dec::zero() || impact > &self.max_price_impact {
            return Err(SwapError::PriceImpactExceeded {
                impact: impact.clone(),
                limit: self.max_price_impact.clone(),
            });
        }
        Ok(())
    }
}

/// Solve `F(x/d, py/d) = 0` for `d`. The Newton guess and bisection upper
/// bound are the TVL `x + py`; the lazy lower bound is the geometric mean
/// `2·√(x·py)`, or zero when either side is at most 1 so the square root
/// stays well-defined.
fn compute_invariant(curve: &Curve<'_>, pool0: &Dec, scaled_pool1: &Dec) -> Result<Dec, MathError> {
    let tvl = pool0 + scaled_pool1;
    let f = |d: &Dec| {
        let x = div(pool0, d)?;
        let py = div(scaled_pool1, d)?;
        curve.invariant_fn(&x, &py)
    };
    let df = |d: &Dec| {
        let x = div(pool0, d)?;
        let py = div(scaled_pool1, d)?;
        let along_x = curve.d_invariant_dx(&x, &py)? * pool0;
        let along_py = curve.d_invariant_dpy(&x, &py)? * scaled_pool1;
        Ok(-(div(&(along_x + along_py), &(d * d))?))
    };
    let one = Dec::one();
    let geometric_mean = || {
        if pool0 > &one && scaled_pool1 > &one {
            sqrt(&(pool0 * scaled_pool1)).map_or_else(|_| Dec::zero(), |root| root * Dec::from(2))
        } else {
            Dec::zero()
        }
    };
    calc_zero(f, df, &tvl, &tvl, true, LowerBound::Lazy(&geometric_mean))
}

/// `¼`, the constant term of the normalised curve
fn quarter() -> Dec {
    Dec::new(25.into(), 2)
}

/// Percent scale for price impact
fn hundred() -> Dec {
    Dec::from(100)
}
