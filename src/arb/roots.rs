//! Hybrid Newton / bisection root finding.
//!
//! The stable-pool invariant is monotone but has regions where the slope is
//! close to zero and Newton steps overshoot. The strategy here is Newton
//! first for speed, bisection as the guaranteed fallback when Newton fails
//! or lands on an unacceptable root.

use bigdecimal::num_bigint::BigInt;
use bigdecimal::Zero;

use crate::arb::decimal::{div, Dec};
use crate::arb::error::MathError;

/// Iteration budget for Newton's method.
pub const NEWTON_MAX_ITERATIONS: usize = 80;

/// Iteration budget for bisection.
pub const BISECT_MAX_ITERATIONS: usize = 150;

/// Convergence tolerance used by [`calc_zero`]: 1e-16.
#[must_use]
pub fn epsilon() -> Dec {
    Dec::new(BigInt::from(1), 16)
}

/// Lower bound for the bisection fallback of [`calc_zero`].
///
/// The lazy variant holds a thunk that is only invoked if bisection actually
/// runs; the geometric-mean bound costs two square roots and is wasted work
/// whenever Newton converges. Eager and lazy bounds are mutually exclusive.
pub enum LowerBound<'a> {
    /// Bound already computed by the caller
    Eager(Dec),
    /// Bound computed on demand
    Lazy(&'a dyn Fn() -> Dec),
    /// No bound available; bisection cannot run
    Absent,
}

/// Newton's method: iterate `x ← x − f(x)/df(x)` until the step is within
/// `eps`.
///
/// # Errors
/// * `NewtonSlopeZero` when `df(x)` evaluates to zero
/// * `NewtonMaxIterations` when the budget runs out before convergence
/// * any error raised by `f` or `df` themselves
pub fn newton<F, G>(
    f: F,
    df: G,
    initial: &Dec,
    eps: &Dec,
    max_iterations: usize,
) -> Result<Dec, MathError>
where
    F: Fn(&Dec) -> Result<Dec, MathError>,
    G: Fn(&Dec) -> Result<Dec, MathError>,
{
    let mut x = initial.clone();
    for _ in 0..max_iterations {
        let slope = df(&x)?;
        if slope.is_zero() {
            return Err(MathError::NewtonSlopeZero);
        }
        let step = div(&f(&x)?, &slope)?;
        let next = &x - &step;
        if step.abs() <= *eps {
            return Ok(next);
        }
        x = next;
    }
    Err(MathError::NewtonMaxIterations(max_iterations))
}

/// Bisection on `[a, b]`. Requires `f(a)·f(b) ≤ 0`; either endpoint that is
/// already a zero is returned as-is. Each iteration halves the step and
/// advances the lower end while it stays on the same side as `f(a)`.
///
/// # Errors
/// * `BisectSameSignEndpoints` when the bracketing precondition fails
/// * `BisectMaxIterations` when the budget runs out before `|step| ≤ eps`
/// * any error raised by `f`
pub fn bisect<F>(f: F, a: &Dec, b: &Dec, eps: &Dec, max_iterations: usize) -> Result<Dec, MathError>
where
    F: Fn(&Dec) -> Result<Dec, MathError>,
{
    let fa = f(a)?;
    if fa.is_zero() {
        return Ok(a.clone());
    }
    let fb = f(b)?;
    if fb.is_zero() {
        return Ok(b.clone());
    }
    if &fa * &fb > Dec::zero() {
        return Err(MathError::BisectSameSignEndpoints);
    }

    let two = Dec::from(2);
    let mut lower = a.clone();
    let mut step = b - a;
    for _ in 0..max_iterations {
        step = div(&step, &two)?;
        let mid = &lower + &step;
        if &fa * &f(&mid)? >= Dec::zero() {
            lower = mid;
        }
        if step.abs() <= *eps {
            return Ok(lower);
        }
    }
    Err(MathError::BisectMaxIterations(max_iterations))
}

/// Newton first, bisection as fallback.
///
/// Newton runs from `initial`; a root is accepted unless `ignore_negative`
/// is set and the root is negative. On any Newton failure the zero is
/// bracketed between the lower bound and `upper` and bisection takes over.
/// The tolerance is fixed at [`epsilon`].
///
/// # Errors
/// * `NoBisectBounds` when bisection is needed and `lower` is `Absent`
/// * bisection errors when the fallback fails as well
/// * any error raised by `f` or `df`
pub fn calc_zero<F, G>(
    f: F,
    df: G,
    initial: &Dec,
    upper: &Dec,
    ignore_negative: bool,
    lower: LowerBound<'_>,
) -> Result<Dec, MathError>
where
    F: Fn(&Dec) -> Result<Dec, MathError>,
    G: Fn(&Dec) -> Result<Dec, MathError>,
{
    let eps = epsilon();
    if let Ok(root) = newton(&f, &df, initial, &eps, NEWTON_MAX_ITERATIONS) {
        if !(ignore_negative && root < Dec::zero()) {
            return Ok(root);
        }
    }

    let lower = match lower {
        LowerBound::Eager(bound) => bound,
        LowerBound::Lazy(thunk) => thunk(),
        LowerBound::Absent => return Err(MathError::NoBisectBounds),
    };
    bisect(&f, &lower, upper, &eps, BISECT_MAX_ITERATIONS)
}
