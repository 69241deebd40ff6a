//! Closed-form optimal borrow size for a three-pool constant-product cycle.
//!
//! For a cycle base → t1 → t2 → base over three `x·y = k` pools the profit
//! curve in the borrow size is unimodal and its stationary points solve a
//! quadratic. Reserves are named along the direction of travel:
//!
//! ```text
//! pool 0: (base0, x0)   borrow leg,  base in, t1 out
//! pool 1: (x1, y1)      middle leg,  t1 in,   t2 out
//! pool 2: (y2, base2)   repay leg,   t2 in,   base out
//! ```
//!
//! The two roots correspond to the two directions the cycle can be pushed;
//! the caller keeps whichever is positive and caps it at its borrow limit.

use bigdecimal::One;

use crate::arb::decimal::{div, sqrt, Dec};
use crate::arb::error::MathError;

/// Reserves and fees of a three-pool cycle, oriented along the travel
/// direction.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleReserves {
    /// Base-token reserve of the borrow-leg pool
    pub base0: Dec,
    /// t1 reserve of the borrow-leg pool
    pub x0: Dec,
    /// t1 reserve of the middle pool
    pub x1: Dec,
    /// t2 reserve of the middle pool
    pub y1: Dec,
    /// t2 reserve of the repay-leg pool
    pub y2: Dec,
    /// Base-token reserve of the repay-leg pool
    pub base2: Dec,
    /// Combined fee of the borrow-leg pool
    pub fee0: Dec,
    /// Combined fee of the middle pool
    pub fee1: Dec,
    /// Combined fee of the repay-leg pool
    pub fee2: Dec,
}

/// Both stationary points of the cycle profit curve, `−(t1 ± √S)/D`.
/// The first carries the `+√S` branch, the second the `−√S` branch; a
/// profitable cycle shows up as a positive second root.
///
/// # Errors
/// * `NegativeSqrt` when the discriminant is negative
/// * `DivisionByZero` when the denominator collapses
pub fn optimal_borrow_sizes(cycle: &CycleReserves) -> Result<(Dec, Dec), MathError> {
    let one = Dec::one();
    let CycleReserves {
        base0,
        x0,
        x1,
        y1,
        y2,
        base2,
        fee0,
        fee1,
        fee2,
    } = cycle;

    let t1 = base0 * x1 * y2;

    // the fee cascade under the radical; f is negative below full fees
    let f = base0 * base2 * &(fee0 - &one);
    let f1 = &f * fee1;
    let f2 = (&f - &f1) * fee2;
    let s = -((&f - &f1 - f2) * x0 * x1 * y1 * y2);
    let radical = sqrt(&s)?;

    let denominator = ((fee0 - &one) * fee1 - fee0 + &one) * x0 * y1
        - ((fee0 - &one) * x0 - x1) * y2;

    let with_plus = div(&-(&t1 + &radical), &denominator)?;
    let with_minus = div(&-(&t1 - &radical), &denominator)?;
    Ok((with_plus, with_minus))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    fn cycle(base2: &str) -> CycleReserves {
        CycleReserves {
            base0: dec("100000"),
            x0: dec("100000"),
            x1: dec("100000"),
            y1: dec("100000"),
            y2: dec("100000"),
            base2: dec(base2),
            fee0: dec("0.003"),
            fee1: dec("0.003"),
            fee2: dec("0.003"),
        }
    }

    /// Net output of one constant-product leg in decimals
    fn leg(amount: &Dec, reserve_in: &Dec, reserve_out: &Dec) -> Dec {
        let gross = reserve_out - &div(&(reserve_in * reserve_out), &(reserve_in + amount)).unwrap();
        gross * (Dec::one() - dec("0.003"))
    }

    fn cycle_output(cycle: &CycleReserves, amount: &Dec) -> Dec {
        let t1 = leg(amount, &cycle.base0, &cycle.x0);
        let t2 = leg(&t1, &cycle.x1, &cycle.y1);
        leg(&t2, &cycle.y2, &cycle.base2)
    }

    #[test]
    fn test_profitable_cycle_roots() {
        let cycle = cycle("104000");
        let (with_plus, with_minus) = optimal_borrow_sizes(&cycle).unwrap();
        assert!(with_plus < Dec::from(0));
        assert!((with_minus - dec("508.799161665952")).abs() < dec("1e-6"));
    }

    #[test]
    fn test_root_maximizes_simulated_profit() {
        let reserves = cycle("104000");
        let (_, root) = optimal_borrow_sizes(&reserves).unwrap();
        let best = cycle_output(&reserves, &root) - &root;
        for nearby in &["400", "450", "550", "600"] {
            let amount = dec(nearby);
            let profit = cycle_output(&reserves, &amount) - &amount;
            assert!(best >= profit, "beaten at {nearby}");
        }
        assert!(best > Dec::from(7), "profit {best}");
    }

    #[test]
    fn test_balanced_cycle_has_no_positive_root() {
        let (with_plus, with_minus) = optimal_borrow_sizes(&cycle("100000")).unwrap();
        assert!(with_plus < Dec::from(0));
        assert!(with_minus < Dec::from(0));
    }
}
