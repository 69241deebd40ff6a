//! Swap simulation for `x·y = k` pools.
//!
//! Constant-product pools operate directly on raw integer amounts; only the
//! fee math runs through decimals. Outputs round down, required inputs round
//! up, so a quote is never better than what the chain would give.

use alloy::primitives::U256;
use bigdecimal::One;

use crate::arb::decimal::{div, from_raw, to_raw_ceil, to_raw_floor, Dec};
use crate::arb::error::SwapError;

/// Net output for a swap of `amount_in` against reserves
/// `(reserve_in, reserve_out)` with the combined fee rate `fee` taken from
/// the gross output.
///
/// # Errors
/// * `Nonconvergent` wrapping a decimal failure on empty reserves
pub fn simulate_swap(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee: &Dec,
) -> Result<U256, SwapError> {
    let gross = gross_output(amount_in, reserve_in, reserve_out)?;
    let net = &gross * &(Dec::one() - fee);
    Ok(to_raw_floor(&net, 0)?)
}

/// Required input for a desired net output of `amount_out`, inverting the
/// swap formula with the fee applied to the output.
///
/// # Errors
/// * `InsufficientLiquidity` when the gross requirement reaches the output
///   reserve
pub fn simulate_reverse(
    amount_out: U256,
    reserve_in: U256,
    reserve_out: U256,
    fee: &Dec,
) -> Result<U256, SwapError> {
    let x = from_raw(reserve_in, 0);
    let y = from_raw(reserve_out, 0);
    let net = from_raw(amount_out, 0);

    let gross = div(&net, &(Dec::one() - fee))?;
    if gross >= y {
        return Err(SwapError::InsufficientLiquidity {
            requested: gross,
            available: y,
        });
    }
    let input = div(&(&x * &gross), &(&y - &gross))?;
    Ok(to_raw_ceil(&input, 0)?)
}

/// Price impact of a swap as the unrounded fraction `paid/market − 1`,
/// where `market = X/Y` and `paid` is the average rate actually obtained.
///
/// # Errors
/// * `Nonconvergent` wrapping a decimal failure on empty reserves or a zero
///   input
pub fn price_impact(
    amount_in: U256,
    reserve_in: U256,
    reserve_out: U256,
) -> Result<Dec, SwapError> {
    let gross = gross_output(amount_in, reserve_in, reserve_out)?;
    let market = div(&from_raw(reserve_in, 0), &from_raw(reserve_out, 0))?;
    let paid = div(&from_raw(amount_in, 0), &gross)?;
    Ok(div(&paid, &market)? - Dec::one())
}

/// `Y − X·Y/(X + Δx)`, the fee-free amount leaving the pool.
fn gross_output(amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<Dec, SwapError> {
    let x = from_raw(reserve_in, 0);
    let y = from_raw(reserve_out, 0);
    let dx = from_raw(amount_in, 0);
    Ok(&y - &div(&(&x * &y), &(&x + &dx))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    const FEE: &str = "0.003";

    #[test]
    fn test_simulate_swap() {
        for (amount_in, reserve_in, reserve_out, expected) in &[
            // amount_in, reserve_in, reserve_out, net out
            (1_000u64, 1_000_000u64, 1_000_000u64, 996u64),
            (100, 1_000, 2_000, 181),
            (1, 1_000_000, 1_000_000, 0),
            (500_000, 1_000_000, 1_000_000, 332_333),
        ] {
            let out = simulate_swap(
                U256::from(*amount_in),
                U256::from(*reserve_in),
                U256::from(*reserve_out),
                &dec(FEE),
            )
            .unwrap();
            assert_eq!(out, U256::from(*expected), "input {amount_in}");
        }
    }

    #[test]
    fn test_product_never_decreases() {
        let reserve_in = U256::from(1_000_000u64);
        let reserve_out = U256::from(2_000_000u64);
        let k = reserve_in * reserve_out;
        for amount_in in &[1u64, 10, 1_000, 50_000, 1_000_000] {
            let amount_in = U256::from(*amount_in);
            let out = simulate_swap(amount_in, reserve_in, reserve_out, &dec(FEE)).unwrap();
            let k_after = (reserve_in + amount_in) * (reserve_out - out);
            assert!(k_after >= k, "product shrank for input {amount_in}");
        }
    }

    #[test]
    fn test_simulate_reverse() {
        // forward of 1000 nets 996; the reverse quote must land within one
        // raw unit of the original input
        let reserve = U256::from(1_000_000u64);
        let input = simulate_reverse(U256::from(996u64), reserve, reserve, &dec(FEE)).unwrap();
        assert_eq!(input, U256::from(1_000u64));
    }

    #[test]
    fn test_round_trip_within_one_unit() {
        let reserve_in = U256::from(3_000_000u64);
        let reserve_out = U256::from(1_500_000u64);
        for amount_in in &[1_000u64, 7_777, 250_000] {
            let amount_in = U256::from(*amount_in);
            let out = simulate_swap(amount_in, reserve_in, reserve_out, &dec(FEE)).unwrap();
            let back = simulate_reverse(out, reserve_in, reserve_out, &dec(FEE)).unwrap();
            let difference = back.abs_diff(amount_in);
            assert!(difference <= U256::from(1u64), "drifted by {difference}");
        }
    }

    #[test]
    fn test_insufficient_liquidity() {
        // a net request of 997000 grosses to exactly the full reserve
        let result = simulate_reverse(
            U256::from(997_000u64),
            U256::from(1_000_000u64),
            U256::from(1_000_000u64),
            &dec(FEE),
        );
        assert!(matches!(
            result,
            Err(SwapError::InsufficientLiquidity { .. })
        ));
    }

    #[test]
    fn test_price_impact() {
        let impact = price_impact(
            U256::from(1_000u64),
            U256::from(1_000_000u64),
            U256::from(1_000_000u64),
        )
        .unwrap();
        // paid/market − 1 = (X + Δx)/X − 1 = 0.001 for balanced reserves
        assert!((impact - dec("0.001")).abs() < dec("1e-12"));
    }
}
