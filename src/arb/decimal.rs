//! Arbitrary-precision decimal arithmetic for pool math.
//!
//! Wraps `bigdecimal` so that every inexact operation (division, square
//! root, power) lands on a fixed number of fractional digits. Addition,
//! subtraction and multiplication are exact and go through the native
//! operators. There is no global precision state; callers that want the
//! contract go through this module.

use alloy::primitives::U256;
use bigdecimal::num_bigint::{BigInt, Sign};
use bigdecimal::{BigDecimal, One, RoundingMode, ToPrimitive, Zero};

use crate::arb::error::MathError;

/// The decimal type used throughout the engine.
pub type Dec = BigDecimal;

/// Fractional digits kept by inexact operations.
pub const SCALE: i64 = 30;

/// Checked division, rescaled to [`SCALE`] fractional digits.
///
/// # Errors
/// * `DivisionByZero` when `divisor` is zero
pub fn div(dividend: &Dec, divisor: &Dec) -> Result<Dec, MathError> {
    if divisor.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    Ok((dividend / divisor).with_scale_round(SCALE, RoundingMode::HalfEven))
}

/// Square root of a non-negative decimal, rescaled to [`SCALE`].
///
/// # Errors
/// * `NegativeSqrt` when `value` is negative
pub fn sqrt(value: &Dec) -> Result<Dec, MathError> {
    value
        .sqrt()
        .map(|root| root.with_scale_round(SCALE, RoundingMode::HalfEven))
        .ok_or(MathError::NegativeSqrt)
}

/// Integer power by repeated squaring. Negative exponents go through the
/// reciprocal. The exponent is a decimal for the callers' convenience but
/// must hold an integer value.
///
/// # Errors
/// * `NonIntegerExponent` when `exponent` has a fractional part or does not
///   fit an `i64`
/// * `DivisionByZero` when `base` is zero and `exponent` is negative
pub fn pow(base: &Dec, exponent: &Dec) -> Result<Dec, MathError> {
    if !exponent.is_integer() {
        return Err(MathError::NonIntegerExponent);
    }
    let Some(signed) = exponent.to_i64() else {
        return Err(MathError::NonIntegerExponent);
    };

    let mut remaining = signed.unsigned_abs();
    let mut result = Dec::one();
    let mut factor = base.clone();
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = &result * &factor;
        }
        remaining >>= 1;
        if remaining > 0 {
            factor = &factor * &factor;
        }
    }
    let result = result.with_scale_round(SCALE, RoundingMode::HalfEven);

    if signed < 0 {
        div(&Dec::one(), &result)
    } else {
        Ok(result)
    }
}

/// Exact conversion from a raw integer amount to its human-readable decimal
/// (`raw / 10^decimals`).
#[must_use]
pub fn from_raw(amount: U256, decimals: u8) -> Dec {
    let digits = BigInt::from_bytes_be(Sign::Plus, &amount.to_be_bytes::<32>());
    Dec::new(digits, i64::from(decimals))
}

/// Convert a human-readable decimal back to a raw amount, rounding down.
///
/// # Errors
/// * `RawOutOfRange` when `amount` is negative or exceeds 256 bits
pub fn to_raw_floor(amount: &Dec, decimals: u8) -> Result<U256, MathError> {
    to_raw(amount, decimals, RoundingMode::Floor)
}

/// Convert a human-readable decimal back to a raw amount, rounding up.
/// Used by reverse quotes so the reported input is always sufficient.
///
/// # Errors
/// * `RawOutOfRange` when `amount` is negative or exceeds 256 bits
pub fn to_raw_ceil(amount: &Dec, decimals: u8) -> Result<U256, MathError> {
    to_raw(amount, decimals, RoundingMode::Ceiling)
}

fn to_raw(amount: &Dec, decimals: u8, mode: RoundingMode) -> Result<U256, MathError> {
    if amount < &Dec::zero() {
        return Err(MathError::RawOutOfRange);
    }
    let scaled = amount * pow10(decimals);
    let (digits, _) = scaled.with_scale_round(0, mode).into_bigint_and_exponent();
    let (_, bytes) = digits.to_bytes_be();
    if bytes.len() > 32 {
        return Err(MathError::RawOutOfRange);
    }
    Ok(U256::from_be_slice(&bytes))
}

/// `10^decimals` as an exact decimal.
fn pow10(decimals: u8) -> Dec {
    Dec::new(BigInt::one(), -i64::from(decimals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Dec {
        Dec::from_str(s).unwrap()
    }

    #[test]
    fn test_div() {
        assert_eq!(div(&dec("10"), &dec("4")).unwrap(), dec("2.5"));
        assert_eq!(
            div(&dec("1"), &dec("0")),
            Err(MathError::DivisionByZero)
        );
    }

    #[test]
    fn test_div_keeps_thirty_fractional_digits() {
        let third = div(&Dec::one(), &dec("3")).unwrap();
        // 1/3 truncated at 30 digits, multiplied back out, is within 1e-29
        let residual = (third * dec("3") - Dec::one()).abs();
        assert!(residual < dec("1e-29"), "residual {residual}");
    }

    #[test]
    fn test_sqrt() {
        assert_eq!(sqrt(&dec("0")).unwrap(), dec("0").with_scale(SCALE));
        let root = sqrt(&dec("2")).unwrap();
        assert!((root.clone() * root - dec("2")).abs() < dec("1e-28"));
        assert_eq!(sqrt(&dec("-1")), Err(MathError::NegativeSqrt));
    }

    #[test]
    fn test_pow() {
        for (base, exponent, expected) in &[
            ("2", "10", "1024"),
            ("2", "0", "1"),
            ("2", "-2", "0.25"),
            ("10", "6", "1000000"),
            ("-3", "3", "-27"),
        ] {
            assert_eq!(
                pow(&dec(base), &dec(exponent)).unwrap(),
                dec(expected).with_scale(SCALE),
                "{base}^{exponent}"
            );
        }
        assert_eq!(
            pow(&dec("2"), &dec("0.5")),
            Err(MathError::NonIntegerExponent)
        );
    }

    #[test]
    fn test_from_raw() {
        assert_eq!(from_raw(U256::from(123_456_789u64), 6), dec("123.456789"));
        assert_eq!(from_raw(U256::from(42u64), 0), dec("42"));
        assert_eq!(from_raw(U256::ZERO, 18), dec("0").with_scale(18));
    }

    #[test]
    fn test_to_raw() {
        assert_eq!(
            to_raw_floor(&dec("123.4567891"), 6).unwrap(),
            U256::from(123_456_789u64)
        );
        assert_eq!(
            to_raw_ceil(&dec("123.4567891"), 6).unwrap(),
            U256::from(123_456_790u64)
        );
        assert_eq!(to_raw_floor(&dec("-1"), 0), Err(MathError::RawOutOfRange));
    }

    #[test]
    fn test_raw_round_trip() {
        for raw in &[0u64, 1, 996, 1_000_000, u64::MAX] {
            let amount = U256::from(*raw);
            for decimals in &[0u8, 6, 18] {
                assert_eq!(
                    to_raw_floor(&from_raw(amount, *decimals), *decimals).unwrap(),
                    amount
                );
            }
        }
    }
}
