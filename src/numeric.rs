//! Fixed-point conversion between human decimal strings and the 18-decimal
//! integer representation used in signed order messages.
//!
//! All arithmetic goes through `rust_decimal`; native floats would drift on
//! inputs like "0.1" and misstate an order's economic terms.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{Result, SdkError};

/// Scale factor exponent shared by every signed field ("wei" scaling).
pub const FIXED_POINT_DECIMALS: u32 = 18;

/// Parse a human-entered decimal, rejecting non-numeric and negative input.
pub fn parse_decimal(input: &str) -> Result<Decimal> {
    let value = Decimal::from_str(input.trim())
        .map_err(|e| SdkError::Numeric(format!("invalid decimal '{}': {}", input, e)))?;
    if value.is_sign_negative() {
        return Err(SdkError::Numeric(format!(
            "negative value not allowed: '{}'",
            input
        )));
    }
    Ok(value)
}

/// Scale a decimal string by 10^18, truncating toward zero.
///
/// Truncation means an entry with more than 18 fractional digits can never
/// overstate a quantity, price, or leverage.
pub fn to_fixed_point(input: &str) -> Result<u128> {
    decimal_to_fixed_point(parse_decimal(input)?)
}

/// Scale an already-parsed decimal by 10^18, truncating toward zero.
pub fn decimal_to_fixed_point(value: Decimal) -> Result<u128> {
    if value.is_sign_negative() {
        return Err(SdkError::Numeric(format!(
            "negative value not allowed: '{}'",
            value
        )));
    }

    // Work on the mantissa/scale pair directly; multiplying the Decimal by
    // 10^18 would overflow its 96-bit mantissa long before u128 does.
    let mantissa = value.mantissa().unsigned_abs();
    let scale = value.scale();

    if scale <= FIXED_POINT_DECIMALS {
        let shift = 10u128
            .checked_pow(FIXED_POINT_DECIMALS - scale)
            .ok_or_else(|| SdkError::Numeric(format!("scale out of range: {}", scale)))?;
        mantissa
            .checked_mul(shift)
            .ok_or_else(|| SdkError::Numeric(format!("value too large: '{}'", value)))
    } else {
        // Excess fractional digits are dropped, never rounded up.
        let shift = 10u128
            .checked_pow(scale - FIXED_POINT_DECIMALS)
            .ok_or_else(|| SdkError::Numeric(format!("scale out of range: {}", scale)))?;
        Ok(mantissa / shift)
    }
}

/// Inverse of [`to_fixed_point`] for values within `rust_decimal` range.
pub fn from_fixed_point(value: u128) -> Result<Decimal> {
    let signed = i128::try_from(value)
        .map_err(|_| SdkError::Numeric(format!("fixed-point value too large: {}", value)))?;
    let decimal = Decimal::try_from_i128_with_scale(signed, FIXED_POINT_DECIMALS)
        .map_err(|e| SdkError::Numeric(format!("fixed-point value too large: {}", e)))?;
    Ok(decimal.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_within_scale() {
        for input in ["1.5", "0.01", "10", "185.5", "0.000000000000000001"] {
            let fixed = to_fixed_point(input).unwrap();
            let back = from_fixed_point(fixed).unwrap();
            assert_eq!(back, Decimal::from_str(input).unwrap(), "input {}", input);
        }
    }

    #[test]
    fn test_known_scalings() {
        assert_eq!(to_fixed_point("1").unwrap(), 10u128.pow(18));
        assert_eq!(to_fixed_point("1.5").unwrap(), 1_500_000_000_000_000_000);
        assert_eq!(to_fixed_point("0.01").unwrap(), 10_000_000_000_000_000);
        assert_eq!(to_fixed_point("0").unwrap(), 0);
    }

    #[test]
    fn test_truncates_excess_precision() {
        // 19 fractional digits; the trailing 9 must be dropped, not rounded
        assert_eq!(to_fixed_point("0.0000000000000000019").unwrap(), 1);
    }

    #[test]
    fn test_rejects_negative() {
        assert!(matches!(
            to_fixed_point("-1.5"),
            Err(SdkError::Numeric(_))
        ));
    }

    #[test]
    fn test_rejects_non_numeric() {
        for input in ["", "abc", "1.2.3", "1e5x"] {
            assert!(
                matches!(to_fixed_point(input), Err(SdkError::Numeric(_))),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_precision_beyond_f64() {
        // 1.000000000000000001 is indistinguishable from 1.0 as an f64
        let fixed = to_fixed_point("1.000000000000000001").unwrap();
        assert_eq!(fixed, 1_000_000_000_000_000_001);
    }
}
