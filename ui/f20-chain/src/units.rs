//! Exact conversions between 18-decimal fixed-point wire integers and the
//! decimal strings shown in (and typed into) the views.

use alloy_primitives::U256;
use thiserror::Error;

/// Decimal places used by both the token and the native currency.
pub const DECIMALS: usize = 18;

/// `10^18`, one whole token (or one whole native unit) on the wire.
pub const SCALE: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UnitsError {
    #[error("amount is empty")]
    Empty,

    #[error("`{0}` is not a decimal amount")]
    Malformed(String),

    #[error("`{0}` has more than 18 decimal places")]
    TooPrecise(String),

    #[error("amount must be greater than zero")]
    NotPositive,

    #[error("amount does not fit in 256 bits")]
    Overflow,
}

/// Parses a human decimal string into its 18-decimal wire value.
pub fn parse_units(text: &str) -> Result<U256, UnitsError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction)
    {
        return Err(UnitsError::Malformed(text.to_string()));
    }
    if fraction.len() > DECIMALS {
        return Err(UnitsError::TooPrecise(text.to_string()));
    }

    let whole = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| UnitsError::Overflow)?
    };
    let fraction = if fraction.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{fraction:0<width$}", width = DECIMALS);
        U256::from_str_radix(&padded, 10).map_err(|_| UnitsError::Overflow)?
    };

    whole
        .checked_mul(SCALE)
        .and_then(|v| v.checked_add(fraction))
        .ok_or(UnitsError::Overflow)
}

/// Like [`parse_units`] but zero is refused too.
pub fn parse_positive(text: &str) -> Result<U256, UnitsError> {
    let value = parse_units(text)?;
    if value.is_zero() {
        return Err(UnitsError::NotPositive);
    }
    Ok(value)
}

/// Renders a wire value as a decimal string, always with at least one
/// fractional digit (`1.0`, `0.5`, `1234.000001`).
pub fn format_units(value: U256) -> String {
    let whole = value / SCALE;
    // Remainder is below 10^18 and therefore lives entirely in the low limb.
    let fraction = (value % SCALE).as_limbs()[0];

    let mut fraction = format!("{fraction:0>width$}", width = DECIMALS);
    while fraction.len() > 1 && fraction.ends_with('0') {
        fraction.pop();
    }
    format!("{whole}.{fraction}")
}

/// Total native-currency payment for `quantity` tokens at `price` per token.
///
/// Both operands are 18-decimal wire values, so the product carries 36
/// decimals and is divided back down by `10^18`, truncating.
pub fn purchase_cost(quantity: U256, price: U256) -> Result<U256, UnitsError> {
    quantity
        .checked_mul(price)
        .map(|product| product / SCALE)
        .ok_or(UnitsError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(n: u64) -> U256 {
        U256::from(n) * SCALE
    }

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!(parse_units("2").unwrap(), tokens(2));
        assert_eq!(parse_units(" 0.5 ").unwrap(), SCALE / U256::from(2));
        assert_eq!(parse_units(".25").unwrap(), SCALE / U256::from(4));
        assert_eq!(parse_units("3.").unwrap(), tokens(3));
        assert_eq!(
            parse_units("0.000000000000000001").unwrap(),
            U256::from(1u64)
        );
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_units(""), Err(UnitsError::Empty));
        assert_eq!(parse_units("   "), Err(UnitsError::Empty));
        assert!(matches!(parse_units("."), Err(UnitsError::Malformed(_))));
        assert!(matches!(parse_units("-1"), Err(UnitsError::Malformed(_))));
        assert!(matches!(parse_units("1e3"), Err(UnitsError::Malformed(_))));
        assert!(matches!(parse_units("1.2.3"), Err(UnitsError::Malformed(_))));
        assert!(matches!(
            parse_units("0.0000000000000000001"),
            Err(UnitsError::TooPrecise(_))
        ));
        assert_eq!(parse_units(&"9".repeat(80)), Err(UnitsError::Overflow));
    }

    #[test]
    fn positive_parse_refuses_zero() {
        assert_eq!(parse_positive("0"), Err(UnitsError::NotPositive));
        assert_eq!(parse_positive("0.000"), Err(UnitsError::NotPositive));
        assert_eq!(parse_positive("1").unwrap(), tokens(1));
    }

    #[test]
    fn formats_like_a_wallet() {
        assert_eq!(format_units(U256::ZERO), "0.0");
        assert_eq!(format_units(tokens(1)), "1.0");
        assert_eq!(format_units(SCALE / U256::from(2)), "0.5");
        assert_eq!(format_units(U256::from(1u64)), "0.000000000000000001");
        assert_eq!(
            format_units(tokens(1234) + U256::from(1_000_000_000_000u64)),
            "1234.000001"
        );
    }

    #[test]
    fn format_then_parse_is_identity() {
        let samples = [
            U256::ZERO,
            U256::from(1u64),
            U256::from(999_999_999_999_999_999u64),
            SCALE,
            tokens(21_000_000) + U256::from(42u64),
            U256::MAX,
        ];
        for n in samples {
            assert_eq!(parse_units(&format_units(n)).unwrap(), n, "value {n}");
        }
    }

    #[test]
    fn cost_is_scaled_back_down() {
        assert_eq!(purchase_cost(tokens(2), tokens(1)).unwrap(), tokens(2));

        let half = parse_units("0.5").unwrap();
        let cost = purchase_cost(parse_units("10").unwrap(), half).unwrap();
        assert_eq!(cost, tokens(5));
        assert_eq!(format_units(cost), "5.0");
    }

    #[test]
    fn cost_truncates_sub_wei_remainders() {
        // 1 wei of token at 0.5 per token costs half a wei, which floors to zero.
        let half = SCALE / U256::from(2);
        assert_eq!(purchase_cost(U256::from(1u64), half).unwrap(), U256::ZERO);
        assert_eq!(purchase_cost(U256::from(3u64), half).unwrap(), U256::from(1u64));
    }

    #[test]
    fn cost_overflow_is_an_error() {
        assert_eq!(
            purchase_cost(U256::MAX, tokens(2)),
            Err(UnitsError::Overflow)
        );
    }
}
