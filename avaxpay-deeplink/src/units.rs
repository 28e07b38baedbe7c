//! Conversion between human decimal amounts and smallest-unit integers

use crate::{Error, Result};

/// Decimals of the native asset (AVAX)
pub const NATIVE_DECIMALS: u8 = 18;

/// Decimals of the supported stablecoins (USDC, USDT)
pub const STABLECOIN_DECIMALS: u8 = 6;

/// Parse a decimal amount string into smallest units.
///
/// The conversion is exact: `"1.5"` with 18 decimals is
/// `1_500_000_000_000_000_000`. Zero, negative and malformed amounts are
/// rejected, as are amounts with more fractional digits than `decimals`.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<u128> {
    let amount_str = amount.trim();

    if amount_str.is_empty() {
        return Err(Error::InvalidAmount("Empty amount".to_string()));
    }

    let (whole_part, frac_part) = match amount_str.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (amount_str, ""),
    };

    if frac_part.contains('.') {
        return Err(Error::InvalidAmount(format!(
            "Multiple decimal points: {}",
            amount_str
        )));
    }
    if whole_part.is_empty() && frac_part.is_empty() {
        return Err(Error::InvalidAmount(format!("No digits: {}", amount_str)));
    }
    if !whole_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidAmount(format!(
            "Invalid whole part: {}",
            whole_part
        )));
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidAmount(format!(
            "Invalid fractional part: {}",
            frac_part
        )));
    }

    let significant_frac = frac_part.trim_end_matches('0');
    if significant_frac.len() > decimals as usize {
        return Err(Error::TooManyDecimalPlaces {
            amount: amount_str.to_string(),
            max: decimals,
        });
    }

    let overflow = || Error::InvalidAmount(format!("Amount overflow: {}", amount_str));
    let multiplier = 10u128.checked_pow(decimals as u32).ok_or_else(overflow)?;

    let whole_units = if whole_part.is_empty() {
        0
    } else {
        whole_part
            .parse::<u128>()
            .map_err(|_| overflow())?
            .checked_mul(multiplier)
            .ok_or_else(overflow)?
    };

    let frac_units = if significant_frac.is_empty() {
        0
    } else {
        let padded = format!("{:0<width$}", significant_frac, width = decimals as usize);
        padded.parse::<u128>().map_err(|_| overflow())?
    };

    let total = whole_units.checked_add(frac_units).ok_or_else(overflow)?;
    if total == 0 {
        return Err(Error::InvalidAmount(
            "Amount must be greater than 0".to_string(),
        ));
    }
    Ok(total)
}

/// Format smallest units as a decimal string.
///
/// Trailing fractional zeros are stripped and whole amounts have no decimal
/// point, so this is the exact inverse of [`parse_amount`] for canonical
/// input.
pub fn format_units(value: u128, decimals: u8) -> String {
    let decimals = decimals as usize;
    if decimals == 0 {
        return value.to_string();
    }

    let digits = format!("{:0>width$}", value, width = decimals + 1);
    let (whole, frac) = digits.split_at(digits.len() - decimals);
    let trimmed = frac.trim_end_matches('0');

    if trimmed.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, trimmed)
    }
}

/// Lenient numeric gate: the amount parses as a finite number greater than zero.
pub fn parse_positive_amount(amount: &str) -> Option<f64> {
    amount
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

/// Convert smallest units to a floating point value for display math.
pub fn units_to_f64(value: u128, decimals: u8) -> f64 {
    value as f64 / 10f64.powi(decimals as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEI: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_amount_parsing() {
        assert_eq!(parse_amount("1", 18).unwrap(), WEI);
        assert_eq!(parse_amount("1.5", 18).unwrap(), WEI + WEI / 2);
        assert_eq!(parse_amount("0.000001", 6).unwrap(), 1);
        assert_eq!(parse_amount("100.25", 6).unwrap(), 100_250_000);
        assert_eq!(parse_amount(".5", 6).unwrap(), 500_000);
        assert_eq!(parse_amount("1.", 6).unwrap(), 1_000_000);
        assert_eq!(parse_amount("2.500", 2).unwrap(), 250);
    }

    #[test]
    fn test_amount_parsing_rejects() {
        assert!(parse_amount("", 18).is_err());
        assert!(parse_amount("0", 18).is_err());
        assert!(parse_amount("0.000", 18).is_err());
        assert!(parse_amount("-1", 18).is_err());
        assert!(parse_amount("abc", 18).is_err());
        assert!(parse_amount("1.2.3", 18).is_err());
        assert!(parse_amount(".", 18).is_err());
        assert!(matches!(
            parse_amount("1.0000001", 6),
            Err(Error::TooManyDecimalPlaces { max: 6, .. })
        ));
        assert!(parse_amount("999999999999999999999999999999", 18).is_err());
    }

    #[test]
    fn test_units_formatting() {
        assert_eq!(format_units(WEI, 18), "1");
        assert_eq!(format_units(WEI + WEI / 2, 18), "1.5");
        assert_eq!(format_units(1, 6), "0.000001");
        assert_eq!(format_units(0, 6), "0");
        assert_eq!(format_units(123_456_789, 6), "123.456789");
        assert_eq!(format_units(42, 0), "42");
    }

    #[test]
    fn test_units_roundtrip() {
        for amount in ["1.5", "0.1", "100", "12345.678901", "0.000000000000000001"] {
            let units = parse_amount(amount, 18).unwrap();
            assert_eq!(format_units(units, 18), amount);
        }
        assert_eq!(format_units(parse_amount("1.5", 18).unwrap(), 18), "1.5");
    }

    #[test]
    fn test_positive_amount_gate() {
        assert_eq!(parse_positive_amount("1.5"), Some(1.5));
        assert_eq!(parse_positive_amount(" 2 "), Some(2.0));
        assert_eq!(parse_positive_amount("0"), None);
        assert_eq!(parse_positive_amount("-3"), None);
        assert_eq!(parse_positive_amount("abc"), None);
        assert_eq!(parse_positive_amount("inf"), None);
        assert_eq!(parse_positive_amount("NaN"), None);
    }

    #[test]
    fn test_units_to_f64() {
        assert_eq!(units_to_f64(1_500_000, 6), 1.5);
        assert_eq!(units_to_f64(10 * WEI, 18), 10.0);
    }
}
