use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Normalizes raw keystrokes into a decimal numeral.
///
/// Non-digits are dropped, every separator after the first is removed (its
/// digits join the fractional part), redundant leading zeros collapse and the
/// fraction is cut to `max_decimals` digits without rounding.
pub fn sanitize_input(raw: &str, max_decimals: usize) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return String::new();
    }

    let (int_part, frac_part) = match cleaned.split_once('.') {
        Some((int_part, rest)) => (int_part, Some(rest.replace('.', ""))),
        None => (cleaned.as_str(), None),
    };

    let int_part = if int_part.len() > 1 && int_part.starts_with('0') {
        match int_part.trim_start_matches('0') {
            "" => "0",
            trimmed => trimmed,
        }
    } else {
        int_part
    };

    match frac_part {
        Some(frac) => {
            let kept = &frac[..frac.len().min(max_decimals)];
            format!("{}.{}", int_part, kept)
        }
        None => int_part.to_string(),
    }
}

/// Parses a sanitized numeral, accepting the partial forms `".5"` and `"5."`.
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let value = value.trim().trim_end_matches('.');
    if value.is_empty() {
        return None;
    }

    if value.starts_with('.') {
        Decimal::from_str(&format!("0{}", value)).ok()
    } else {
        Decimal::from_str(value).ok()
    }
}

/// Rounds to `places` fractional digits and drops trailing zeros.
pub fn format_for_display(amount: Decimal, places: u32) -> String {
    amount
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string()
}

/// Formats a derived amount at full precision, truncating past `places`.
pub fn format_full_precision(amount: Decimal, places: u32) -> String {
    amount
        .round_dp_with_strategy(places, RoundingStrategy::ToZero)
        .normalize()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MAX_INPUT_DECIMALS;
    use rust_decimal_macros::dec;

    fn sanitize(raw: &str) -> String {
        sanitize_input(raw, MAX_INPUT_DECIMALS)
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize("abc"), "");
    }

    #[test]
    fn test_sanitize_leading_zeros() {
        assert_eq!(sanitize("00"), "0");
        assert_eq!(sanitize("0"), "0");
        assert_eq!(sanitize("007"), "7");
        assert_eq!(sanitize("000.25"), "0.25");
        assert_eq!(sanitize("0.5"), "0.5");
    }

    #[test]
    fn test_sanitize_keeps_trailing_zeros() {
        assert_eq!(sanitize("0.500"), "0.500");
        assert_eq!(sanitize("10"), "10");
    }

    #[test]
    fn test_sanitize_extra_separators_join_fraction() {
        assert_eq!(sanitize("1.2.3"), "1.23");
        assert_eq!(sanitize("1..5"), "1.5");
    }

    #[test]
    fn test_sanitize_strips_non_numeric() {
        assert_eq!(sanitize("abc12.5xyz"), "12.5");
        assert_eq!(sanitize("-3,000"), "3000");
        assert_eq!(sanitize(" 4 2 "), "42");
    }

    #[test]
    fn test_sanitize_partial_input() {
        assert_eq!(sanitize("."), ".");
        assert_eq!(sanitize("5."), "5.");
        assert_eq!(sanitize(".5"), ".5");
    }

    #[test]
    fn test_sanitize_truncates_without_rounding() {
        let raw = format!("1.{}", "1".repeat(20));
        assert_eq!(sanitize(&raw), format!("1.{}", "1".repeat(18)));

        let raw = format!("0.{}", "9".repeat(20));
        assert_eq!(sanitize(&raw), format!("0.{}", "9".repeat(18)));
    }

    #[test]
    fn test_sanitize_custom_max_decimals() {
        assert_eq!(sanitize_input("1.23456", 2), "1.23");
        assert_eq!(sanitize_input("1.5", 0), "1.");
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for raw in ["0", "0.500", "12.5", "1.23", "7", "0.000000000000000001", ".5", "5."] {
            let once = sanitize(raw);
            assert_eq!(sanitize(&once), once, "not idempotent for {}", raw);
        }
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("0.1"), Some(dec!(0.1)));
        assert_eq!(parse_decimal(".5"), Some(dec!(0.5)));
        assert_eq!(parse_decimal("5."), Some(dec!(5)));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("."), None);
    }

    #[test]
    fn test_format_for_display() {
        assert_eq!(format_for_display(dec!(1.5), 5), "1.5");
        assert_eq!(format_for_display(dec!(0.123456789), 5), "0.12346");
        assert_eq!(format_for_display(dec!(0.095), 2), "0.1");
        assert_eq!(format_for_display(Decimal::ZERO, 5), "0");
    }

    #[test]
    fn test_format_full_precision() {
        assert_eq!(format_full_precision(dec!(0.2000), 18), "0.2");
        assert_eq!(
            format_full_precision(dec!(0.3333333333333333333333333333), 18),
            "0.333333333333333333"
        );
        assert_eq!(format_full_precision(dec!(2), 18), "2");
    }
}
