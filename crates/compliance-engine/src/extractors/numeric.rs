// Numeric extraction utilities for form input
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Leading decimal literal, optionally signed, with optional exponent
    static ref LEADING_NUMBER: Regex =
        Regex::new(r"^\s*([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)").unwrap();
}

/// Reads the number a user typed into a form field
///
/// Follows browser form semantics: leading whitespace is skipped and the
/// longest leading decimal literal is used, so `"12.5 m"` reads as 12.5.
/// Returns `None` when no literal is present or the value is not finite.
pub fn parse_form_number(raw: &str) -> Option<f64> {
    let literal = LEADING_NUMBER.captures(raw)?.get(1)?.as_str();
    literal.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Reads a strictly positive number, the only kind any DB-SI input accepts
pub fn parse_positive(raw: &str) -> Option<f64> {
    parse_form_number(raw).filter(|v| *v > 0.0)
}

/// Formats a value for display with at most two decimals and no trailing zeros
pub fn format_number(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Formats a value followed by its unit, e.g. `2500 m²`
pub fn format_quantity(value: f64, unit: &str) -> String {
    format!("{} {}", format_number(value), unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_plain_numbers() {
        assert_eq!(parse_form_number("2000"), Some(2000.0));
        assert_eq!(parse_form_number("  3.5"), Some(3.5));
        assert_eq!(parse_form_number(".75"), Some(0.75));
        assert_eq!(parse_form_number("1e3"), Some(1000.0));
    }

    #[test]
    fn test_reads_leading_literal_only() {
        assert_eq!(parse_form_number("12.5 m"), Some(12.5));
        assert_eq!(parse_form_number("7,5"), Some(7.0));
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert_eq!(parse_form_number(""), None);
        assert_eq!(parse_form_number("abc"), None);
        assert_eq!(parse_form_number("m 12"), None);
        assert_eq!(parse_form_number("."), None);
    }

    #[test]
    fn test_positive_filter() {
        assert_eq!(parse_positive("0"), None);
        assert_eq!(parse_positive("-4"), None);
        assert_eq!(parse_positive("0.01"), Some(0.01));
    }

    #[test]
    fn test_format_number_trims_zeros() {
        assert_eq!(format_number(2500.0), "2500");
        assert_eq!(format_number(3.5), "3.5");
        assert_eq!(format_number(1.6), "1.6");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_quantity(10.0, "m"), "10 m");
    }
}
