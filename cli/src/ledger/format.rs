//! Number, currency and date rendering for the ledger.
//!
//! Values render with a decimal comma and a dot for thousands, always with
//! two fractional digits. Currency amounts carry the `R$` symbol.

pub const CURRENCY_SYMBOL: &str = "R$";

/// Placeholder shown for an unset date.
pub const MISSING_DATE: &str = "N/A";

pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0,00".to_string();
    }

    // Saturates at u128::MAX cents (about 3.4e36): larger magnitudes print
    // that ceiling instead of their own digits.
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{},{:02}", sign, grouped, fraction)
}

pub fn format_currency(value: f64) -> String {
    format!("{} {}", CURRENCY_SYMBOL, format_number(value))
}

/// Renders a ratio as a percentage number, e.g. `1.5` -> `"150,00"`.
pub fn format_percent(ratio: f64) -> String {
    format_number(ratio * 100.0)
}

/// Reorders a stored `YYYY-MM-DD` string into `DD/MM/YYYY`.
///
/// The fields are not validated; missing ones come out empty.
pub fn format_date(date: &str) -> String {
    if date.is_empty() {
        return MISSING_DATE.to_string();
    }
    let mut parts = date.split('-');
    let year = parts.next().unwrap_or("");
    let month = parts.next().unwrap_or("");
    let day = parts.next().unwrap_or("");
    format!("{}/{}/{}", day, month, year)
}

/// Reads a currency field: non-digits are dropped and the remaining digits
/// are taken as minor units (cents).
pub fn parse_minor_units(input: &str) -> f64 {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return 0.0;
    }
    let cents = digits.parse::<u64>().unwrap_or(u64::MAX);
    cents as f64 / 100.0
}

/// Digit string a currency field holds for `value`; empty for zero.
pub fn minor_unit_digits(value: f64) -> String {
    if !value.is_finite() || value <= 0.0 {
        return String::new();
    }
    format!("{}", (value * 100.0).round() as u64)
}

/// Appends a typed digit to a currency value.
pub fn push_digit(value: f64, digit: char) -> f64 {
    let mut digits = minor_unit_digits(value);
    digits.push(digit);
    parse_minor_units(&digits)
}

/// Drops the last typed digit from a currency value.
pub fn pop_digit(value: f64) -> f64 {
    let mut digits = minor_unit_digits(value);
    digits.pop();
    parse_minor_units(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_grouping() {
        assert_eq!(format_number(0.0), "0,00");
        assert_eq!(format_number(5.5), "5,50");
        assert_eq!(format_number(999.99), "999,99");
        assert_eq!(format_number(1000.0), "1.000,00");
        assert_eq!(format_number(10_000_000.0), "10.000.000,00");
        assert_eq!(format_number(123_456.789), "123.456,79");
    }

    #[test]
    fn test_format_number_non_finite() {
        assert_eq!(format_number(f64::NAN), "0,00");
        assert_eq!(format_number(f64::INFINITY), "0,00");
    }

    #[test]
    fn test_format_number_saturates_huge_values() {
        let ceiling = format_number(1e40);
        assert!(ceiling.starts_with("3.402.823.669"));
        assert!(ceiling.ends_with(",55"));
        assert_eq!(format_number(1e45), ceiling);
    }

    #[test]
    fn test_format_number_negative() {
        assert_eq!(format_number(-1234.5), "-1.234,50");
        assert_eq!(format_number(-0.001), "0,00");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(5_000_000.0), "R$ 5.000.000,00");
        assert_eq!(format_currency(f64::NAN), "R$ 0,00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(10.0 / 7.0), "142,86");
        assert_eq!(format_percent(0.0), "0,00");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2026-12-11"), "11/12/2026");
        assert_eq!(format_date(""), "N/A");
        assert_eq!(format_date("2026-12"), "/12/2026");
        assert_eq!(format_date("garbage"), "//garbage");
    }

    #[test]
    fn test_parse_minor_units() {
        assert_eq!(parse_minor_units("500000"), 5000.00);
        assert_eq!(parse_minor_units(""), 0.0);
        assert_eq!(parse_minor_units("R$ 1.234,56"), 1234.56);
        assert_eq!(parse_minor_units("abc"), 0.0);
    }

    #[test]
    fn test_keystroke_editing() {
        let mut value = 0.0;
        for digit in "123456".chars() {
            value = push_digit(value, digit);
        }
        assert_eq!(value, 1234.56);
        assert_eq!(minor_unit_digits(value), "123456");

        value = pop_digit(value);
        assert_eq!(value, 123.45);
        assert_eq!(pop_digit(0.0), 0.0);
        assert_eq!(minor_unit_digits(0.0), "");
    }
}
