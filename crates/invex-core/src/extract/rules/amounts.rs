//! Amount parsing for pivot aggregation.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::AMOUNT_VALUE;

/// Parse a value that is entirely an amount ("1.234,56 EUR", "€ 12.50", "7").
///
/// Text that merely contains digits ("Invoice 12") is not an amount.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let caps = AMOUNT_VALUE.captures(s)?;

    let cleaned: String = caps[1]
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-' | '+'))
        .collect();

    let commas = cleaned.matches(',').count();
    let dots = cleaned.matches('.').count();

    let normalized = match (commas, dots) {
        (0, 0) => cleaned,
        // 1,50 -> 1.50
        (1, 0) => cleaned.replace(',', "."),
        (0, 1) => cleaned,
        // 1,234,567 / 1.234.567 are thousand groups
        (_, 0) => cleaned.replace(',', ""),
        (0, _) => cleaned.replace('.', ""),
        _ => {
            // Both present: whichever comes last is the decimal separator
            let comma_pos = cleaned.rfind(',');
            let dot_pos = cleaned.rfind('.');
            match (comma_pos, dot_pos) {
                (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
                _ => cleaned.replace(',', ""),
            }
        }
    };

    Decimal::from_str(&normalized).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("123.45"), Some(dec("123.45")));
        assert_eq!(parse_amount("1234,56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("1.234,56 EUR"), Some(dec("1234.56")));
        assert_eq!(parse_amount("€ 1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("1 234,56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("1.234.567"), Some(dec("1234567")));
        assert_eq!(parse_amount("-7"), Some(dec("-7")));
    }

    #[test]
    fn test_parse_amount_rejects_text() {
        assert_eq!(parse_amount("Invoice 12"), None);
        assert_eq!(parse_amount("Value not found"), None);
        assert_eq!(parse_amount(""), None);
    }
}
