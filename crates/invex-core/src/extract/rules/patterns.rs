//! Common regex patterns for invoice field extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // German long date: "5. März 2020", "12.Dezember 2019"
    pub static ref GERMAN_DATE: Regex = Regex::new(
        r"(\d{1,2})\.\s?(\w+)\s(\d{4})"
    ).unwrap();

    // English abbreviated date: "Nov 26, 2016"
    pub static ref ENGLISH_DATE: Regex = Regex::new(
        r"\b\w{3,9}\s\d{1,2},\s\d{4}"
    ).unwrap();

    // A cell holding nothing but an amount, optionally with a currency
    pub static ref AMOUNT_VALUE: Regex = Regex::new(
        r"^\s*(?:[A-Z]{3}|[€$£])?\s*([-+]?\d(?:[\d\s\u{00a0}.,']*\d)?)\s*(?:[A-Z]{3}|[€$£])?\s*$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_german_date_optional_space() {
        let caps = GERMAN_DATE.captures("12.Dezember 2019").unwrap();
        assert_eq!(&caps[1], "12");
        assert_eq!(&caps[2], "Dezember");
        assert_eq!(&caps[3], "2019");
    }

    #[test]
    fn test_german_date_matches_umlaut() {
        let caps = GERMAN_DATE.captures("Lieferung 5. März 2020").unwrap();
        assert_eq!(&caps[2], "März");
    }

    #[test]
    fn test_english_date() {
        let m = ENGLISH_DATE.find(": Nov 26, 2016 (due)").unwrap();
        assert_eq!(m.as_str(), "Nov 26, 2016");
        assert!(ENGLISH_DATE.find("26.11.2016").is_none());
    }

    #[test]
    fn test_amount_value() {
        assert!(AMOUNT_VALUE.is_match("123.45"));
        assert!(AMOUNT_VALUE.is_match("€ 1.234,56"));
        assert!(AMOUNT_VALUE.is_match("1 234,56 EUR"));
        assert!(AMOUNT_VALUE.is_match("7"));
        assert!(!AMOUNT_VALUE.is_match("Invoice 12"));
        assert!(!AMOUNT_VALUE.is_match("Value not found"));
    }
}
