//! Extraction results and the flat records built from them.

use std::fmt;

use serde::{Serialize, Serializer};

/// Rendered in place of a date that was absent or could not be normalized.
pub const DATE_NOT_FOUND: &str = "Date not found";

/// Rendered in place of a value whose label never appeared.
pub const VALUE_NOT_FOUND: &str = "Value not found";

/// Outcome of extracting one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Extracted<T> {
    /// The label was located and the value recognized.
    Found(T),
    /// The label (or a recognizable value next to it) never appeared.
    NotFound,
    /// A value was located but could not be interpreted.
    Malformed { raw: String },
}

impl<T> Extracted<T> {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Extracted::Malformed { .. })
    }
}

impl<T: fmt::Display> Extracted<T> {
    /// Render the value, or `sentinel` when it was not found or malformed.
    pub fn render(&self, sentinel: &str) -> String {
        match self {
            Extracted::Found(value) => value.to_string(),
            Extracted::NotFound | Extracted::Malformed { .. } => sentinel.to_string(),
        }
    }
}

/// A calendar date rendered as `DD.MM.YYYY`.
///
/// Day and month are stored as read; German dates are not checked against
/// the calendar. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalDate {
    year: u16,
    month: u8,
    day: u8,
}

impl CanonicalDate {
    pub fn new(day: u8, month: u8, year: u16) -> Self {
        Self { year, month, day }
    }
}

impl From<chrono::NaiveDate> for CanonicalDate {
    fn from(date: chrono::NaiveDate) -> Self {
        use chrono::Datelike;
        Self::new(date.day() as u8, date.month() as u8, date.year() as u16)
    }
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}.{:02}.{:04}", self.day, self.month, self.year)
    }
}

impl Serialize for CanonicalDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One output row: a document's date paired with one labeled value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedRecord {
    /// Source file identifier as configured.
    pub file: String,
    /// Document date.
    pub date: Extracted<CanonicalDate>,
    /// Label the value was found under.
    pub label: String,
    /// Raw value text.
    pub value: Extracted<String>,
}

impl ExtractedRecord {
    /// Date column text.
    pub fn date_text(&self) -> String {
        self.date.render(DATE_NOT_FOUND)
    }

    /// Value column text.
    pub fn value_text(&self) -> String {
        self.value.render(VALUE_NOT_FOUND)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_canonical_date_is_ten_chars() {
        let date = CanonicalDate::new(5, 3, 2020);
        assert_eq!(date.to_string(), "05.03.2020");
        assert_eq!(date.to_string().len(), 10);
    }

    #[test]
    fn test_canonical_date_from_naive() {
        let date: CanonicalDate = NaiveDate::from_ymd_opt(2016, 11, 26).unwrap().into();
        assert_eq!(date.to_string(), "26.11.2016");
    }

    #[test]
    fn test_canonical_date_orders_chronologically() {
        let earlier = CanonicalDate::new(26, 11, 2016);
        let later = CanonicalDate::new(5, 3, 2020);
        assert!(earlier < later);
    }

    #[test]
    fn test_render_sentinels() {
        let missing: Extracted<String> = Extracted::NotFound;
        assert_eq!(missing.render(VALUE_NOT_FOUND), "Value not found");

        let malformed: Extracted<CanonicalDate> = Extracted::Malformed {
            raw: "5. Foo 2020".to_string(),
        };
        assert_eq!(malformed.render(DATE_NOT_FOUND), "Date not found");

        let empty = Extracted::Found(String::new());
        assert_eq!(empty.render(VALUE_NOT_FOUND), "");
    }

    #[test]
    fn test_record_serializes_date_as_text() {
        let record = ExtractedRecord {
            file: "a.pdf".to_string(),
            date: Extracted::Found(CanonicalDate::new(1, 2, 2021)),
            label: "Total".to_string(),
            value: Extracted::NotFound,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"]["status"], "found");
        assert_eq!(json["date"]["value"], "01.02.2021");
        assert_eq!(json["value"]["status"], "not_found");
    }
}
