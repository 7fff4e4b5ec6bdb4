//! Date normalization for German long-form and English abbreviated dates.

use chrono::NaiveDate;
use tracing::debug;

use super::patterns::{ENGLISH_DATE, GERMAN_DATE};
use crate::models::record::{CanonicalDate, Extracted};

/// Fixed template for English dates.
const ENGLISH_FORMAT: &str = "%b %d, %Y";

/// Normalize the first German date in `fragment`.
pub fn normalize_german(fragment: &str) -> Extracted<CanonicalDate> {
    let Some(caps) = GERMAN_DATE.captures(fragment) else {
        return Extracted::NotFound;
    };

    let raw = caps[0].to_string();
    let month = match german_month_to_number(&caps[2]) {
        Some(month) => month,
        None => {
            debug!("Unknown German month '{}' in '{}'", &caps[2], raw);
            return Extracted::Malformed { raw };
        }
    };

    match (caps[1].parse::<u8>(), caps[3].parse::<u16>()) {
        (Ok(day), Ok(year)) => Extracted::Found(CanonicalDate::new(day, month, year)),
        _ => Extracted::Malformed { raw },
    }
}

/// Normalize the first English date in `fragment`.
pub fn normalize_english(fragment: &str) -> Extracted<CanonicalDate> {
    let Some(m) = ENGLISH_DATE.find(fragment) else {
        return Extracted::NotFound;
    };

    match NaiveDate::parse_from_str(m.as_str(), ENGLISH_FORMAT) {
        Ok(date) => Extracted::Found(date.into()),
        Err(e) => {
            debug!("Error normalizing date '{}': {}", m.as_str(), e);
            Extracted::Malformed {
                raw: m.as_str().to_string(),
            }
        }
    }
}

fn german_month_to_number(month: &str) -> Option<u8> {
    let number = match month {
        "Januar" => 1,
        "Februar" => 2,
        "März" => 3,
        "April" => 4,
        "Mai" => 5,
        "Juni" => 6,
        "Juli" => 7,
        "August" => 8,
        "September" => 9,
        "Oktober" => 10,
        "November" => 11,
        "Dezember" => 12,
        _ => return None,
    };
    Some(number)
}
