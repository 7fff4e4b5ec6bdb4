//! Label lookup in text lines.
//!
//! A line matches when it contains the label as an exact, case-sensitive
//! substring. The text after the first occurrence of the label on that line,
//! trimmed of whitespace and a leading `:` separator, is what gets inspected.

use tracing::debug;

use super::rules::normalize_english;
use super::FieldExtractor;
use crate::models::record::{CanonicalDate, Extracted};
use crate::pdf::PdfPage;

/// Text after the first occurrence of `label` in each matching line.
fn remainders<'a>(pages: &'a [PdfPage], label: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    pages
        .iter()
        .flat_map(|page| page.lines())
        .filter_map(move |line| {
            let (_, rest) = line.split_once(label)?;
            debug!("Found label '{}' in line: {}", label, line);
            let rest = rest.trim_start();
            Some(rest.strip_prefix(':').unwrap_or(rest).trim())
        })
}

/// Finds an English date following a label on the same line.
///
/// Lines with the label but no date-shaped text after it are skipped.
pub struct TextDateExtractor {
    label: String,
}

impl TextDateExtractor {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl FieldExtractor for TextDateExtractor {
    type Output = CanonicalDate;

    fn extract_all(&self, pages: &[PdfPage]) -> Vec<Extracted<CanonicalDate>> {
        remainders(pages, &self.label)
            .map(normalize_english)
            .filter(|result| *result != Extracted::NotFound)
            .collect()
    }
}

/// Returns the raw text following a keyword on the same line.
///
/// The remainder is trimmed but otherwise untouched: no numeric parsing,
/// and an empty remainder is still a found value.
pub struct TextValueExtractor {
    keyword: String,
}

impl TextValueExtractor {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
        }
    }
}

impl FieldExtractor for TextValueExtractor {
    type Output = String;

    fn extract_all(&self, pages: &[PdfPage]) -> Vec<Extracted<String>> {
        remainders(pages, &self.keyword)
            .map(|rest| Extracted::Found(rest.to_string()))
            .collect()
    }
}
