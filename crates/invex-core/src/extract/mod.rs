//! Label-driven field extraction.
//!
//! Extractors scan pages in order and report every candidate they find;
//! a [`MatchPolicy`] then decides which candidates are kept. Nothing here
//! fails: absence and malformed values are part of [`Extracted`].

pub mod rules;
mod table;
mod text;

pub use table::TableDateExtractor;
pub use text::{TextDateExtractor, TextValueExtractor};

use tracing::debug;

use crate::models::config::{DateMode, DocumentConfig, MatchPolicy};
use crate::models::record::{CanonicalDate, Extracted};
use crate::pdf::{PdfContent, PdfPage};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Every candidate, in page and line order.
    fn extract_all(&self, pages: &[PdfPage]) -> Vec<Extracted<Self::Output>>;

    /// First candidate, or `NotFound`.
    fn extract(&self, pages: &[PdfPage]) -> Extracted<Self::Output> {
        self.extract_all(pages)
            .into_iter()
            .next()
            .unwrap_or(Extracted::NotFound)
    }

    /// Candidates kept by `policy`; a single `NotFound` when there are none.
    fn extract_with(&self, pages: &[PdfPage], policy: MatchPolicy) -> Vec<Extracted<Self::Output>> {
        let selected = policy.select(self.extract_all(pages));
        if selected.is_empty() {
            vec![Extracted::NotFound]
        } else {
            selected
        }
    }
}

/// Values found under one label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledValues {
    pub label: String,
    /// Never empty; holds `NotFound` when the label is absent.
    pub values: Vec<Extracted<String>>,
}

/// Everything extracted from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFields {
    pub date: Extracted<CanonicalDate>,
    /// One entry per configured label, in configured order.
    pub values: Vec<LabeledValues>,
}

impl DocumentFields {
    /// Number of fields that were located but could not be interpreted.
    pub fn malformed_count(&self) -> usize {
        let values = self
            .values
            .iter()
            .flat_map(|lv| &lv.values)
            .filter(|v| v.is_malformed())
            .count();
        values + usize::from(self.date.is_malformed())
    }
}

/// Runs the configured extractions over one document's pages.
pub struct DocumentExtractor<'a> {
    config: &'a DocumentConfig,
    policy: MatchPolicy,
}

impl<'a> DocumentExtractor<'a> {
    pub fn new(config: &'a DocumentConfig, policy: MatchPolicy) -> Self {
        Self { config, policy }
    }

    /// Resolve the document date according to the configured mode.
    pub fn extract_date(&self, pages: &[PdfPage]) -> Extracted<CanonicalDate> {
        let candidates = match self.config.mode {
            DateMode::Table => TableDateExtractor::new(&self.config.date_label).extract_all(pages),
            DateMode::Text => TextDateExtractor::new(&self.config.date_label).extract_all(pages),
        };

        if self.policy == MatchPolicy::All && candidates.len() > 1 {
            debug!(
                "{} date candidates for '{}', keeping the first",
                candidates.len(),
                self.config.date_label
            );
        }

        self.policy.pick(candidates).unwrap_or(Extracted::NotFound)
    }

    /// Resolve every configured value label.
    pub fn extract_values(&self, pages: &[PdfPage]) -> Vec<LabeledValues> {
        self.config
            .labels
            .iter()
            .map(|label| LabeledValues {
                label: label.clone(),
                values: TextValueExtractor::new(label).extract_with(pages, self.policy),
            })
            .collect()
    }

    pub fn extract(&self, content: &PdfContent) -> DocumentFields {
        DocumentFields {
            date: self.extract_date(&content.pages),
            values: self.extract_values(&content.pages),
        }
    }
}
