//! Date lookup in table grids.

use tracing::{debug, trace};

use super::rules::normalize_german;
use super::FieldExtractor;
use crate::models::record::{CanonicalDate, Extracted};
use crate::pdf::PdfPage;

/// Finds German dates in the column headed by a label.
///
/// Every table whose header row has a cell equal to the label contributes
/// the cells beneath it, top to bottom. A row too short to reach the column
/// is skipped. A cell that holds a date-shaped fragment with an unknown month
/// still counts as a (malformed) candidate.
pub struct TableDateExtractor {
    label: String,
}

impl TableDateExtractor {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl FieldExtractor for TableDateExtractor {
    type Output = CanonicalDate;

    fn extract_all(&self, pages: &[PdfPage]) -> Vec<Extracted<CanonicalDate>> {
        let mut candidates = Vec::new();

        for page in pages {
            for table in &page.tables {
                let Some(col) = table.column_of(&self.label) else {
                    continue;
                };
                trace!(
                    "Header '{}' at column {} on page {}",
                    self.label,
                    col,
                    page.number
                );

                for row in table.data_rows() {
                    let Some(Some(cell)) = row.get(col) else {
                        continue;
                    };

                    match normalize_german(cell) {
                        Extracted::NotFound => {}
                        result => {
                            debug!("Found date cell under '{}': {}", self.label, cell);
                            candidates.push(result);
                        }
                    }
                }
            }
        }

        candidates
    }
}
