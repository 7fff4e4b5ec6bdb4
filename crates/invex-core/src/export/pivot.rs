//! Date × file cross-tabulation of extracted records.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::ExportError;
use crate::extract::rules::parse_amount;
use crate::models::config::{PivotAggregation, PivotConfig};
use crate::models::record::{CanonicalDate, Extracted, ExtractedRecord, DATE_NOT_FOUND};

/// Row key: real dates sort chronologically ahead of the sentinel row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum DateKey {
    Date(CanonicalDate),
    Missing,
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateKey::Date(date) => write!(f, "{}", date),
            DateKey::Missing => f.write_str(DATE_NOT_FOUND),
        }
    }
}

/// One aggregated pivot cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PivotCell {
    /// No value for this (date, file) pair.
    Empty,
    /// Sum of amounts.
    Number(Decimal),
    /// Text that could not be summed.
    Text(String),
}

impl fmt::Display for PivotCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PivotCell::Empty => Ok(()),
            PivotCell::Number(n) => write!(f, "{}", n),
            PivotCell::Text(s) => f.write_str(s),
        }
    }
}

/// A pivot row: one date and a cell per file column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotRow {
    pub date: String,
    pub cells: Vec<PivotCell>,
}

/// Rows are unique dates, columns are unique files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PivotTable {
    /// Column files, sorted.
    pub files: Vec<String>,
    /// Rows, chronological with the "not found" row last.
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    /// Build the pivot over `records`.
    ///
    /// Values that were not found or malformed do not contribute to cells,
    /// but their dates and files still appear as rows and columns. A cell
    /// whose values were all missing stays empty rather than showing the
    /// "not found" sentinel.
    pub fn build(records: &[ExtractedRecord], config: &PivotConfig) -> Result<Self, ExportError> {
        let mut files = BTreeSet::new();
        let mut grid: BTreeMap<DateKey, BTreeMap<&str, Vec<&str>>> = BTreeMap::new();

        for record in records {
            files.insert(record.file.as_str());

            let key = match &record.date {
                Extracted::Found(date) => DateKey::Date(*date),
                _ => DateKey::Missing,
            };
            let row = grid.entry(key).or_default();
            let cell = row.entry(record.file.as_str()).or_default();
            if let Extracted::Found(value) = &record.value {
                cell.push(value.as_str());
            }
        }

        let mut rows = Vec::with_capacity(grid.len());
        for (key, row) in &grid {
            let date = key.to_string();
            let mut cells = Vec::with_capacity(files.len());
            for file in &files {
                let values = row.get(file).map(Vec::as_slice).unwrap_or(&[]);
                cells.push(aggregate_cell(values, config, &date, file)?);
            }
            rows.push(PivotRow { date, cells });
        }

        Ok(Self {
            files: files.into_iter().map(str::to_string).collect(),
            rows,
        })
    }

    /// Header row: the date column followed by one column per file.
    pub fn headers(&self, date_header: &str) -> Vec<String> {
        std::iter::once(date_header.to_string())
            .chain(self.files.iter().cloned())
            .collect()
    }
}

fn aggregate_cell(
    values: &[&str],
    config: &PivotConfig,
    date: &str,
    file: &str,
) -> Result<PivotCell, ExportError> {
    if values.is_empty() {
        return Ok(PivotCell::Empty);
    }

    if config.aggregation == PivotAggregation::Concat {
        return Ok(PivotCell::Text(values.join(config.separator.as_str())));
    }

    let mut sum = Decimal::ZERO;
    for value in values {
        let amount = match parse_amount(value) {
            Some(amount) => amount,
            None if config.aggregation == PivotAggregation::Strict => {
                return Err(ExportError::NonNumericPivot {
                    date: date.to_string(),
                    file: file.to_string(),
                    value: value.to_string(),
                });
            }
            None => {
                debug!(
                    "Non-numeric value '{}' for {} in {}, concatenating",
                    value, date, file
                );
                return Ok(PivotCell::Text(values.join(config.separator.as_str())));
            }
        };

        sum = match sum.checked_add(amount) {
            Some(sum) => sum,
            None if config.aggregation == PivotAggregation::Strict => {
                return Err(ExportError::PivotOverflow {
                    date: date.to_string(),
                    file: file.to_string(),
                });
            }
            None => {
                debug!("Sum out of range for {} in {}, concatenating", date, file);
                return Ok(PivotCell::Text(values.join(config.separator.as_str())));
            }
        };
    }

    Ok(PivotCell::Number(sum))
}
