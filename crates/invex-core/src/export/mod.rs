//! Tabular export of extracted records.
//!
//! Records are written twice: a workbook with a flat data sheet and a pivot
//! sheet, and a delimited flat file holding the same rows as the data sheet.

pub mod delimited;
pub mod pivot;
pub mod xlsx;

pub use pivot::{PivotCell, PivotRow, PivotTable};
pub use xlsx::{Sheet, SheetCell};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{ExportError, InvexError};
use crate::models::config::{InvexConfig, OutputConfig, PivotConfig};
use crate::models::record::ExtractedRecord;

/// Paths of the written artifacts.
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub xlsx: PathBuf,
    pub csv: PathBuf,
}

/// Renders records into the configured output formats.
pub struct Exporter {
    output: OutputConfig,
    pivot: PivotConfig,
}

impl Exporter {
    pub fn new(output: OutputConfig, pivot: PivotConfig) -> Self {
        Self { output, pivot }
    }

    pub fn from_config(config: &InvexConfig) -> Self {
        Self::new(config.output.clone(), config.pivot.clone())
    }

    /// Header row of the flat export.
    pub fn flat_headers(&self) -> Vec<String> {
        let mut headers = vec!["File".to_string(), "Date".to_string()];
        if self.output.include_label {
            headers.push("Label".to_string());
        }
        headers.push("Value".to_string());
        headers
    }

    /// Flat rows in record order.
    pub fn flat_rows(&self, records: &[ExtractedRecord]) -> Vec<Vec<String>> {
        records
            .iter()
            .map(|record| {
                let mut row = vec![record.file.clone(), record.date_text()];
                if self.output.include_label {
                    row.push(record.label.clone());
                }
                row.push(record.value_text());
                row
            })
            .collect()
    }

    pub fn pivot(&self, records: &[ExtractedRecord]) -> Result<PivotTable, ExportError> {
        PivotTable::build(records, &self.pivot)
    }

    /// The delimited flat file.
    pub fn to_csv(&self, records: &[ExtractedRecord]) -> Result<String, ExportError> {
        // Validated as ASCII when the configuration is checked.
        let delimiter = u8::try_from(self.output.csv_delimiter).unwrap_or(b';');
        delimited::generate_delimited(&self.flat_headers(), &self.flat_rows(records), delimiter)
    }

    /// The workbook with data and pivot sheets.
    pub fn to_xlsx(&self, records: &[ExtractedRecord]) -> Result<Vec<u8>, ExportError> {
        let pivot = self.pivot(records)?;

        let data = Sheet {
            name: self.output.data_sheet.clone(),
            headers: self.flat_headers(),
            rows: self
                .flat_rows(records)
                .into_iter()
                .map(|row| row.into_iter().map(SheetCell::from).collect())
                .collect(),
        };

        let pivot_sheet = Sheet {
            name: self.output.pivot_sheet.clone(),
            headers: pivot.headers("Date"),
            rows: pivot
                .rows
                .iter()
                .map(|row| {
                    std::iter::once(SheetCell::Text(row.date.clone()))
                        .chain(row.cells.iter().map(SheetCell::from))
                        .collect()
                })
                .collect(),
        };

        xlsx::generate_workbook(&[data, pivot_sheet])
    }

    /// Write both artifacts under `directory`, creating it if needed.
    pub fn write(&self, records: &[ExtractedRecord], directory: &Path) -> Result<ExportPaths, InvexError> {
        fs::create_dir_all(directory)?;

        let paths = ExportPaths {
            xlsx: directory.join(&self.output.xlsx_file),
            csv: directory.join(&self.output.csv_file),
        };

        let workbook = self.to_xlsx(records)?;
        let csv = self.to_csv(records)?;

        fs::write(&paths.xlsx, workbook)?;
        fs::write(&paths.csv, csv)?;

        info!(
            "Wrote {} records to {} and {}",
            records.len(),
            paths.xlsx.display(),
            paths.csv.display()
        );
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::{CanonicalDate, Extracted};

    fn records() -> Vec<ExtractedRecord> {
        vec![
            ExtractedRecord {
                file: "sample_invoice_1.pdf".to_string(),
                date: Extracted::Found(CanonicalDate::new(5, 3, 2020)),
                label: "Gross Amount incl. VAT".to_string(),
                value: Extracted::Found("119,00".to_string()),
            },
            ExtractedRecord {
                file: "sample_invoice_2.pdf".to_string(),
                date: Extracted::Malformed {
                    raw: "Nov 31, 2016".to_string(),
                },
                label: "Total".to_string(),
                value: Extracted::NotFound,
            },
        ]
    }

    #[test]
    fn test_csv_output() {
        let exporter = Exporter::new(OutputConfig::default(), PivotConfig::default());
        let csv = exporter.to_csv(&records()).unwrap();

        assert_eq!(
            csv,
            "File;Date;Value\n\
             sample_invoice_1.pdf;05.03.2020;119,00\n\
             sample_invoice_2.pdf;Date not found;Value not found\n"
        );
    }

    #[test]
    fn test_csv_with_label_column() {
        let output = OutputConfig {
            include_label: true,
            ..OutputConfig::default()
        };
        let exporter = Exporter::new(output, PivotConfig::default());

        let csv = exporter.to_csv(&records()).unwrap();
        assert!(csv.starts_with("File;Date;Label;Value\n"));
        assert!(csv.contains("sample_invoice_2.pdf;Date not found;Total;Value not found"));
    }

    #[test]
    fn test_csv_is_deterministic() {
        let exporter = Exporter::new(OutputConfig::default(), PivotConfig::default());
        assert_eq!(
            exporter.to_csv(&records()).unwrap(),
            exporter.to_csv(&records()).unwrap()
        );
    }

    #[test]
    fn test_write_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");

        let exporter = Exporter::new(OutputConfig::default(), PivotConfig::default());
        let paths = exporter.write(&records(), &out).unwrap();

        assert_eq!(paths.csv, out.join("Invoice_Data.csv"));
        assert!(paths.xlsx.exists());
        let xlsx = std::fs::read(&paths.xlsx).unwrap();
        assert_eq!(&xlsx[0..2], b"PK");
        let csv = std::fs::read_to_string(&paths.csv).unwrap();
        assert!(csv.starts_with("File;Date;Value"));
    }
}
