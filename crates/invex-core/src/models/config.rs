//! Configuration structures for the extraction pipeline.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Main configuration for the invex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InvexConfig {
    /// Source documents and the labels to extract from each.
    pub documents: Vec<DocumentConfig>,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output artifact configuration.
    pub output: OutputConfig,

    /// Pivot sheet configuration.
    pub pivot: PivotConfig,

    /// Batch run behavior.
    pub run: RunConfig,
}

/// One source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Path to the PDF. May be a glob pattern, expanded by the caller.
    #[serde(alias = "file_name")]
    pub file: String,

    /// Label locating the document date.
    pub date_label: String,

    /// Where the date label lives.
    #[serde(default)]
    pub mode: DateMode,

    /// Labels of the values to extract, in output order.
    #[serde(default, alias = "additional_labels")]
    pub labels: Vec<String>,

    /// Overrides `extraction.match_policy` for this document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_policy: Option<MatchPolicy>,
}

impl DocumentConfig {
    pub fn new(file: impl Into<String>, date_label: impl Into<String>, mode: DateMode) -> Self {
        Self {
            file: file.into(),
            date_label: date_label.into(),
            mode,
            labels: Vec::new(),
            match_policy: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = Some(policy);
        self
    }

    /// Copy of this entry pointing at a concrete file.
    pub fn for_file(&self, file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            ..self.clone()
        }
    }
}

/// How the date is laid out in a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateMode {
    /// German date in a table column headed by the label.
    Table,
    /// English date on the same text line as the label.
    #[default]
    Text,
}

/// Which occurrence wins when a label appears more than once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    /// First occurrence in page/line order.
    #[default]
    First,
    /// Last occurrence in page/line order.
    Last,
    /// Every occurrence. Single-valued fields (the date) fall back to the first.
    All,
}

impl MatchPolicy {
    /// Reduce candidates (in document order) to the selected ones.
    pub fn select<T>(self, candidates: Vec<T>) -> Vec<T> {
        match self {
            MatchPolicy::First => candidates.into_iter().take(1).collect(),
            MatchPolicy::Last => candidates.into_iter().last().into_iter().collect(),
            MatchPolicy::All => candidates,
        }
    }

    /// Pick a single candidate.
    pub fn pick<T>(self, candidates: Vec<T>) -> Option<T> {
        match self {
            MatchPolicy::Last => candidates.into_iter().last(),
            MatchPolicy::First | MatchPolicy::All => candidates.into_iter().next(),
        }
    }
}

impl std::fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MatchPolicy::First => "first",
            MatchPolicy::Last => "last",
            MatchPolicy::All => "all",
        };
        f.write_str(name)
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Default tie-break for repeated labels.
    pub match_policy: MatchPolicy,

    /// Minimum run of spaces separating two table columns in page text.
    pub min_column_gap: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            match_policy: MatchPolicy::First,
            min_column_gap: 2,
        }
    }
}

/// Output artifact configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the output files.
    pub directory: PathBuf,

    /// Workbook file name.
    pub xlsx_file: String,

    /// Delimited file name.
    pub csv_file: String,

    /// Delimiter of the flat file. Must be ASCII.
    pub csv_delimiter: char,

    /// Name of the flat data sheet.
    pub data_sheet: String,

    /// Name of the pivot sheet.
    pub pivot_sheet: String,

    /// Add a Label column to the flat export.
    pub include_label: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            xlsx_file: "Invoice_Data.xlsx".to_string(),
            csv_file: "Invoice_Data.csv".to_string(),
            csv_delimiter: ';',
            data_sheet: "Data".to_string(),
            pivot_sheet: "Pivot".to_string(),
            include_label: false,
        }
    }
}

/// How values colliding on the same (date, file) pivot cell are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotAggregation {
    /// Numeric sum when every value parses as an amount, otherwise concatenation.
    #[default]
    Sum,
    /// Always concatenate.
    Concat,
    /// Numeric sum; any non-numeric value is an error.
    Strict,
}

/// Pivot sheet configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PivotConfig {
    /// Aggregation for colliding values.
    pub aggregation: PivotAggregation,

    /// Separator used when values are concatenated.
    pub separator: String,
}

impl Default for PivotConfig {
    fn default() -> Self {
        Self {
            aggregation: PivotAggregation::Sum,
            separator: "; ".to_string(),
        }
    }
}

/// Batch run behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Abort the whole run on the first document that fails to load.
    pub fail_fast: bool,
}

impl InvexConfig {
    /// Template configuration listing two sample invoices.
    pub fn sample() -> Self {
        Self {
            documents: vec![
                DocumentConfig::new("sample_invoice_1.pdf", "Date", DateMode::Table)
                    .with_label("Gross Amount incl. VAT"),
                DocumentConfig::new("sample_invoice_2.pdf", "Invoice date", DateMode::Text)
                    .with_label("Total"),
            ],
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the configuration for entries the pipeline cannot act on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, doc) in self.documents.iter().enumerate() {
            let invalid = |reason: &str| ConfigError::InvalidDocument {
                index,
                file: doc.file.clone(),
                reason: reason.to_string(),
            };

            if doc.file.trim().is_empty() {
                return Err(invalid("file path is empty"));
            }
            if doc.date_label.is_empty() {
                return Err(invalid("date label is empty"));
            }

            let mut seen = HashSet::new();
            for label in &doc.labels {
                if label.is_empty() {
                    return Err(invalid("value label is empty"));
                }
                if !seen.insert(label.as_str()) {
                    return Err(ConfigError::InvalidDocument {
                        index,
                        file: doc.file.clone(),
                        reason: format!("duplicate value label '{}'", label),
                    });
                }
            }
        }

        let output = &self.output;
        if !output.csv_delimiter.is_ascii() {
            return Err(ConfigError::InvalidOutput {
                field: "csv_delimiter".to_string(),
                reason: format!("'{}' is not an ASCII character", output.csv_delimiter),
            });
        }
        for (field, name) in [("xlsx_file", &output.xlsx_file), ("csv_file", &output.csv_file)] {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidOutput {
                    field: field.to_string(),
                    reason: "file name is empty".to_string(),
                });
            }
        }
        for (field, name) in [("data_sheet", &output.data_sheet), ("pivot_sheet", &output.pivot_sheet)] {
            // Excel limits sheet names to 31 characters.
            if name.is_empty() || name.chars().count() > 31 {
                return Err(ConfigError::InvalidOutput {
                    field: field.to_string(),
                    reason: "sheet name must be 1-31 characters".to_string(),
                });
            }
        }
        if output.data_sheet == output.pivot_sheet {
            return Err(ConfigError::InvalidOutput {
                field: "pivot_sheet".to_string(),
                reason: "must differ from data_sheet".to_string(),
            });
        }

        if self.extraction.min_column_gap == 0 {
            return Err(ConfigError::InvalidSetting {
                field: "extraction.min_column_gap".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Effective match policy for a document.
    pub fn policy_for(&self, doc: &DocumentConfig) -> MatchPolicy {
        doc.match_policy.unwrap_or(self.extraction.match_policy)
    }

}
