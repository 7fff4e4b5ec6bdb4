//! Error types for the invex-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the invex library.
#[derive(Error, Debug)]
pub enum InvexError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document failed while the run was configured to stop on failure.
    #[error("processing {file} failed: {source}")]
    Document {
        file: String,
        #[source]
        source: Box<InvexError>,
    },
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to read the PDF file.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// No in-memory document registered under this path.
    #[error("document not found: {0}")]
    NotFound(PathBuf),
}

/// Errors related to loading and validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for the expected schema.
    #[error("invalid configuration in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A document entry failed validation.
    #[error("document #{index} ({file}): {reason}")]
    InvalidDocument {
        index: usize,
        file: String,
        reason: String,
    },

    /// An output setting failed validation.
    #[error("invalid output setting {field}: {reason}")]
    InvalidOutput { field: String, reason: String },

    /// Any other setting failed validation.
    #[error("invalid setting {field}: {reason}")]
    InvalidSetting { field: String, reason: String },
}

/// Errors related to writing tabular output.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Spreadsheet generation failed.
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Delimited file generation failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Output contained invalid UTF-8.
    #[error("CSV output contained invalid UTF-8")]
    Utf8,

    /// Pivot aggregation met a non-numeric value in strict mode.
    #[error("cannot sum non-numeric value '{value}' for date {date} in {file}")]
    NonNumericPivot {
        date: String,
        file: String,
        value: String,
    },

    /// Pivot sum exceeded the decimal range in strict mode.
    #[error("pivot sum out of range for date {date} in {file}")]
    PivotOverflow { date: String, file: String },
}

/// Result type for the invex library.
pub type Result<T> = std::result::Result<T, InvexError>;
