//! Core library for invoice field extraction.
//!
//! This crate provides:
//! - PDF processing (per-page text and column-aligned table reconstruction)
//! - Label-driven field extraction from table grids and text lines
//! - Date normalization for German long-form and English abbreviated dates
//! - Record aggregation and tabular export (XLSX with pivot, delimited CSV)

pub mod error;
pub mod models;
pub mod pdf;
pub mod extract;
pub mod aggregate;
pub mod export;
pub mod pipeline;

pub use error::{InvexError, Result};
pub use models::config::{DateMode, DocumentConfig, InvexConfig, MatchPolicy};
pub use models::record::{CanonicalDate, Extracted, ExtractedRecord, DATE_NOT_FOUND, VALUE_NOT_FOUND};
pub use pdf::{DocumentLoader, MemoryLoader, PdfContent, PdfExtractor, PdfFileLoader, PdfPage, PdfProcessor, Table};
pub use extract::{DocumentExtractor, DocumentFields};
pub use export::{Exporter, PivotTable};
pub use pipeline::{DocumentOutcome, DocumentStatus, Pipeline, RunReport};
