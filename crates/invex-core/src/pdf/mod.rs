//! PDF processing module.
//!
//! Documents are consumed as a page-ordered sequence of text and tables.
//! [`DocumentLoader`] is the seam the pipeline reads through: the PDF
//! implementation decodes files from disk, the in-memory one serves
//! synthetic pages.

mod extractor;
pub mod table;

pub use extractor::PdfExtractor;
pub use table::{detect_tables, split_cells, Table};

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Extracted content from a document.
#[derive(Debug, Clone, Default)]
pub struct PdfContent {
    /// Pages in document order.
    pub pages: Vec<PdfPage>,
}

impl PdfContent {
    pub fn new(pages: Vec<PdfPage>) -> Self {
        Self { pages }
    }

    /// Build content from raw page texts, reconstructing tables from the text.
    pub fn from_page_texts<I, S>(texts: I, min_column_gap: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pages = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| PdfPage::from_text(i as u32 + 1, text, min_column_gap))
            .collect();
        Self { pages }
    }
}

/// Content from a single page.
#[derive(Debug, Clone, Default)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text from this page.
    pub text: String,
    /// Tables found on this page.
    pub tables: Vec<Table>,
}

impl PdfPage {
    pub fn new(number: u32, text: impl Into<String>, tables: Vec<Table>) -> Self {
        Self {
            number,
            text: text.into(),
            tables,
        }
    }

    /// Page whose tables are reconstructed from its text.
    pub fn from_text(number: u32, text: impl Into<String>, min_column_gap: usize) -> Self {
        let text = text.into();
        let tables = detect_tables(&text, min_column_gap);
        Self {
            number,
            text,
            tables,
        }
    }

    /// Text lines of the page.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.split('\n')
    }
}

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract text from a specific page.
    fn extract_page_text(&self, page: u32) -> Result<String>;

    /// Reconstruct the tables on a specific page.
    fn extract_tables(&self, page: u32) -> Result<Vec<Table>>;
}

/// Opens a document by path and yields its pages.
pub trait DocumentLoader {
    fn load(&self, path: &Path) -> Result<PdfContent>;
}

/// Loads PDF files from disk.
#[derive(Debug, Clone)]
pub struct PdfFileLoader {
    min_column_gap: usize,
}

impl PdfFileLoader {
    pub fn new() -> Self {
        Self { min_column_gap: 2 }
    }

    pub fn with_min_column_gap(mut self, gap: usize) -> Self {
        self.min_column_gap = gap;
        self
    }
}

impl Default for PdfFileLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentLoader for PdfFileLoader {
    fn load(&self, path: &Path) -> Result<PdfContent> {
        let data = fs::read(path).map_err(|source| PdfError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut extractor = PdfExtractor::new().with_min_column_gap(self.min_column_gap);
        extractor.load(&data)?;
        let content = extractor.extract_all()?;

        debug!(
            "Loaded {} ({} pages, {} tables)",
            path.display(),
            content.pages.len(),
            content.pages.iter().map(|p| p.tables.len()).sum::<usize>()
        );
        Ok(content)
    }
}

/// Serves documents held in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    documents: HashMap<PathBuf, PdfContent>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: PdfContent) {
        self.documents.insert(path.into(), content);
    }

    pub fn with_document(mut self, path: impl Into<PathBuf>, content: PdfContent) -> Self {
        self.insert(path, content);
        self
    }
}

impl DocumentLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<PdfContent> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| PdfError::NotFound(path.to_path_buf()))
    }
}
