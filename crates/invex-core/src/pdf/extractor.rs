//! PDF text and table extraction using lopdf, pdf-extract and pdfplumber.
//!
//! Tables come from pdfplumber's ruling-line detection, then from its text
//! alignment strategy. Pages where neither finds a table fall back to
//! splitting the extracted text on column gaps.

use lopdf::Document;
use pdfplumber::{Strategy, TableSettings};
use tracing::{debug, trace, warn};

use super::{detect_tables, PdfContent, PdfPage, PdfProcessor, Result, Table};
use crate::error::PdfError;

/// PDF content extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    page_texts: Vec<String>,
    page_tables: Vec<Vec<Table>>,
    min_column_gap: usize,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            page_texts: Vec::new(),
            page_tables: Vec::new(),
            min_column_gap: 2,
        }
    }

    /// Minimum run of spaces treated as a column boundary.
    pub fn with_min_column_gap(mut self, gap: usize) -> Self {
        self.min_column_gap = gap;
        self
    }

    /// Extract text and tables from every page.
    pub fn extract_all(&self) -> Result<PdfContent> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }

        let page_count = self.page_count();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let mut pages = Vec::with_capacity(page_count as usize);
        for page_num in 1..=page_count {
            let text = self.extract_page_text(page_num)?;
            let tables = self.tables_for(page_num, &text)?;
            trace!("Page {}: {} chars, {} tables", page_num, text.len(), tables.len());
            pages.push(PdfPage::new(page_num, text, tables));
        }

        Ok(PdfContent::new(pages))
    }

    fn tables_for(&self, page: u32, text: &str) -> Result<Vec<Table>> {
        let idx = self.page_index(page)?;
        match self.page_tables.get(idx) {
            Some(tables) if !tables.is_empty() => Ok(tables.clone()),
            _ => Ok(detect_tables(text, self.min_column_gap)),
        }
    }

    fn page_index(&self, page: u32) -> Result<usize> {
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }
        Ok((page - 1) as usize)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            doc.save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let mut page_texts = pdf_extract::extract_text_from_mem_by_pages(&raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        if page_texts.len() != page_count {
            debug!(
                "Text extraction returned {} pages for a {} page document",
                page_texts.len(),
                page_count
            );
            page_texts.resize(page_count, String::new());
        }

        let mut page_tables = find_tables(&raw_data);
        page_tables.resize(page_count, Vec::new());

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        self.page_texts = page_texts;
        self.page_tables = page_tables;
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("No document loaded".to_string()));
        }
        Ok(self.page_texts.join("\n\n"))
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let idx = self.page_index(page)?;
        Ok(self.page_texts.get(idx).cloned().unwrap_or_default())
    }

    fn extract_tables(&self, page: u32) -> Result<Vec<Table>> {
        let text = self.extract_page_text(page)?;
        self.tables_for(page, &text)
    }
}

/// Detect tables on every page with pdfplumber.
///
/// A document pdfplumber cannot open yields no tables rather than an error,
/// since its text already loaded.
fn find_tables(data: &[u8]) -> Vec<Vec<Table>> {
    let pdf = match pdfplumber::Pdf::open_bytes(data, None) {
        Ok(pdf) => pdf,
        Err(e) => {
            warn!("Table detection unavailable: {}", e);
            return Vec::new();
        }
    };

    let lattice = TableSettings::default();
    let stream = TableSettings {
        strategy: Strategy::Stream,
        min_words_vertical: 2,
        ..TableSettings::default()
    };

    pdf.pages()
        .iter()
        .enumerate()
        .map(|(idx, page)| match page {
            Ok(page) => {
                let mut found = page.find_tables(&lattice);
                if found.is_empty() {
                    found = page.find_tables(&stream);
                }
                trace!("Page {}: pdfplumber found {} tables", idx + 1, found.len());
                found.iter().map(convert_table).collect()
            }
            Err(e) => {
                debug!("Skipping table detection on page {}: {}", idx + 1, e);
                Vec::new()
            }
        })
        .collect()
}

fn convert_table(table: &pdfplumber::Table) -> Table {
    Table::new(
        table
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        cell.text
                            .as_deref()
                            .map(str::trim)
                            .filter(|text| !text.is_empty())
                            .map(str::to_string)
                    })
                    .collect()
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    fn build_pdf(lines: &[&str]) -> Vec<u8> {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new("Td", vec![0.into(), (-16).into()]));
            }
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        }
        operations.push(Operation::new("ET", vec![]));
        build_pdf_from(operations)
    }

    /// A two-column grid drawn with stroked rules, one text run per cell.
    fn build_ruled_pdf(cells: &[(&str, i64, i64)]) -> Vec<u8> {
        let mut operations = Vec::new();
        for y in [700, 680, 660] {
            operations.push(Operation::new("m", vec![60.into(), y.into()]));
            operations.push(Operation::new("l", vec![500.into(), y.into()]));
            operations.push(Operation::new("S", vec![]));
        }
        for x in [60, 290, 500] {
            operations.push(Operation::new("m", vec![x.into(), 700.into()]));
            operations.push(Operation::new("l", vec![x.into(), 660.into()]));
            operations.push(Operation::new("S", vec![]));
        }
        for (text, x, y) in cells {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
            operations.push(Operation::new("Td", vec![(*x).into(), (*y).into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        build_pdf_from(operations)
    }

    fn build_pdf_from(operations: Vec<Operation>) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });


        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(extractor.extract_all().is_err());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        assert!(matches!(
            extractor.load(b"not a pdf"),
            Err(PdfError::Parse(_))
        ));
    }

    #[test]
    fn test_extract_generated_pdf() {
        let data = build_pdf(&["Invoice date: Nov 26, 2016", "Total: 123.45"]);

        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();
        assert_eq!(extractor.page_count(), 1);

        let content = extractor.extract_all().unwrap();
        assert_eq!(content.pages.len(), 1);
        assert!(content.pages[0].text.contains("Total"));
        assert!(extractor.extract_text().unwrap().contains("Invoice date"));
        assert!(extractor.extract_tables(1).is_ok());
        assert!(matches!(
            extractor.extract_page_text(2),
            Err(PdfError::InvalidPage(2))
        ));
    }

    #[test]
    fn test_ruled_table() {
        let data = build_ruled_pdf(&[
            ("Name", 72, 686),
            ("Date", 300, 686),
            ("Total", 72, 666),
            ("5. Mai 2020", 300, 666),
        ]);

        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();

        let tables = extractor.extract_tables(1).unwrap();
        let table = tables
            .iter()
            .find(|t| t.column_of("Date").is_some())
            .expect("table with a Date header");
        let col = table.column_of("Date").unwrap();
        assert_eq!(table.data_rows()[0][col].as_deref(), Some("5. Mai 2020"));

        let content = extractor.extract_all().unwrap();
        assert_eq!(content.pages[0].tables, tables);
    }
}
