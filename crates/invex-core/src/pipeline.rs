//! End-to-end extraction over a batch of documents.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::aggregate::aggregate;
use crate::error::{InvexError, Result};
use crate::extract::{DocumentExtractor, DocumentFields};
use crate::models::config::{DocumentConfig, InvexConfig};
use crate::models::record::ExtractedRecord;
use crate::pdf::DocumentLoader;

/// What happened to one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Loaded and scanned. `malformed` counts fields located but not understood.
    Success { records: usize, malformed: usize },
    /// The document could not be loaded.
    Failed { error: String },
}

/// Per-document entry of a run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentOutcome {
    pub file: String,
    #[serde(flatten)]
    pub status: DocumentStatus,
}

impl DocumentOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self.status, DocumentStatus::Success { .. })
    }
}

/// Records of a run plus one outcome per document, in configured order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub records: Vec<ExtractedRecord>,
    pub outcomes: Vec<DocumentOutcome>,
}

impl RunReport {
    pub fn successful(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &DocumentOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn has_failures(&self) -> bool {
        self.failed().next().is_some()
    }
}

/// Loads each configured document once and extracts its fields.
pub struct Pipeline<L> {
    loader: L,
    config: InvexConfig,
}

impl<L: DocumentLoader> Pipeline<L> {
    pub fn new(loader: L, config: InvexConfig) -> Self {
        Self { loader, config }
    }

    /// Load one document and run its date and value extractions.
    pub fn extract(&self, doc: &DocumentConfig) -> Result<DocumentFields> {
        let content = self.loader.load(Path::new(&doc.file))?;
        let policy = self.config.policy_for(doc);
        debug!(
            "Extracting from {} ({} pages, mode {:?}, policy {})",
            doc.file,
            content.pages.len(),
            doc.mode,
            policy
        );

        Ok(DocumentExtractor::new(doc, policy).extract(&content))
    }

    /// Records for one document.
    pub fn process(&self, doc: &DocumentConfig) -> Result<Vec<ExtractedRecord>> {
        Ok(aggregate(&doc.file, self.extract(doc)?))
    }

    /// Run the configured document list.
    pub fn run_configured(&self) -> Result<RunReport> {
        self.run(&self.config.documents)
    }

    pub fn run(&self, docs: &[DocumentConfig]) -> Result<RunReport> {
        self.run_with_progress(docs, |_| {})
    }

    /// Process `docs` in order, calling `on_document` after each one.
    ///
    /// A document that fails to load is reported and skipped unless
    /// `run.fail_fast` is set, in which case the run stops with its error.
    pub fn run_with_progress<F>(&self, docs: &[DocumentConfig], mut on_document: F) -> Result<RunReport>
    where
        F: FnMut(&DocumentOutcome),
    {
        let mut report = RunReport::default();

        for doc in docs {
            info!("Processing {}", doc.file);

            let status = match self.extract(doc) {
                Ok(fields) => {
                    let malformed = fields.malformed_count();
                    if malformed > 0 {
                        warn!("{}: {} malformed field(s)", doc.file, malformed);
                    }
                    let records = aggregate(&doc.file, fields);
                    let count = records.len();
                    report.records.extend(records);
                    DocumentStatus::Success {
                        records: count,
                        malformed,
                    }
                }
                Err(e) if self.config.run.fail_fast => {
                    return Err(InvexError::Document {
                        file: doc.file.clone(),
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    warn!("Failed to process {}: {}", doc.file, e);
                    DocumentStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };

            let outcome = DocumentOutcome {
                file: doc.file.clone(),
                status,
            };
            on_document(&outcome);
            report.outcomes.push(outcome);
        }

        info!(
            "Run complete: {} records from {} documents",
            report.records.len(),
            report.outcomes.len()
        );
        Ok(report)
    }
}
