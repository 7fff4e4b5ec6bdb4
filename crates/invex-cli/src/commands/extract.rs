//! Extract command - run the configured documents and write the spreadsheets.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use invex_core::models::config::{DocumentConfig, MatchPolicy};
use invex_core::{DocumentOutcome, DocumentStatus, Exporter, PdfFileLoader, Pipeline};

use super::config;

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Output directory (default: output.directory from the config)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Stop at the first document that cannot be loaded
    #[arg(long)]
    fail_fast: bool,

    /// Which occurrence wins when a label appears more than once
    #[arg(short, long, value_enum)]
    policy: Option<PolicyArg>,

    /// Also write a per-document summary CSV
    #[arg(long)]
    summary: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum PolicyArg {
    /// First occurrence
    First,
    /// Last occurrence
    Last,
    /// Every occurrence
    All,
}

impl From<PolicyArg> for MatchPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::First => MatchPolicy::First,
            PolicyArg::Last => MatchPolicy::Last,
            PolicyArg::All => MatchPolicy::All,
        }
    }
}

pub fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = config::load(config_path)?;
    if args.fail_fast {
        config.run.fail_fast = true;
    }
    if let Some(policy) = args.policy {
        config.extraction.match_policy = policy.into();
    }
    config.validate()?;

    let documents = expand_documents(&config.documents)?;
    if documents.is_empty() {
        anyhow::bail!("No documents configured. Run 'invex config init' to create a configuration file.");
    }

    println!(
        "{} Found {} documents to process",
        style("ℹ").blue(),
        documents.len()
    );

    let pb = ProgressBar::new(documents.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents {msg}")?
            .progress_chars("=>-"),
    );

    let loader = PdfFileLoader::new().with_min_column_gap(config.extraction.min_column_gap);
    let pipeline = Pipeline::new(loader, config.clone());
    let report = pipeline.run_with_progress(&documents, |outcome| {
        pb.set_message(outcome.file.clone());
        pb.inc(1);
    });
    pb.finish_and_clear();
    let report = report?;

    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.output.directory.clone());
    let paths = Exporter::from_config(&config).write(&report.records, &output_dir)?;

    println!(
        "{} Wrote {} records to {} and {}",
        style("✓").green(),
        report.records.len(),
        paths.xlsx.display(),
        paths.csv.display()
    );

    if args.summary {
        let summary_path = output_dir.join("summary.csv");
        write_summary(&summary_path, &report.outcomes)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let successful = report.successful().count();
    let failed: Vec<_> = report.failed().collect();

    println!();
    println!(
        "{} Processed {} documents in {:?}",
        style("✓").green(),
        report.outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed documents:").red());
        for outcome in failed {
            if let DocumentStatus::Failed { error } = &outcome.status {
                println!("  - {}: {}", outcome.file, error);
            }
        }
    }

    Ok(())
}

/// Expand glob patterns in document paths, one entry per matched file.
///
/// Plain paths are kept as they are so a missing file is reported by the run.
fn expand_documents(documents: &[DocumentConfig]) -> anyhow::Result<Vec<DocumentConfig>> {
    let mut expanded = Vec::with_capacity(documents.len());

    for doc in documents {
        if !is_pattern(&doc.file) {
            expanded.push(doc.clone());
            continue;
        }

        let mut matches: Vec<PathBuf> = glob(&doc.file)?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        matches.sort();

        if matches.is_empty() {
            warn!("No files match pattern {}", doc.file);
        }
        debug!("Pattern {} matched {} files", doc.file, matches.len());

        expanded.extend(
            matches
                .iter()
                .map(|path| doc.for_file(path.to_string_lossy())),
        );
    }

    Ok(expanded)
}

fn is_pattern(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

fn write_summary(path: &Path, outcomes: &[DocumentOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["file", "status", "records", "malformed", "error"])?;

    for outcome in outcomes {
        match &outcome.status {
            DocumentStatus::Success { records, malformed } => {
                wtr.write_record([
                    outcome.file.as_str(),
                    "success",
                    &records.to_string(),
                    &malformed.to_string(),
                    "",
                ])?;
            }
            DocumentStatus::Failed { error } => {
                wtr.write_record([outcome.file.as_str(), "error", "", "", error.as_str()])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
