//! Inspect command - show a PDF the way the extractors see it.

use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::json;

use invex_core::{DocumentLoader, PdfContent, PdfFileLoader};

use super::config;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// PDF file to inspect
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: InspectFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum InspectFormat {
    /// Page lines and tables
    Text,
    /// JSON document
    Json,
}

pub fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = config::load(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let loader = PdfFileLoader::new().with_min_column_gap(config.extraction.min_column_gap);
    let content = loader.load(&args.input)?;

    let output = match args.format {
        InspectFormat::Text => format_text(&content),
        InspectFormat::Json => serde_json::to_string_pretty(&to_json(&content))?,
    };
    println!("{}", output);

    Ok(())
}

fn to_json(content: &PdfContent) -> serde_json::Value {
    let pages: Vec<_> = content
        .pages
        .iter()
        .map(|page| {
            json!({
                "number": page.number,
                "lines": page.lines().collect::<Vec<_>>(),
                "tables": page.tables.iter().map(|t| t.rows()).collect::<Vec<_>>(),
            })
        })
        .collect();

    json!({ "pages": pages })
}

fn format_text(content: &PdfContent) -> String {
    let mut output = String::new();

    for page in &content.pages {
        output.push_str(&format!("{}\n", style(format!("Page {}", page.number)).bold()));
        for (i, line) in page.lines().enumerate() {
            output.push_str(&format!("{:>4}  {}\n", i + 1, line));
        }

        for (i, table) in page.tables.iter().enumerate() {
            output.push_str(&format!(
                "\n  Table {} ({} rows)\n",
                i + 1,
                table.rows().len()
            ));
            for row in table.rows() {
                let cells: Vec<&str> = row.iter().map(|c| c.as_deref().unwrap_or("")).collect();
                output.push_str(&format!("    | {} |\n", cells.join(" | ")));
            }
        }
        output.push('\n');
    }

    output
}
