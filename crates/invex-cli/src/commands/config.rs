//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use invex_core::models::config::InvexConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file listing two sample invoices
    Init(InitArgs),

    /// Show configuration file path
    Path,

    /// Check the configuration for errors
    Validate,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(config_path),
        ConfigCommand::Init(init_args) => init_config(init_args, config_path),
        ConfigCommand::Path => show_path(config_path),
        ConfigCommand::Validate => validate_config(config_path),
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invex")
        .join("config.json")
}

fn resolve_path(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load the configuration named by `-c`, else the default file, else defaults.
///
/// An explicit path that does not exist is an error.
pub fn load(config_path: Option<&str>) -> anyhow::Result<InvexConfig> {
    if let Some(path) = config_path {
        return Ok(InvexConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Using configuration from {}", path.display());
        Ok(InvexConfig::from_file(&path)?)
    } else {
        debug!("No configuration at {}, using defaults", path.display());
        Ok(InvexConfig::default())
    }
}

fn show_config(config_path: Option<&str>) -> anyhow::Result<()> {
    let path = resolve_path(config_path);

    let config = if path.exists() {
        InvexConfig::from_file(&path)?
    } else {
        eprintln!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
        InvexConfig::default()
    };

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| resolve_path(config_path));

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    // Create parent directory if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let config = InvexConfig::sample();
    config.save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn show_path(config_path: Option<&str>) -> anyhow::Result<()> {
    let path = resolve_path(config_path);

    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'invex config init' to create a configuration file.");
    }

    Ok(())
}

fn validate_config(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load(config_path)?;
    config.validate()?;

    println!(
        "{} Configuration is valid ({} documents)",
        style("✓").green(),
        config.documents.len()
    );

    Ok(())
}
