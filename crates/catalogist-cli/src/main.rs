use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use catalogist_core::{
    AppConfig, BatchReport, CoreError, ExitCode, SourceDocument, collect_inputs, export,
};
use catalogist_extract::{
    DisabledLookup, ExtractError, Pipeline, RuleBasedNlp, SearchworksLookup, UrlLookup,
};

// ─── CLI Definition ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "catalogist",
    about = "Extract bibliographic metadata from EAD, MODS and MARC XML into CSV tables",
    version,
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output in JSON format.
    /// Also enabled by setting CATALOGIST_JSON=1.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract metadata and write one CSV per dialect.
    Parse {
        /// XML files or directories.
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Output directory (defaults to `output.directory`).
        #[arg(long)]
        out: Option<PathBuf>,
        /// Skip finding-aid URL lookups.
        #[arg(long)]
        no_lookup: bool,
        #[arg(long)]
        recursive: bool,
    },

    /// Print the dialect of each document.
    Classify {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(long)]
        recursive: bool,
    },

    /// Config management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file path.
    Path,
    /// Print the effective configuration.
    Show,
}

// ─── Main ────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let start = Instant::now();
    let cli = Cli::parse();
    let json_output = cli.json || std::env::var("CATALOGIST_JSON").as_deref() == Ok("1");
    let config = AppConfig::load()
        .with_context(|| format!("loading {}", AppConfig::config_path().display()))?;

    match cli.command {
        Commands::Parse {
            paths,
            out,
            no_lookup,
            recursive,
        } => {
            let files = input_files(&paths, recursive, json_output)?;
            let lookup: Arc<dyn UrlLookup> = if config.lookup.enabled && !no_lookup {
                Arc::new(SearchworksLookup::new(&config.lookup).context("building HTTP client")?)
            } else {
                Arc::new(DisabledLookup)
            };
            let pipeline = Pipeline::new(&config, Arc::new(RuleBasedNlp::new()), lookup);
            let report = pipeline.run_files(&files).await;

            let dir = out.unwrap_or_else(|| config.output_dir());
            let written = export::write_report(&report, &dir, &config.output.list_separator)
                .with_context(|| format!("writing tables to {}", dir.display()))?;
            let dur = start.elapsed().as_millis();

            if json_output {
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "report": report, "files": written },
                    "meta": { "duration_ms": dur }
                }))?;
            } else {
                print_summary(&report, &written);
            }

            if !report.failed.is_empty() {
                std::process::exit(ExitCode::PartialFailure as i32);
            }
        }

        Commands::Classify { paths, recursive } => {
            let files = input_files(&paths, recursive, json_output)?;
            let mut items = Vec::with_capacity(files.len());
            for path in &files {
                let name = SourceDocument::name_for(path);
                let classified = SourceDocument::read(path)
                    .map_err(ExtractError::from)
                    .and_then(|source| Pipeline::classify_source(&source));
                let dialect = match classified {
                    Ok(dialect) => dialect.label().to_string(),
                    Err(e) => format!("error: {e}"),
                };
                if !json_output {
                    println!("{dialect:<14}  {name}");
                }
                items.push(serde_json::json!({ "name": name, "dialect": dialect }));
            }
            if json_output {
                let dur = start.elapsed().as_millis();
                print_json(&serde_json::json!({
                    "status": "ok",
                    "data": { "items": items, "total": items.len() },
                    "meta": { "duration_ms": dur }
                }))?;
            }
        }

        Commands::Config { action } => match action {
            ConfigAction::Path => {
                let path = AppConfig::config_path();
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":{"path":path}}))?;
                } else {
                    println!("{}", path.display());
                }
            }
            ConfigAction::Show => {
                if json_output {
                    print_json(&serde_json::json!({"status":"ok","data":config}))?;
                } else {
                    print!("{}", toml::to_string_pretty(&config)?);
                }
            }
        },
    }

    Ok(())
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn input_files(paths: &[PathBuf], recursive: bool, quiet: bool) -> Result<Vec<PathBuf>> {
    let inputs = match collect_inputs(paths, recursive) {
        Ok(inputs) => inputs,
        Err(CoreError::InputNotFound(path)) => {
            eprintln!("Input not found: {path}");
            std::process::exit(ExitCode::NotFound as i32);
        }
        Err(e) => return Err(e.into()),
    };

    for path in &inputs.ignored {
        tracing::warn!(path = %path.display(), "not an XML file, ignoring");
        if !quiet {
            eprintln!("Ignoring {} (not an .xml file)", path.display());
        }
    }
    Ok(inputs.documents)
}

fn print_summary(report: &BatchReport, written: &[PathBuf]) {
    println!("Processed {} documents:", report.total);
    for table in report.tables() {
        println!("  {:<14} {:>5} rows", table.dialect().label(), table.len());
    }
    if !report.skipped.is_empty() {
        println!("Skipped {} documents with an unrecognized dialect:", report.skipped.len());
        for name in &report.skipped {
            println!("  {name}");
        }
    }
    if !report.failed.is_empty() {
        println!("Failed {} documents:", report.failed.len());
        for failed in &report.failed {
            println!("  {}: {}", failed.name, failed.error);
        }
    }
    if written.is_empty() {
        println!("No tables written.");
    }
    for path in written {
        println!("Wrote {}", path.display());
    }
}

fn print_json(val: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(val)?);
    Ok(())
}
