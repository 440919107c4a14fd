//! Batch importer for SNOMED CT bulk-authoring sheets.
//!
//! Reads a CSV sheet, parses every expression, allocates identifiers in
//! parent-first order and writes a JSON report.
//!
//! Usage:
//!   snomed-import sheet.csv --report report.json
//!   snomed-import sheet.csv --config import.json --namespace 1000124 -v

mod config;
mod pipeline;
mod report;
mod rows;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::ImportConfig;
use report::ImportReport;

#[derive(Parser, Debug)]
#[command(name = "snomed-import", version, about = "Import a SNOMED CT bulk-authoring sheet")]
struct Args {
    /// CSV authoring sheet
    input: PathBuf,

    /// JSON config file
    #[arg(short, long, env = "SNOMED_IMPORT_CONFIG")]
    config: Option<PathBuf>,

    /// Write the report here instead of stdout
    #[arg(short, long, env = "SNOMED_IMPORT_REPORT")]
    report: Option<PathBuf>,

    #[arg(long, env = "SNOMED_IMPORT_ID_COLUMN")]
    id_column: Option<String>,

    #[arg(long, env = "SNOMED_IMPORT_EXPRESSION_COLUMN")]
    expression_column: Option<String>,

    #[arg(long, env = "SNOMED_IMPORT_FSN_COLUMN")]
    fsn_column: Option<String>,

    /// Synonym column, repeatable; the first one is preferred
    #[arg(
        long = "synonym-column",
        env = "SNOMED_IMPORT_SYNONYM_COLUMNS",
        value_delimiter = ','
    )]
    synonym_columns: Vec<String>,

    #[arg(long, env = "SNOMED_IMPORT_DOCUMENTATION_COLUMN")]
    documentation_column: Option<String>,

    #[arg(long, env = "SNOMED_IMPORT_DELIMITER")]
    delimiter: Option<char>,

    /// Extension namespace for new identifiers
    #[arg(long, env = "SNOMED_IMPORT_NAMESPACE")]
    namespace: Option<u32>,

    /// Parser threads (default: one per core)
    #[arg(long, env = "SNOMED_IMPORT_THREADS")]
    threads: Option<usize>,

    /// Fail rows that contain an invalid SCTID
    #[arg(long, env = "SNOMED_IMPORT_VALIDATE_IDS")]
    validate_ids: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn apply(&self, config: &mut ImportConfig) {
        if let Some(column) = &self.id_column {
            config.id_column = column.clone();
        }
        if let Some(column) = &self.expression_column {
            config.expression_column = column.clone();
        }
        if let Some(column) = &self.fsn_column {
            config.fsn_column = column.clone();
        }
        if !self.synonym_columns.is_empty() {
            config.synonym_columns = self.synonym_columns.clone();
        }
        if let Some(column) = &self.documentation_column {
            config.documentation_column = column.clone();
        }
        if let Some(delimiter) = self.delimiter {
            config.delimiter = delimiter;
        }
        if self.namespace.is_some() {
            config.namespace = self.namespace;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        if self.validate_ids {
            config.validate_ids = true;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => ImportConfig::from_file(path)?,
        None => ImportConfig::default(),
    };
    args.apply(&mut config);
    config.check()?;

    let start = Instant::now();
    let rows = rows::load_rows_from_path(&args.input, &config)?;
    info!(rows = rows.len(), input = %args.input.display(), "loaded sheet");

    let outcomes = pipeline::run(&rows, &config)?;
    let report = ImportReport::new(args.input.display().to_string(), outcomes);
    info!(
        total = report.total,
        succeeded = report.succeeded,
        failed = report.failed,
        duplicates = report.duplicates,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "import finished"
    );

    match &args.report {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create report file: {}", path.display()))?;
            report.write_to(BufWriter::new(file))?;
            info!(path = %path.display(), "wrote report");
        }
        None => report.write_to(std::io::stdout().lock())?,
    }

    Ok(())
}
