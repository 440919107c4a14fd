//! Reading authoring sheets.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, warn};

use crate::config::ImportConfig;

/// One data row of an authoring sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRow {
    /// 1-based data row number, header excluded.
    pub row: usize,
    pub id: Option<String>,
    pub expression: String,
    pub fsn: Option<String>,
    pub synonyms: Vec<String>,
    pub documentation: Option<String>,
}

/// Column positions resolved from the header row.
struct Columns {
    id: Option<usize>,
    expression: usize,
    fsn: Option<usize>,
    synonyms: Vec<usize>,
    documentation: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord, config: &ImportConfig) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let expression = find(&config.expression_column).ok_or_else(|| {
            anyhow!(
                "Missing required column: {} (found: {})",
                config.expression_column,
                headers.iter().collect::<Vec<_>>().join(", ")
            )
        })?;

        let id = find(&config.id_column);
        if id.is_none() {
            warn!(column = %config.id_column, "no id column, every row gets a new identifier");
        }
        let fsn = find(&config.fsn_column);
        if fsn.is_none() {
            debug!(column = %config.fsn_column, "no FSN column");
        }

        Ok(Self {
            id,
            expression,
            fsn,
            synonyms: config.synonym_columns.iter().filter_map(|c| find(c)).collect(),
            documentation: find(&config.documentation_column),
        })
    }
}

fn cell(record: &csv::StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Reads every data row from a CSV source.
pub fn load_rows<R: Read>(reader: R, config: &ImportConfig) -> Result<Vec<SourceRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(config.delimiter as u8)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read header row")?.clone();
    let columns = Columns::resolve(&headers, config)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", idx + 1))?;
        rows.push(SourceRow {
            row: idx + 1,
            id: cell(&record, columns.id),
            expression: cell(&record, Some(columns.expression)).unwrap_or_default(),
            fsn: cell(&record, columns.fsn),
            synonyms: columns
                .synonyms
                .iter()
                .filter_map(|&i| cell(&record, Some(i)))
                .collect(),
            documentation: cell(&record, columns.documentation),
        });
    }

    debug!(rows = rows.len(), "loaded authoring sheet");
    Ok(rows)
}

/// Reads every data row from a CSV file.
pub fn load_rows_from_path(path: &Path, config: &ImportConfig) -> Result<Vec<SourceRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    load_rows(file, config).with_context(|| format!("Failed to load {}", path.display()))
}
