//! Import configuration.

use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

/// Column mapping and allocation settings for one import run.
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    /// Column holding an existing SCTID. Empty cells get a new identifier.
    pub id_column: String,
    /// Column holding the expression. Required.
    pub expression_column: String,
    pub fsn_column: String,
    /// Synonym columns. The first non-empty one is preferred.
    pub synonym_columns: Vec<String>,
    pub documentation_column: String,
    pub delimiter: char,
    /// Extension namespace. `None` allocates core identifiers.
    pub namespace: Option<u32>,
    /// Parser worker threads. `None` uses one per core.
    pub threads: Option<usize>,
    pub concept_start: u64,
    pub relationship_start: u64,
    /// Fail rows whose expression contains an invalid SCTID.
    pub validate_ids: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            id_column: "sctid".to_string(),
            expression_column: "expression".to_string(),
            fsn_column: "fsn".to_string(),
            synonym_columns: vec!["synonym".to_string()],
            documentation_column: "notes".to_string(),
            delimiter: ',',
            namespace: None,
            threads: None,
            concept_start: 1,
            relationship_start: 1,
            validate_ids: false,
        }
    }
}

impl ImportConfig {
    /// Loads a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Checks settings that serde cannot.
    pub fn check(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter must be a single ASCII character, got {:?}", self.delimiter);
        }
        if self.expression_column.is_empty() {
            bail!("expression_column must not be empty");
        }
        if let Some(ns) = self.namespace {
            if ns > 9_999_999 {
                bail!("namespace must have at most 7 digits, got {ns}");
            }
        }
        Ok(())
    }
}
