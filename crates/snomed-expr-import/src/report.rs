//! JSON import report.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;
use snomed_expr::{Description, Relationship};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Created,
    Failed,
}

/// A description as it will be written to the release files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionReport {
    pub term: String,
    pub language_code: String,
    pub type_id: String,
    pub acceptability_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_tag: Option<String>,
}

impl From<&Description> for DescriptionReport {
    fn from(description: &Description) -> Self {
        Self {
            term: description.term.clone(),
            language_code: description.language_code.clone(),
            type_id: description.description_type.concept_id().to_string(),
            acceptability_id: description.acceptability.concept_id().to_string(),
            semantic_tag: description.semantic_tag().map(str::to_string),
        }
    }
}

/// Outcome of a single source row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowReport {
    pub row: usize,
    pub concept_id: Option<String>,
    pub status: RowStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Stable parse error code, when parsing failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_position: Option<usize>,
    /// Normalized expression text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    /// Row of the first concept with the same definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicate_of: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub descriptions: Vec<DescriptionReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
}

impl RowReport {
    pub fn failed(
        row: usize,
        concept_id: Option<String>,
        reason: impl Into<String>,
        code: Option<&'static str>,
    ) -> Self {
        Self {
            row,
            concept_id,
            status: RowStatus::Failed,
            reason: Some(reason.into()),
            code,
            load_position: None,
            expression: None,
            duplicate_of: None,
            descriptions: Vec::new(),
            relationships: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub run_id: String,
    pub source: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub rows: Vec<RowReport>,
}

impl ImportReport {
    /// Summarizes row outcomes under a fresh run id.
    pub fn new(source: impl Into<String>, rows: Vec<RowReport>) -> Self {
        let succeeded = rows
            .iter()
            .filter(|r| r.status == RowStatus::Created)
            .count();
        let duplicates = rows.iter().filter(|r| r.duplicate_of.is_some()).count();
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            source: source.into(),
            total: rows.len(),
            succeeded,
            failed: rows.len() - succeeded,
            duplicates,
            rows,
        }
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self).context("Failed to serialize report")?;
        writeln!(writer).context("Failed to write report")?;
        writer.flush().context("Failed to write report")?;
        Ok(())
    }
}
