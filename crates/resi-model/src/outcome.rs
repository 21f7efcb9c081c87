use serde::{Deserialize, Serialize};

use crate::field::TargetField;
use crate::record::ResidentRecord;

/// A per-field problem found while validating one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldIssue {
    pub field: TargetField,
    pub raw_value: String,
    pub message: String,
}

impl FieldIssue {
    pub fn new(field: TargetField, raw_value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            raw_value: raw_value.into(),
            message: message.into(),
        }
    }
}

/// Result of validating one spreadsheet row.
///
/// `row_number` is spreadsheet-relative and 1-based, so the first data row
/// is row 2. Warnings never block import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub row_number: usize,
    pub record: ResidentRecord,
    pub errors: Vec<FieldIssue>,
    pub warnings: Vec<FieldIssue>,
}

impl ValidationOutcome {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            record: ResidentRecord::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn push_error(&mut self, issue: FieldIssue) {
        self.errors.push(issue);
    }

    pub fn push_warning(&mut self, issue: FieldIssue) {
        self.warnings.push(issue);
    }

    /// Human-readable lines for the errors of this row.
    pub fn error_messages(&self) -> impl Iterator<Item = String> + '_ {
        self.errors
            .iter()
            .map(move |issue| format!("Row {}: {}: {}", self.row_number, issue.field, issue.message))
    }
}
