use resi_model::{ResidentRecord, ValidationOutcome};
use serde::Serialize;

/// Outcomes for a whole sheet, in row order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub outcomes: Vec<ValidationOutcome>,
}

impl ValidationReport {
    pub fn new(outcomes: Vec<ValidationOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn valid_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.total() - self.valid_count()
    }

    pub fn error_count(&self) -> usize {
        self.outcomes.iter().map(|outcome| outcome.errors.len()).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.outcomes.iter().map(|outcome| outcome.warnings.len()).sum()
    }

    /// Records of rows without errors, ready for import.
    pub fn valid_records(&self) -> Vec<ResidentRecord> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.valid())
            .map(|outcome| outcome.record.clone())
            .collect()
    }

    /// Spreadsheet rows of [`valid_records`](Self::valid_records), in the same order.
    pub fn valid_row_numbers(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.valid())
            .map(|outcome| outcome.row_number)
            .collect()
    }

    pub fn invalid_outcomes(&self) -> impl Iterator<Item = &ValidationOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.valid())
    }

    /// The first `limit` error lines across all rows.
    pub fn first_messages(&self, limit: usize) -> Vec<String> {
        self.outcomes
            .iter()
            .flat_map(ValidationOutcome::error_messages)
            .take(limit)
            .collect()
    }
}
