//! JSON error log for rows that were not imported.

use std::path::Path;

use chrono::{DateTime, Utc};
use resi_model::{ImportRunStats, RecordFailure, ValidationOutcome};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::io::write_json_atomic;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorLogSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    pub skipped: usize,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: f64,
}

/// A row rejected by validation and never sent to persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row: usize,
    pub resident: String,
    pub errors: Vec<String>,
}

impl SkippedRow {
    pub fn from_outcome(outcome: &ValidationOutcome) -> Self {
        Self {
            row: outcome.row_number,
            resident: outcome.record.display_name().to_string(),
            errors: outcome
                .errors
                .iter()
                .map(|issue| format!("{}: {}", issue.field, issue.message))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLog {
    pub summary: ErrorLogSummary,
    /// Records the backend refused.
    pub errors: Vec<RecordFailure>,
    #[serde(default)]
    pub skipped: Vec<SkippedRow>,
}

impl ErrorLog {
    pub fn from_stats(stats: &ImportRunStats) -> Self {
        Self {
            summary: ErrorLogSummary {
                total: stats.total,
                success: stats.success,
                failed: stats.failed,
                skipped: stats.skipped,
                start_time: stats.start_time,
                end_time: stats.end_time,
                duration_seconds: stats.duration().as_secs_f64(),
            },
            errors: stats.errors.clone(),
            skipped: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_skipped(mut self, skipped: Vec<SkippedRow>) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.skipped.is_empty()
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)?;
        tracing::info!(
            path = %path.display(),
            errors = self.errors.len(),
            skipped = self.skipped.len(),
            "wrote error log"
        );
        Ok(())
    }
}

/// Write the log when any row was skipped or refused; returns whether it did.
pub fn write_error_log(path: &Path, stats: &ImportRunStats, skipped: Vec<SkippedRow>) -> Result<bool> {
    let log = ErrorLog::from_stats(stats).with_skipped(skipped);
    if log.is_empty() {
        return Ok(false);
    }
    log.write(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resi_model::{FieldIssue, TargetField};
    use tempfile::tempdir;

    #[test]
    fn writes_only_when_there_are_failures() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("import-log.json");
        let mut stats = ImportRunStats::new(2);
        stats.record_success(2);

        assert!(!write_error_log(&path, &stats, Vec::new()).unwrap());
        assert!(!path.exists());

        stats.record_failure(RecordFailure {
            row: Some(7),
            resident: "Phạm Văn D".into(),
            error: "duplicate key value violates unique constraint".into(),
            details: Some("Key (phone_number) already exists.".into()),
        });
        assert!(write_error_log(&path, &stats, Vec::new()).unwrap());

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["summary"]["failed"], 1);
        assert_eq!(json["errors"][0]["resident"], "Phạm Văn D");
        assert_eq!(json["errors"][0]["row"], 7);
    }

    #[test]
    fn validation_rejects_alone_produce_a_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("import-log.json");
        let mut stats = ImportRunStats::new(1);
        stats.record_success(1);
        stats.skipped = 1;

        let mut outcome = ValidationOutcome::new(5);
        outcome.record.full_name = Some("Lê Văn C".into());
        outcome.push_error(FieldIssue::new(
            TargetField::PhoneNumber,
            "12345",
            "must contain at least 10 digits (found 5)",
        ));
        outcome.push_error(FieldIssue::new(TargetField::Address, "", "is required"));

        assert!(write_error_log(&path, &stats, vec![SkippedRow::from_outcome(&outcome)]).unwrap());

        let log: ErrorLog = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(log.errors.is_empty());
        assert_eq!(log.summary.skipped, 1);
        assert_eq!(
            log.skipped,
            vec![SkippedRow {
                row: 5,
                resident: "Lê Văn C".into(),
                errors: vec![
                    "phoneNumber: must contain at least 10 digits (found 5)".into(),
                    "address: is required".into(),
                ],
            }]
        );
    }
}
