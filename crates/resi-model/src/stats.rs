//! Run-level counters for one bulk import.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One record that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFailure {
    /// Spreadsheet row, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    pub resident: String,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Counters mutated by the batch loop and persisted with each progress snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRunStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    /// Rows excluded by validation.
    pub skipped: usize,
    pub errors: Vec<RecordFailure>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl ImportRunStats {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn start(&mut self) {
        if self.start_time.is_none() {
            self.start_time = Some(Utc::now());
        }
        self.end_time = None;
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Utc::now());
    }

    pub fn record_success(&mut self, count: usize) {
        self.success += count;
    }

    pub fn record_failure(&mut self, failure: RecordFailure) {
        self.failed += 1;
        self.errors.push(failure);
    }

    /// Records classified so far.
    pub fn processed(&self) -> usize {
        self.success + self.failed
    }

    /// Wall time between start and end (or now, while running).
    pub fn duration(&self) -> Duration {
        let Some(start) = self.start_time else {
            return Duration::ZERO;
        };
        let end = self.end_time.unwrap_or_else(Utc::now);
        (end - start).to_std().unwrap_or(Duration::ZERO)
    }

    /// Imported records per second.
    pub fn throughput(&self) -> f64 {
        let seconds = self.duration().as_secs_f64();
        if seconds > 0.0 {
            self.success as f64 / seconds
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_are_counted_and_kept() {
        let mut stats = ImportRunStats::new(3);
        stats.record_success(2);
        stats.record_failure(RecordFailure {
            row: Some(4),
            resident: "Trần Thị B".into(),
            error: "duplicate key".into(),
            details: None,
        });
        assert_eq!(stats.processed(), 3);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.errors.len(), 1);
    }

    #[test]
    fn duration_is_zero_before_start() {
        let stats = ImportRunStats::default();
        assert_eq!(stats.duration(), Duration::ZERO);
        assert_eq!(stats.throughput(), 0.0);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(ImportRunStats::new(1)).unwrap();
        assert!(json.get("startTime").is_some());
        assert_eq!(json["total"], 1);
    }
}
