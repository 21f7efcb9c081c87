//! Batched insert loop with retry, per-record fallback and progress snapshots.

use std::time::Instant;

use resi_model::{ImportRunStats, RecordFailure, ResidentRecord};

use crate::config::ImportConfig;
use crate::error::{ImportError, PersistenceError, Result};
use crate::observer::{ImportObserver, Sleeper, ThreadSleeper};
use crate::persistence::Persistence;
use crate::progress::{ProgressSnapshot, ProgressStore};
use crate::state::BatchOutcome;

/// Totals after [`BatchImporter::import_all`], including resumed batches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub success: usize,
    pub failed: usize,
}

/// Sends records to a [`Persistence`] collaborator one batch at a time.
///
/// Batches run strictly in sequence. A failed batch is retried as a whole
/// up to `max_retries` times with linear backoff, then degrades to one insert
/// per record. A progress snapshot is saved after every batch and removed once
/// all records are classified.
pub struct BatchImporter<P> {
    persistence: P,
    config: ImportConfig,
    progress: ProgressStore,
    sleeper: Box<dyn Sleeper>,
    row_numbers: Vec<usize>,
}

impl<P: Persistence> BatchImporter<P> {
    pub fn new(persistence: P, config: ImportConfig) -> Self {
        let progress = ProgressStore::new(config.progress_path());
        Self {
            persistence,
            config,
            progress,
            sleeper: Box::new(ThreadSleeper),
            row_numbers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Spreadsheet row of each record, by position, for failure reports.
    #[must_use]
    pub fn with_row_numbers(mut self, row_numbers: Vec<usize>) -> Self {
        self.row_numbers = row_numbers;
        self
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn batch_count(&self, records: &[ResidentRecord]) -> usize {
        self.config.batch_count(records.len())
    }

    /// Import `records`, skipping batches before `start_batch`.
    ///
    /// When resuming, `stats` must be the snapshot's stats so counts for the
    /// skipped batches carry over. Persistence failures never abort the run;
    /// only a failed progress write does, leaving the previous snapshot.
    pub fn import_all(
        &self,
        records: &[ResidentRecord],
        stats: &mut ImportRunStats,
        start_batch: usize,
        observer: &mut dyn ImportObserver,
    ) -> Result<ImportSummary> {
        let batch_size = self.config.effective_batch_size();
        let batch_count = self.batch_count(records);
        stats.start();
        let started = Instant::now();

        tracing::info!(
            records = records.len(),
            batches = batch_count,
            batch_size,
            start_batch,
            table = %self.config.table,
            "starting import"
        );

        for (index, batch) in records.chunks(batch_size).enumerate().skip(start_batch) {
            let _span = tracing::debug_span!("batch", batch = index).entered();
            observer.on_batch_started(index, batch_count, batch.len());

            let offset = index * batch_size;
            let outcome = self.import_batch(index, offset, batch, stats, observer);

            self.progress
                .save(&ProgressSnapshot::new(index, stats.clone()))
                .map_err(|source| ImportError::ProgressWrite {
                    batch: index,
                    source: Box::new(source),
                })?;
            observer.on_batch_finished(index, outcome, stats);

            let is_last = index + 1 == batch_count;
            if !is_last && !outcome.is_degraded() && !self.config.batch_delay.is_zero() {
                self.sleeper.sleep(self.config.batch_delay);
            }
        }

        stats.finish();
        self.progress.clear()?;
        tracing::info!(
            success = stats.success,
            failed = stats.failed,
            duration_ms = started.elapsed().as_millis() as u64,
            "import complete"
        );

        Ok(ImportSummary {
            success: stats.success,
            failed: stats.failed,
        })
    }

    fn import_batch(
        &self,
        index: usize,
        offset: usize,
        batch: &[ResidentRecord],
        stats: &mut ImportRunStats,
        observer: &mut dyn ImportObserver,
    ) -> BatchOutcome {
        let max_attempts = self.config.max_attempts();
        let mut attempt: u32 = 1;
        loop {
            match self.persistence.insert_many(&self.config.table, batch) {
                Ok(()) => {
                    stats.record_success(batch.len());
                    tracing::debug!(batch = index, attempt, records = batch.len(), "batch inserted");
                    return BatchOutcome::Succeeded { attempts: attempt };
                }
                Err(error) => {
                    tracing::warn!(
                        batch = index,
                        attempt,
                        max_attempts,
                        code = error.code.as_deref().unwrap_or(""),
                        "batch insert failed: {error}"
                    );
                    if attempt >= max_attempts {
                        break;
                    }
                    self.sleeper.sleep(self.config.backoff_step * attempt);
                    attempt += 1;
                }
            }
        }

        tracing::warn!(batch = index, records = batch.len(), "falling back to per-record inserts");
        let mut inserted = 0;
        let mut failed = 0;
        for (position, record) in batch.iter().enumerate() {
            match self.persistence.insert_one(&self.config.table, record) {
                Ok(()) => {
                    stats.record_success(1);
                    inserted += 1;
                }
                Err(error) => {
                    let row = self.row_numbers.get(offset + position).copied();
                    tracing::warn!(batch = index, row, "record insert failed: {error}");
                    stats.record_failure(failure_for(row, record, &error));
                    failed += 1;
                }
            }
            observer.on_record(stats);
        }
        BatchOutcome::Degraded { inserted, failed }
    }
}

fn failure_for(row: Option<usize>, record: &ResidentRecord, error: &PersistenceError) -> RecordFailure {
    RecordFailure {
        row,
        resident: record.display_name().to_string(),
        error: error.message.clone(),
        details: error.detail_text().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_prefers_details_over_hint() {
        let record = ResidentRecord {
            full_name: Some("Lê Văn C".into()),
            ..ResidentRecord::default()
        };
        let error = PersistenceError::new("violates check constraint")
            .with_hint("check the phone number")
            .with_details("Failing row contains (...)");
        let failure = failure_for(Some(9), &record, &error);
        assert_eq!(failure.resident, "Lê Văn C");
        assert_eq!(failure.details.as_deref(), Some("Failing row contains (...)"));

        let hinted = failure_for(None, &ResidentRecord::default(), &PersistenceError::new("x").with_hint("h"));
        assert_eq!(hinted.resident, "(unnamed)");
        assert_eq!(hinted.details.as_deref(), Some("h"));
    }
}
