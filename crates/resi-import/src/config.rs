//! Import tuning knobs.

use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(1000);
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(200);
pub const DEFAULT_LOGS_DIR: &str = "logs";
pub const DEFAULT_TABLE: &str = "residents";

pub const PROGRESS_FILE_NAME: &str = "import-progress.json";
pub const ERROR_LOG_FILE_NAME: &str = "import-log.json";

/// Settings for one [`BatchImporter`](crate::BatchImporter) run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Records per bulk insert.
    pub batch_size: usize,
    /// Bulk retries after a batch's first attempt fails.
    pub max_retries: u32,
    /// Backoff before retry `n` is `backoff_step * n`.
    pub backoff_step: Duration,
    /// Pause after a batch that went in without degrading.
    pub batch_delay: Duration,
    /// Directory holding the progress snapshot and the error log.
    pub logs_dir: PathBuf,
    /// Destination table.
    pub table: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_step: DEFAULT_BACKOFF_STEP,
            batch_delay: DEFAULT_BATCH_DELAY,
            logs_dir: PathBuf::from(DEFAULT_LOGS_DIR),
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

impl ImportConfig {
    /// Same defaults, rooted at another logs directory.
    pub fn with_logs_dir(logs_dir: impl AsRef<Path>) -> Self {
        Self {
            logs_dir: logs_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    pub fn progress_path(&self) -> PathBuf {
        self.logs_dir.join(PROGRESS_FILE_NAME)
    }

    pub fn error_log_path(&self) -> PathBuf {
        self.logs_dir.join(ERROR_LOG_FILE_NAME)
    }

    pub(crate) fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    /// Bulk calls per batch before per-record fallback.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Number of batches `count` records split into.
    pub fn batch_count(&self, count: usize) -> usize {
        count.div_ceil(self.effective_batch_size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_bulk_import_settings() {
        let config = ImportConfig::default();
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.max_attempts(), 4);
        assert_eq!(config.batch_delay, Duration::from_millis(200));
        assert_eq!(config.progress_path(), Path::new("logs/import-progress.json"));
        assert_eq!(config.error_log_path(), Path::new("logs/import-log.json"));
    }

    #[test]
    fn batch_count_rounds_up() {
        let config = ImportConfig::default();
        assert_eq!(config.batch_count(250), 3);
        assert_eq!(config.batch_count(200), 2);
        assert_eq!(config.batch_count(0), 0);
    }
}
