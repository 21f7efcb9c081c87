//! Bulk insertion of validated residents.
//!
//! [`BatchImporter`] splits records into fixed-size batches and sends each to
//! a [`Persistence`] collaborator. Failed batches are retried with linear
//! backoff and, once attempts run out, inserted one record at a time so a
//! single bad row cannot sink its neighbours. After every batch a
//! [`ProgressSnapshot`] is written so an interrupted run can resume.

pub mod config;
pub mod error;
pub mod error_log;
mod importer;
mod io;
pub mod observer;
pub mod persistence;
pub mod progress;
pub mod rest;
pub mod state;

pub use config::ImportConfig;
pub use error::{ImportError, PersistenceError, Result};
pub use error_log::{ErrorLog, ErrorLogSummary, SkippedRow, write_error_log};
pub use importer::{BatchImporter, ImportSummary};
pub use observer::{ImportObserver, NoSleep, NoopObserver, Sleeper, ThreadSleeper};
pub use persistence::Persistence;
pub use progress::{ProgressSnapshot, ProgressStore};
pub use rest::RestPersistence;
pub use state::{BatchOutcome, RunState};
