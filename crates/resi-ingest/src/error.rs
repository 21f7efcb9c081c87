//! Error types for spreadsheet ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while checking or decoding an uploaded spreadsheet.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IngestError {
    // === Pre-check Errors ===
    /// Spreadsheet file not found.
    #[error("spreadsheet not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Extension is not a supported spreadsheet format.
    #[error("unsupported file type '{name}': expected .xlsx, .xls, .xlsm, .ods or .csv")]
    UnsupportedExtension { name: String },

    /// File exceeds the upload ceiling.
    #[error("file '{name}' is too large: {size} bytes exceeds the {max} byte limit")]
    FileTooLarge { name: String, size: u64, max: u64 },

    // === Read Errors ===
    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Workbook bytes could not be decoded.
    #[error("failed to decode workbook: {source}")]
    Workbook {
        #[source]
        source: calamine::Error,
    },

    /// CSV bytes could not be decoded.
    #[error("failed to decode CSV: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    // === Format Errors ===
    /// Workbook has no sheet or the first sheet has no header row.
    #[error("spreadsheet is empty")]
    EmptySheet,

    /// Header row present but no non-empty data rows follow it.
    #[error("spreadsheet has a header row but no data rows")]
    NoDataRows,
}

impl IngestError {
    /// True when the input decoded but held nothing importable.
    pub fn is_format_error(&self) -> bool {
        matches!(self, IngestError::EmptySheet | IngestError::NoDataRows)
    }

    /// True when the pre-check rejected the file before decoding.
    pub fn is_rejected_upload(&self) -> bool {
        matches!(
            self,
            IngestError::UnsupportedExtension { .. } | IngestError::FileTooLarge { .. }
        )
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
