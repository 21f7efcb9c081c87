//! Error types for the batch importer.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error reported by the persistence collaborator for one insert call.
///
/// Mirrors the `{message, code, details, hint}` shape PostgREST returns.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct PersistenceError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

impl PersistenceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
            hint: None,
        }
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// The request never produced a response.
    pub fn transport(source: &reqwest::Error) -> Self {
        Self::new(source.to_string()).with_code("transport")
    }

    /// Extra context for operators: `details`, else `hint`.
    pub fn detail_text(&self) -> Option<&str> {
        self.details.as_deref().or(self.hint.as_deref())
    }
}

/// Errors that stop an import run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ImportError {
    /// File I/O error on a progress snapshot or error log.
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A progress snapshot or error log could not be encoded or decoded.
    #[error("failed to {operation} JSON in {path}")]
    Json {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The REST client could not be constructed.
    #[error("failed to create HTTP client")]
    HttpClient {
        #[source]
        source: reqwest::Error,
    },

    /// A credential contains characters not allowed in an HTTP header.
    #[error("{name} is not a valid header value")]
    InvalidHeader { name: &'static str },

    /// The snapshot after a batch could not be saved; the previous one is kept.
    #[error("could not save progress after batch {batch}")]
    ProgressWrite {
        batch: usize,
        #[source]
        source: Box<ImportError>,
    },
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;
