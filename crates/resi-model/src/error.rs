use thiserror::Error;

/// Errors raised by the resident data model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    /// Identifier does not name a target schema field.
    #[error("unknown target field: {0}")]
    UnknownField(String),

    /// Status marker is not one the registry accepts.
    #[error("unknown resident status: {0}")]
    UnknownStatus(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
