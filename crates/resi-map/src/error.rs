//! Errors from the external-assist mapping path.
//!
//! None of these reach the caller of [`crate::FieldMapper::map`]; they are
//! logged and replaced by the rule-based result.

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AssistError {
    /// No API key configured.
    #[error("assist service credential is missing")]
    MissingCredential,

    /// HTTP client could not be built or the request failed in transit.
    #[error("assist request failed: {source}")]
    Http {
        #[source]
        source: reqwest::Error,
    },

    /// Service answered with a non-success status.
    #[error("assist service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Service answered without any text.
    #[error("assist service returned an empty response")]
    EmptyResponse,

    /// No `{...}` object found in the response text.
    #[error("no JSON object found in assist response")]
    NoJsonObject,

    /// The extracted object is not valid JSON.
    #[error("assist response is not valid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    /// A key does not name a spreadsheet header.
    #[error("assist response names unknown header '{0}'")]
    UnknownHeader(String),

    /// A value is neither null nor a known field identifier.
    #[error("assist response maps '{header}' to unknown field {value}")]
    UnknownField { header: String, value: String },
}

impl From<reqwest::Error> for AssistError {
    fn from(source: reqwest::Error) -> Self {
        AssistError::Http { source }
    }
}

pub type Result<T> = std::result::Result<T, AssistError>;
