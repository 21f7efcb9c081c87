//! PostgREST-backed persistence.

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use resi_model::ResidentRecord;

use crate::error::{ImportError, PersistenceError, Result};
use crate::persistence::Persistence;

const USER_AGENT_VALUE: &str = concat!("resi-import/", env!("CARGO_PKG_VERSION"));

/// Inserts rows through `<base>/rest/v1/<table>`.
#[derive(Debug, Clone)]
pub struct RestPersistence {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl RestPersistence {
    /// Creates a client authenticated with the project's anon key.
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let mut apikey = HeaderValue::from_str(api_key.trim())
            .map_err(|_| ImportError::InvalidHeader { name: "access key" })?;
        apikey.set_sensitive(true);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
            .map_err(|_| ImportError::InvalidHeader { name: "access key" })?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", apikey);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("Prefer", HeaderValue::from_static("return=minimal"));

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|source| ImportError::HttpClient { source })?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

impl Persistence for RestPersistence {
    fn insert_many(&self, table: &str, records: &[ResidentRecord]) -> std::result::Result<(), PersistenceError> {
        let url = self.table_url(table);
        tracing::debug!(table, records = records.len(), "posting records");

        let response = self
            .client
            .post(&url)
            .json(records)
            .send()
            .map_err(|error| PersistenceError::transport(&error))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        Err(decode_error(status, &body))
    }
}

/// Decode a PostgREST error body, falling back to the raw status and text.
fn decode_error(status: StatusCode, body: &str) -> PersistenceError {
    match serde_json::from_str::<PersistenceError>(body) {
        Ok(error) => error,
        Err(_) => {
            let message = if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {}", body.trim())
            };
            PersistenceError::new(message).with_code(status.as_u16().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_joins_base_and_table() {
        let rest = RestPersistence::new("https://demo.supabase.co/", "anon").unwrap();
        assert_eq!(
            rest.table_url("residents"),
            "https://demo.supabase.co/rest/v1/residents"
        );
    }

    #[test]
    fn decodes_postgrest_error_bodies() {
        let body = r#"{"code":"23505","details":"Key (identity_card)=(0123) already exists.","hint":null,"message":"duplicate key value violates unique constraint"}"#;
        let error = decode_error(StatusCode::CONFLICT, body);
        assert_eq!(error.code.as_deref(), Some("23505"));
        assert_eq!(error.message, "duplicate key value violates unique constraint");
        assert_eq!(error.detail_text(), Some("Key (identity_card)=(0123) already exists."));
    }

    #[test]
    fn falls_back_to_status_for_opaque_bodies() {
        let error = decode_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(error.code.as_deref(), Some("502"));
        assert!(error.message.starts_with("HTTP 502"));
    }

    #[test]
    fn rejects_keys_that_are_not_header_safe() {
        let error = RestPersistence::new("https://demo.supabase.co", "bad\nkey").unwrap_err();
        assert!(matches!(error, ImportError::InvalidHeader { .. }));
    }
}
