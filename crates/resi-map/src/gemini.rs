//! Gemini `generateContent` client used as the assist service.

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::assist::TextGenerator;
use crate::error::{AssistError, Result};

/// Public Generative Language API endpoint.
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

/// Blocking Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    /// Creates a client authenticated with `api_key`.
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, GEMINI_API_URL)
    }

    /// Creates a client against a custom endpoint (proxies, test servers).
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(AssistError::MissingCredential);
        }
        let mut key = HeaderValue::from_str(api_key).map_err(|_| AssistError::MissingCredential)?;
        key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", key);

        let client = reqwest::blocking::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
        })
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };
        let url = self.endpoint();
        tracing::debug!(model = %self.model, "calling assist service");

        let response = self.client.post(&url).json(&body).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AssistError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json()?;
        let text: String = parsed
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .filter_map(|part| part.text)
            .collect();
        if text.trim().is_empty() {
            return Err(AssistError::EmptyResponse);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_is_rejected_before_any_request() {
        assert!(matches!(
            GeminiClient::new("   "),
            Err(AssistError::MissingCredential)
        ));
    }

    #[test]
    fn endpoint_includes_model() {
        let client = GeminiClient::with_base_url("key", "http://localhost:9/")
            .unwrap()
            .with_model("gemini-2.0-flash");
        assert_eq!(
            client.endpoint(),
            "http://localhost:9/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }
}
