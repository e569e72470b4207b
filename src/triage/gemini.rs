//! Gemini HTTP collaborator behind the [`TriageModel`] trait.
//!
//! Strictly "send request, receive text": the raw response goes to the
//! parser for validation, nothing here interprets it.

use serde::{Deserialize, Serialize};

use super::prompt::build_triage_prompt;
use super::{TriageError, TriageModel};
use crate::models::SymptomInput;

/// Model used for triage assessments.
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Request timeout. One triage prompt is small; a minute is generous.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Gemini `generateContent` client.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_config(DEFAULT_BASE_URL, api_key, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS)
    }

    /// Fully configured client; used by tests to point at a local stub.
    pub fn with_config(base_url: &str, api_key: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

// ── Wire types ──────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl TriageModel for GeminiClient {
    fn assess(&self, input: &SymptomInput) -> Result<String, TriageError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_triage_prompt(input),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    TriageError::AiUnavailable(format!("cannot reach {}", self.base_url))
                } else if e.is_timeout() {
                    TriageError::AiUnavailable(format!(
                        "request timed out after {}s",
                        self.timeout_secs
                    ))
                } else {
                    TriageError::AiUnavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            // Auth failures land here too (401/403). Never echo the key.
            return Err(TriageError::AiUnavailable(format!(
                "provider returned status {status}"
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| TriageError::AiUnavailable(format!("unreadable response: {e}")))?;

        let text: String = parsed
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(TriageError::AiUnavailable(
                "provider returned no candidates".into(),
            ));
        }

        Ok(text)
    }
}
