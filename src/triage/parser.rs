//! AI Response Validator: raw provider text → [`TriageAssessment`].
//!
//! Extraction is lenient (models wrap JSON in prose or code fences),
//! validation is strict (missing or out-of-range fields reject the whole
//! assessment — downstream logic never sees a partially valid one).

use serde::Deserialize;

use super::TriageError;
use crate::models::{TriageAssessment, UrgencyLevel};

/// Inclusive severity range on the provider contract.
const SEVERITY_MIN: f64 = 0.0;
const SEVERITY_MAX: f64 = 10.0;

/// Parse and validate the AI provider's raw output.
pub fn parse_assessment(raw: &str) -> Result<TriageAssessment, TriageError> {
    let json_str = extract_json(raw).ok_or_else(|| {
        TriageError::MalformedAssessment("no JSON object found in response".into())
    })?;

    #[derive(Deserialize)]
    struct RawAssessment {
        urgency: Option<String>,
        severity: Option<f64>,
        explanation: Option<String>,
        red_flags: Option<Vec<String>>,
    }

    let parsed: RawAssessment = serde_json::from_str(&json_str)
        .map_err(|e| TriageError::MalformedAssessment(format!("invalid JSON: {e}")))?;

    let urgency_str = parsed
        .urgency
        .ok_or_else(|| TriageError::MalformedAssessment("missing \"urgency\" field".into()))?;
    let urgency = UrgencyLevel::parse(&urgency_str).ok_or_else(|| {
        TriageError::MalformedAssessment(format!("unknown urgency level {urgency_str:?}"))
    })?;

    let severity = parsed
        .severity
        .ok_or_else(|| TriageError::MalformedAssessment("missing \"severity\" field".into()))?;
    if !severity.is_finite() || !(SEVERITY_MIN..=SEVERITY_MAX).contains(&severity) {
        return Err(TriageError::MalformedAssessment(format!(
            "severity {severity} outside {SEVERITY_MIN}-{SEVERITY_MAX}"
        )));
    }

    Ok(TriageAssessment {
        urgency,
        severity,
        explanation: parsed.explanation.unwrap_or_default().trim().to_string(),
        red_flags: parsed.red_flags.unwrap_or_default(),
    })
}

/// Locate the JSON object inside raw model output.
///
/// Strategies, in order: the whole trimmed text, a fenced ```json block,
/// then the substring between the first `{` and the last `}`.
fn extract_json(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed.to_string());
    }

    if let Some(fence_start) = trimmed.find("```json") {
        let body_start = fence_start + 7;
        if let Some(fence_len) = trimmed[body_start..].find("```") {
            return Some(trimmed[body_start..body_start + fence_len].trim().to_string());
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end > start {
        return Some(trimmed[start..=end].to_string());
    }
    None
}
