//! Triage pipeline: AI assessment, validation, and the safety rule layer.
//!
//! The AI provider is an untrusted, occasionally malformed oracle. Its raw
//! text goes through [`parser`] before any business logic sees it, and the
//! validated assessment is then reconciled by [`safety`] — which may only
//! raise urgency, never lower it.

pub mod gemini;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod rules;
pub mod safety;

use thiserror::Error;

use crate::models::SymptomInput;

#[derive(Error, Debug)]
pub enum TriageError {
    /// The AI provider's output failed structural validation. The session
    /// surfaces "assessment unavailable" rather than fabricating a result.
    #[error("malformed triage assessment: {0}")]
    MalformedAssessment(String),

    /// Transport or auth failure calling the AI provider. No retry in the
    /// core; retry policy belongs to the caller.
    #[error("AI provider unavailable: {0}")]
    AiUnavailable(String),
}

/// Capability seam for the AI provider: send one symptom submission,
/// receive raw text. Substitutable with a deterministic fake in tests.
pub trait TriageModel {
    fn assess(&self, input: &SymptomInput) -> Result<String, TriageError>;
}
