//! Safety Rule Layer: reconcile an untrusted AI assessment with a
//! deterministic clinical rule set.
//!
//! Rules fire on the RAW symptom input and vitals, never on the AI's own
//! summary — a wrong summary must not be able to subvert them. Rules can
//! only raise urgency (monotonic escalation); the final verdict is never
//! less cautious than the AI's.

use super::rules::{rules, RuleEffect, SafetyRule};
use crate::models::{SymptomInput, TriageAssessment, TriageResult, UrgencyLevel};

/// Apply the safety rule set on top of a validated assessment.
///
/// Pure, total, deterministic: a rule that does not apply simply does not
/// fire, and the function never fails.
pub fn reconcile(input: &SymptomInput, assessment: &TriageAssessment) -> TriageResult {
    let text_lower = input.text.to_lowercase();

    let mut fired: Vec<&'static SafetyRule> = Vec::new();
    let mut urgency = assessment.urgency;
    let mut escalate_once = false;

    for rule in rules() {
        if !rule.trigger.matches(&text_lower, &input.vitals) {
            continue;
        }
        fired.push(rule);

        match rule.effect {
            RuleEffect::Floor(level) => urgency = urgency.max(level),
            RuleEffect::FloorWithRedFlagBoost { base, boosted } => {
                // "Additional red flags" = the assessment already carries
                // red flags of its own.
                let floor = if assessment.red_flags.is_empty() {
                    base
                } else {
                    boosted
                };
                urgency = urgency.max(floor);
            }
            RuleEffect::EscalateByOne => escalate_once = true,
        }
    }

    // Relative bumps apply after all floors, capped at ER.
    if escalate_once {
        urgency = urgency.escalate();
    }

    let overridden = urgency != assessment.urgency;

    for rule in &fired {
        tracing::warn!(
            rule_id = rule.id,
            description = rule.description,
            ai_urgency = assessment.urgency.as_str(),
            final_urgency = urgency.as_str(),
            "safety rule fired"
        );
    }

    let mut red_flags = assessment.red_flags.clone();
    for rule in &fired {
        if !red_flags.iter().any(|f| f == rule.description) {
            red_flags.push(rule.description.to_string());
        }
    }

    // A fired rule also floors the severity score at the final level.
    let severity = if fired.is_empty() {
        assessment.severity
    } else {
        assessment.severity.max(urgency.severity_floor())
    };

    let override_reason = overridden.then(|| {
        fired
            .iter()
            .map(|r| r.description)
            .collect::<Vec<_>>()
            .join("; ")
    });

    TriageResult {
        urgency,
        severity,
        explanation: assessment.explanation.clone(),
        red_flags,
        overridden,
        override_reason,
    }
}
