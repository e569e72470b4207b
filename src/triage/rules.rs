//! The clinical safety rule registry.
//!
//! An ordered list of trigger → effect mappings, kept as data so the set is
//! auditable in one place. Only the documented rules live here; the layer is
//! not a general rule engine.

use crate::models::{UrgencyLevel, Vitals};

/// A hard-coded safety rule.
pub struct SafetyRule {
    /// Unique identifier for the audit trail.
    pub id: &'static str,
    /// Human-readable description, surfaced as a red flag and in the
    /// override reason.
    pub description: &'static str,
    pub trigger: RuleTrigger,
    pub effect: RuleEffect,
}

/// Condition under which a rule fires. Evaluated against the lowercased
/// raw symptom text and the submitted vitals only.
pub enum RuleTrigger {
    /// Every keyword group must match at least one of its phrases.
    AllKeywordGroups(&'static [&'static [&'static str]]),
    /// Any phrase matches.
    AnyKeyword(&'static [&'static str]),
    /// Measured temperature at or above the threshold (°C).
    TemperatureAtLeast(f64),
}

/// What a fired rule does to the recommendation.
pub enum RuleEffect {
    /// Final urgency is at least this level.
    Floor(UrgencyLevel),
    /// Floor at `base`, or at `boosted` when the AI assessment itself
    /// reported red flags.
    FloorWithRedFlagBoost {
        base: UrgencyLevel,
        boosted: UrgencyLevel,
    },
    /// Raise the current recommendation by one level, capped at ER.
    /// Applied after all floors.
    EscalateByOne,
}

// ── Keyword sets ────────────────────────────────────────────

const CHEST_PAIN_KEYWORDS: &[&str] = &["chest pain"];

const BREATHING_DIFFICULTY_KEYWORDS: &[&str] =
    &["shortness of breath", "difficulty breathing"];

const RESPIRATORY_DISTRESS_KEYWORDS: &[&str] = &[
    "cant breathe",
    "can't breathe",
    "difficulty breathing",
    "trouble breathing",
];

const CHEST_AND_BREATHING: &[&[&str]] =
    &[CHEST_PAIN_KEYWORDS, BREATHING_DIFFICULTY_KEYWORDS];

// ── Rule registry ───────────────────────────────────────────

static RULES: &[SafetyRule] = &[
    // TRI-001: chest pain + breathing difficulty → ER, no exceptions.
    SafetyRule {
        id: "TRI-001",
        description: "Chest pain + shortness of breath / difficulty breathing",
        trigger: RuleTrigger::AllKeywordGroups(CHEST_AND_BREATHING),
        effect: RuleEffect::Floor(UrgencyLevel::Er),
    },
    // TRI-002: respiratory distress → at least URGENT; ER when the
    // assessment carries additional red flags.
    SafetyRule {
        id: "TRI-002",
        description: "Respiratory distress",
        trigger: RuleTrigger::AnyKeyword(RESPIRATORY_DISTRESS_KEYWORDS),
        effect: RuleEffect::FloorWithRedFlagBoost {
            base: UrgencyLevel::Urgent,
            boosted: UrgencyLevel::Er,
        },
    },
    // TRI-003: very high measured fever → one level more cautious.
    SafetyRule {
        id: "TRI-003",
        description: "High fever (>=40C)",
        trigger: RuleTrigger::TemperatureAtLeast(40.0),
        effect: RuleEffect::EscalateByOne,
    },
];

/// The ordered rule set.
pub fn rules() -> &'static [SafetyRule] {
    RULES
}

// ── Trigger matching ────────────────────────────────────────

impl RuleTrigger {
    pub fn matches(&self, text_lower: &str, vitals: &Vitals) -> bool {
        match self {
            Self::AllKeywordGroups(groups) => groups
                .iter()
                .all(|group| group.iter().any(|kw| text_lower.contains(kw))),
            Self::AnyKeyword(keywords) => {
                keywords.iter().any(|kw| text_lower.contains(kw))
            }
            Self::TemperatureAtLeast(threshold) => {
                matches!(vitals.temperature_c, Some(t) if t >= *threshold)
            }
        }
    }
}
