//! Shared value types for the triage core.
//!
//! Everything here is an immutable value object once constructed: the
//! orchestrator owns a [`TriageResult`] for the duration of a session and
//! hands it to the history store unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Coordinate;

// ── Input ───────────────────────────────────────────────────

/// Optional vital signs supplied alongside the symptom description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    /// Body temperature in °C.
    pub temperature_c: Option<f64>,
    /// Self-reported pain, 0–10.
    pub pain_score: Option<u8>,
    pub pregnant: Option<bool>,
    pub recent_trauma: Option<bool>,
}

/// One user submission: free-text symptoms plus optional vitals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomInput {
    pub text: String,
    #[serde(default)]
    pub vitals: Vitals,
}

impl SymptomInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            vitals: Vitals::default(),
        }
    }

    pub fn with_vitals(text: impl Into<String>, vitals: Vitals) -> Self {
        Self {
            text: text.into(),
            vitals,
        }
    }
}

// ── Urgency ─────────────────────────────────────────────────

/// Medical priority level. The derived `Ord` follows declaration order,
/// so `Low < Moderate < Urgent < Er`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum UrgencyLevel {
    Low,
    Moderate,
    Urgent,
    Er,
}

impl UrgencyLevel {
    /// Parse a provider-supplied urgency string, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "MODERATE" => Some(Self::Moderate),
            "URGENT" => Some(Self::Urgent),
            "ER" => Some(Self::Er),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Moderate => "MODERATE",
            Self::Urgent => "URGENT",
            Self::Er => "ER",
        }
    }

    /// The next level up, capped at ER.
    pub fn escalate(self) -> Self {
        match self {
            Self::Low => Self::Moderate,
            Self::Moderate => Self::Urgent,
            Self::Urgent | Self::Er => Self::Er,
        }
    }

    /// Minimum severity score consistent with this level, on the 0–10 scale.
    /// Applied when a safety rule escalates a session.
    pub fn severity_floor(self) -> f64 {
        match self {
            Self::Low => 0.0,
            Self::Moderate => 3.0,
            Self::Urgent => 5.0,
            Self::Er => 8.0,
        }
    }
}

// ── AI assessment (untrusted) and reconciled result ─────────

/// Structurally validated output of the AI provider.
///
/// "Validated" means well-formed, not trusted: the safety rule layer still
/// cross-checks it against the raw symptom input before anything acts on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageAssessment {
    pub urgency: UrgencyLevel,
    /// Severity score, 0.0–10.0 inclusive.
    pub severity: f64,
    pub explanation: String,
    pub red_flags: Vec<String>,
}

/// Final triage verdict after the safety rule layer ran.
///
/// `urgency` is never less urgent than what any fired rule mandated; when a
/// rule changed the AI's verdict, `overridden` is set and `override_reason`
/// concatenates the fired-rule descriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageResult {
    pub urgency: UrgencyLevel,
    pub severity: f64,
    pub explanation: String,
    pub red_flags: Vec<String>,
    pub overridden: bool,
    pub override_reason: Option<String>,
}

// ── Facilities ──────────────────────────────────────────────

/// Kind of medical facility to search for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FacilityCategory {
    Er,
    UrgentCare,
    Clinic,
    Pharmacy,
}

/// A raw place record from the maps provider. Untrusted: the coordinate may
/// be out of range and is filtered during ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityCandidate {
    pub name: String,
    pub coordinate: Coordinate,
    pub category: FacilityCategory,
    pub address: String,
    pub rating: Option<f64>,
}

/// A facility candidate annotated with distance from the origin and a
/// navigation deep link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFacility {
    pub facility: FacilityCandidate,
    /// Kilometers from the origin, rounded to 2 decimals. Non-negative.
    pub distance_km: f64,
    pub maps_url: String,
}

// ── History ─────────────────────────────────────────────────

/// One completed session as persisted to the local history file.
/// Never mutated after write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub input: SymptomInput,
    pub result: TriageResult,
    pub facilities: Vec<RankedFacility>,
}
