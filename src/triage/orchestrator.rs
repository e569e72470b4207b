//! Triage Session Orchestrator: one user submission, end to end.
//!
//! assess → validate → reconcile → geocode → nearby search → rank →
//! persist. The clinical assessment outranks the facility list: a maps
//! failure degrades to an empty list, and a history write failure is
//! logged, never fatal.

use chrono::Utc;
use uuid::Uuid;

use serde::{Deserialize, Serialize};

use super::{parser, safety, TriageError, TriageModel};
use crate::facilities::ranking::rank;
use crate::facilities::{FacilityError, Geocoder, NearbySearch};
use crate::history::HistoryStore;
use crate::models::{
    FacilityCategory, HistoryEntry, RankedFacility, SymptomInput, TriageResult, UrgencyLevel,
};

/// Nearby-search radius in meters.
const DEFAULT_SEARCH_RADIUS_M: u32 = 5000;

/// Closest facilities surfaced per session.
const MAX_RECOMMENDATIONS: usize = 3;

/// Facility categories to try for a reconciled urgency, in order.
/// ER searches fall back to urgent care when no ER is found.
fn search_plan(urgency: UrgencyLevel) -> &'static [FacilityCategory] {
    match urgency {
        UrgencyLevel::Er => &[FacilityCategory::Er, FacilityCategory::UrgentCare],
        UrgencyLevel::Urgent => &[FacilityCategory::UrgentCare],
        UrgencyLevel::Moderate => &[FacilityCategory::Clinic],
        UrgencyLevel::Low => &[FacilityCategory::Pharmacy],
    }
}

/// What one completed session hands back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub result: TriageResult,
    pub facilities: Vec<RankedFacility>,
}

/// Drives one triage session over injected collaborators.
pub struct TriageSession {
    model: Box<dyn TriageModel + Send + Sync>,
    geocoder: Box<dyn Geocoder + Send + Sync>,
    search: Box<dyn NearbySearch + Send + Sync>,
    history: HistoryStore,
}

impl TriageSession {
    pub fn new(
        model: Box<dyn TriageModel + Send + Sync>,
        geocoder: Box<dyn Geocoder + Send + Sync>,
        search: Box<dyn NearbySearch + Send + Sync>,
        history: HistoryStore,
    ) -> Self {
        Self {
            model,
            geocoder,
            search,
            history,
        }
    }

    /// Run one session for `input`, recommending facilities near `address`.
    ///
    /// Fails only when no trustworthy assessment could be produced
    /// ([`TriageError`]); facility and persistence problems degrade.
    pub fn run(&self, input: SymptomInput, address: &str) -> Result<SessionOutcome, TriageError> {
        let raw = self.model.assess(&input)?;
        let assessment = parser::parse_assessment(&raw)?;
        let result = safety::reconcile(&input, &assessment);

        tracing::info!(
            urgency = result.urgency.as_str(),
            overridden = result.overridden,
            "triage session reconciled"
        );

        let facilities = match self.find_facilities(result.urgency, address) {
            Ok(facilities) => facilities,
            Err(e) => {
                tracing::warn!(error = %e, "facility lookup failed; returning assessment without facilities");
                Vec::new()
            }
        };

        let entry = HistoryEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            input,
            result: result.clone(),
            facilities: facilities.clone(),
        };
        if let Err(e) = self.history.append(entry) {
            tracing::warn!(error = %e, "failed to persist triage session");
        }

        Ok(SessionOutcome { result, facilities })
    }

    /// Geocode the address and run the category plan until a search
    /// yields candidates.
    fn find_facilities(
        &self,
        urgency: UrgencyLevel,
        address: &str,
    ) -> Result<Vec<RankedFacility>, FacilityError> {
        let origin = self.geocoder.geocode(address)?;

        for &category in search_plan(urgency) {
            let candidates =
                self.search
                    .nearby_search(origin.coordinate, category, DEFAULT_SEARCH_RADIUS_M)?;
            let mut ranked = rank(origin.coordinate, candidates);
            if !ranked.is_empty() {
                ranked.truncate(MAX_RECOMMENDATIONS);
                return Ok(ranked);
            }
            tracing::debug!(?category, "no facilities found, trying next category");
        }

        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facilities::GeocodedAddress;
    use crate::geo::Coordinate;
    use crate::models::{FacilityCandidate, Vitals};
    use std::collections::HashMap;
    use std::sync::Mutex;

    // ── Deterministic fakes ────────────────────────────────────

    struct FakeModel {
        raw: String,
    }

    impl TriageModel for FakeModel {
        fn assess(&self, _input: &SymptomInput) -> Result<String, TriageError> {
            Ok(self.raw.clone())
        }
    }

    struct DownModel;

    impl TriageModel for DownModel {
        fn assess(&self, _input: &SymptomInput) -> Result<String, TriageError> {
            Err(TriageError::AiUnavailable("connection refused".into()))
        }
    }

    struct FakeGeocoder {
        coordinate: Coordinate,
    }

    impl Geocoder for FakeGeocoder {
        fn geocode(&self, address: &str) -> Result<GeocodedAddress, FacilityError> {
            Ok(GeocodedAddress {
                coordinate: self.coordinate,
                formatted_address: address.to_string(),
            })
        }
    }

    struct FailingGeocoder;

    impl Geocoder for FailingGeocoder {
        fn geocode(&self, _address: &str) -> Result<GeocodedAddress, FacilityError> {
            Err(FacilityError::Geocoding("address not found".into()))
        }
    }

    struct FakeSearch {
        by_category: HashMap<FacilityCategory, Vec<FacilityCandidate>>,
        searched: Mutex<Vec<FacilityCategory>>,
    }

    impl FakeSearch {
        fn new(by_category: HashMap<FacilityCategory, Vec<FacilityCandidate>>) -> Self {
            Self {
                by_category,
                searched: Mutex::new(Vec::new()),
            }
        }
    }

    impl NearbySearch for FakeSearch {
        fn nearby_search(
            &self,
            _origin: Coordinate,
            category: FacilityCategory,
            _radius_m: u32,
        ) -> Result<Vec<FacilityCandidate>, FacilityError> {
            self.searched.lock().unwrap().push(category);
            Ok(self.by_category.get(&category).cloned().unwrap_or_default())
        }
    }

    fn candidate(name: &str, lat: f64, lon: f64, category: FacilityCategory) -> FacilityCandidate {
        FacilityCandidate {
            name: name.into(),
            coordinate: Coordinate::new(lat, lon),
            category,
            address: "addr".into(),
            rating: None,
        }
    }

    fn ai_json(urgency: &str, severity: f64) -> String {
        format!(
            r#"{{"urgency": "{urgency}", "severity": {severity}, "explanation": "model says", "red_flags": []}}"#
        )
    }

    fn session_with(
        model: Box<dyn TriageModel + Send + Sync>,
        geocoder: Box<dyn Geocoder + Send + Sync>,
        search: Box<dyn NearbySearch + Send + Sync>,
    ) -> (tempfile::TempDir, TriageSession) {
        let dir = tempfile::tempdir().unwrap();
        let history = HistoryStore::new(dir.path().join("history.json"));
        (dir, TriageSession::new(model, geocoder, search, history))
    }

    fn origin() -> Coordinate {
        Coordinate::new(40.0, -75.0)
    }

    // ── End-to-end scenarios ───────────────────────────────────

    #[test]
    fn chest_pain_overrides_ai_low_to_er() {
        let mut facilities = HashMap::new();
        facilities.insert(
            FacilityCategory::Er,
            vec![candidate("General Hospital", 40.01, -75.0, FacilityCategory::Er)],
        );
        let (_dir, session) = session_with(
            Box::new(FakeModel {
                raw: ai_json("LOW", 2.0),
            }),
            Box::new(FakeGeocoder { coordinate: origin() }),
            Box::new(FakeSearch::new(facilities)),
        );

        let input = SymptomInput::with_vitals(
            "chest pain, shortness of breath",
            Vitals {
                temperature_c: Some(37.0),
                ..Vitals::default()
            },
        );
        let outcome = session.run(input, "123 Main St").unwrap();

        assert_eq!(outcome.result.urgency, UrgencyLevel::Er);
        assert!(outcome.result.overridden);
        assert_eq!(outcome.facilities.len(), 1);
        assert_eq!(outcome.facilities[0].facility.name, "General Hospital");
    }

    #[test]
    fn mild_headache_passes_through_and_searches_pharmacies() {
        let mut facilities = HashMap::new();
        facilities.insert(
            FacilityCategory::Pharmacy,
            vec![candidate("Corner Pharmacy", 40.005, -75.0, FacilityCategory::Pharmacy)],
        );
        let search = FakeSearch::new(facilities);
        let (_dir, session) = session_with(
            Box::new(FakeModel {
                raw: ai_json("LOW", 1.0),
            }),
            Box::new(FakeGeocoder { coordinate: origin() }),
            Box::new(search),
        );

        let outcome = session.run(SymptomInput::new("mild headache"), "home").unwrap();
        assert_eq!(outcome.result.urgency, UrgencyLevel::Low);
        assert!(!outcome.result.overridden);
        assert_eq!(outcome.facilities[0].facility.name, "Corner Pharmacy");
    }

    #[test]
    fn er_search_falls_back_to_urgent_care() {
        let mut facilities = HashMap::new();
        facilities.insert(FacilityCategory::Er, vec![]);
        facilities.insert(
            FacilityCategory::UrgentCare,
            vec![candidate("QuickCare", 40.02, -75.0, FacilityCategory::UrgentCare)],
        );
        let (_dir, session) = session_with(
            Box::new(FakeModel {
                raw: ai_json("ER", 9.0),
            }),
            Box::new(FakeGeocoder { coordinate: origin() }),
            Box::new(FakeSearch::new(facilities)),
        );

        let outcome = session.run(SymptomInput::new("deep cut on arm"), "home").unwrap();
        assert_eq!(outcome.facilities.len(), 1);
        assert_eq!(outcome.facilities[0].facility.name, "QuickCare");
    }

    #[test]
    fn ai_transport_failure_surfaces_and_persists_nothing() {
        let (dir, session) = session_with(
            Box::new(DownModel),
            Box::new(FakeGeocoder { coordinate: origin() }),
            Box::new(FakeSearch::new(HashMap::new())),
        );

        let err = session.run(SymptomInput::new("dizzy"), "home").unwrap_err();
        assert!(matches!(err, TriageError::AiUnavailable(_)));
        assert!(!dir.path().join("history.json").exists());
    }

    #[test]
    fn malformed_ai_output_surfaces_and_persists_nothing() {
        let (dir, session) = session_with(
            Box::new(FakeModel {
                raw: "sorry, I cannot help with that".into(),
            }),
            Box::new(FakeGeocoder { coordinate: origin() }),
            Box::new(FakeSearch::new(HashMap::new())),
        );

        let err = session.run(SymptomInput::new("dizzy"), "home").unwrap_err();
        assert!(matches!(err, TriageError::MalformedAssessment(_)));
        assert!(!dir.path().join("history.json").exists());
    }

    struct FailingSearch;

    impl NearbySearch for FailingSearch {
        fn nearby_search(
            &self,
            _origin: Coordinate,
            _category: FacilityCategory,
            _radius_m: u32,
        ) -> Result<Vec<FacilityCandidate>, FacilityError> {
            Err(FacilityError::Search("maps provider request timed out".into()))
        }
    }

    #[test]
    fn geocoding_failure_degrades_to_empty_facility_list() {
        let (dir, session) = session_with(
            Box::new(FakeModel {
                raw: ai_json("MODERATE", 4.0),
            }),
            Box::new(FailingGeocoder),
            Box::new(FakeSearch::new(HashMap::new())),
        );

        let outcome = session.run(SymptomInput::new("sore throat"), "home").unwrap();
        assert_eq!(outcome.result.urgency, UrgencyLevel::Moderate);
        assert!(outcome.facilities.is_empty());
        // The assessment is still worth keeping.
        assert!(dir.path().join("history.json").exists());
    }

    #[test]
    fn search_failure_degrades_to_empty_facility_list() {
        let (dir, session) = session_with(
            Box::new(FakeModel {
                raw: ai_json("URGENT", 6.0),
            }),
            Box::new(FakeGeocoder { coordinate: origin() }),
            Box::new(FailingSearch),
        );

        let outcome = session.run(SymptomInput::new("sprained ankle"), "home").unwrap();
        assert_eq!(outcome.result.urgency, UrgencyLevel::Urgent);
        assert!(outcome.facilities.is_empty());
        assert!(dir.path().join("history.json").exists());
    }

    #[test]
    fn history_write_failure_never_blocks_the_result() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the store expects a parent directory, so
        // every append fails inside the history store.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let history = HistoryStore::new(blocker.join("history.json"));

        let mut facilities = HashMap::new();
        facilities.insert(
            FacilityCategory::Pharmacy,
            vec![candidate("Corner Pharmacy", 40.005, -75.0, FacilityCategory::Pharmacy)],
        );
        let session = TriageSession::new(
            Box::new(FakeModel {
                raw: ai_json("LOW", 1.0),
            }),
            Box::new(FakeGeocoder { coordinate: origin() }),
            Box::new(FakeSearch::new(facilities)),
            history,
        );

        let outcome = session.run(SymptomInput::new("mild headache"), "home").unwrap();
        assert_eq!(outcome.result.urgency, UrgencyLevel::Low);
        assert_eq!(outcome.facilities.len(), 1);
    }

    #[test]
    fn recommendations_are_ranked_and_truncated() {
        let mut facilities = HashMap::new();
        facilities.insert(
            FacilityCategory::Clinic,
            vec![
                candidate("D", 40.4, -75.0, FacilityCategory::Clinic),
                candidate("C", 40.3, -75.0, FacilityCategory::Clinic),
                candidate("B", 40.2, -75.0, FacilityCategory::Clinic),
                candidate("A", 40.1, -75.0, FacilityCategory::Clinic),
            ],
        );
        let (_dir, session) = session_with(
            Box::new(FakeModel {
                raw: ai_json("MODERATE", 4.0),
            }),
            Box::new(FakeGeocoder { coordinate: origin() }),
            Box::new(FakeSearch::new(facilities)),
        );

        let outcome = session.run(SymptomInput::new("sore throat"), "home").unwrap();
        let names: Vec<_> = outcome
            .facilities
            .iter()
            .map(|f| f.facility.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn completed_session_lands_in_history() {
        let (dir, session) = session_with(
            Box::new(FakeModel {
                raw: ai_json("LOW", 1.0),
            }),
            Box::new(FakeGeocoder { coordinate: origin() }),
            Box::new(FakeSearch::new(HashMap::new())),
        );

        session.run(SymptomInput::new("mild headache"), "home").unwrap();

        let store = HistoryStore::new(dir.path().join("history.json"));
        let entries = store.all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].input.text, "mild headache");
        assert_eq!(entries[0].result.urgency, UrgencyLevel::Low);
    }

    #[test]
    fn search_plan_per_urgency() {
        assert_eq!(
            search_plan(UrgencyLevel::Er),
            &[FacilityCategory::Er, FacilityCategory::UrgentCare]
        );
        assert_eq!(search_plan(UrgencyLevel::Urgent), &[FacilityCategory::UrgentCare]);
        assert_eq!(search_plan(UrgencyLevel::Moderate), &[FacilityCategory::Clinic]);
        assert_eq!(search_plan(UrgencyLevel::Low), &[FacilityCategory::Pharmacy]);
    }
}
