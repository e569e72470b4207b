//! CareRoute triage core.
//!
//! Takes a user's symptom report, asks an AI provider for an urgency
//! assessment, cross-checks that untrusted judgment against a deterministic
//! clinical rule layer (escalation only, never de-escalation), recommends
//! nearby facilities ranked by great-circle distance, and appends each
//! completed session to a local JSON history file. The GUI on top of this
//! crate is presentation only.

pub mod config;
pub mod facilities;
pub mod geo;
pub mod history;
pub mod models;
pub mod triage;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the host application.
///
/// Respects `RUST_LOG`; falls back to the crate default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("CareRoute core starting v{}", config::APP_VERSION);
}

/// Wire up the production collaborators from environment credentials.
///
/// Returns a ready-to-run [`triage::orchestrator::TriageSession`] backed by
/// Gemini, Google Maps, and the default history file location.
pub fn default_session() -> Result<triage::orchestrator::TriageSession, config::ConfigError> {
    let credentials = config::Credentials::from_env()?;
    let maps = facilities::google::GoogleMapsClient::new(&credentials.maps_api_key);

    Ok(triage::orchestrator::TriageSession::new(
        Box::new(triage::gemini::GeminiClient::new(&credentials.gemini_api_key)),
        Box::new(maps.clone()),
        Box::new(maps),
        history::HistoryStore::new(config::history_file_path()),
    ))
}
