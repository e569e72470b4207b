use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "CareRoute";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding the AI provider key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Environment variable holding the maps provider key.
pub const MAPS_API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is not set. Please export it as an environment variable.")]
    MissingKey(&'static str),
}

/// Get the application data directory
/// ~/CareRoute/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("CareRoute")
}

/// Get the triage history file path
pub fn history_file_path() -> PathBuf {
    app_data_dir().join("history.json")
}

pub fn default_log_filter() -> &'static str {
    "info"
}

/// The two provider credentials the core needs.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub gemini_api_key: String,
    pub maps_api_key: String,
}

impl Credentials {
    /// Load both credentials from the environment. Fails early with the
    /// missing variable's name so the caller can surface a setup hint.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            gemini_api_key: require_var(GEMINI_API_KEY_VAR)?,
            maps_api_key: require_var(MAPS_API_KEY_VAR)?,
        })
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingKey(name)),
    }
}
