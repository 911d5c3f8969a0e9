// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;

/// Which storage engine backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-process store; state is lost on restart.
    Memory,
    /// Google Cloud Firestore (or the emulator via FIRESTORE_EMULATOR_HOST).
    Firestore,
}

impl std::str::FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "firestore" => Ok(StorageBackend::Firestore),
            _ => Err(()),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Storage engine
    pub storage_backend: StorageBackend,
    /// GCP project ID (Firestore backend only)
    pub gcp_project_id: String,
    /// Session lifetime in hours. `None` means tokens never expire.
    pub session_ttl_hours: Option<u64>,

    // --- Score policy ---
    /// Accept negative scores on submission
    pub allow_negative_scores: bool,
    /// Restrict modes to this list. `None` accepts any mode tag.
    pub allowed_modes: Option<Vec<String>>,

    /// Seed sample users, scores and players at startup
    pub seed_demo_data: bool,
}

impl Config {
    /// Deterministic in-memory configuration for tests.
    pub fn test_default() -> Self {
        Self {
            port: 4000,
            storage_backend: StorageBackend::Memory,
            gcp_project_id: "test-project".to_string(),
            session_ttl_hours: None,
            allow_negative_scores: true,
            allowed_modes: None,
            seed_demo_data: false,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored for local development.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("STORAGE_BACKEND", raw))?,
            Err(_) => StorageBackend::Memory,
        };

        let gcp_project_id = match (storage_backend, env::var("GCP_PROJECT_ID")) {
            (_, Ok(project)) => project,
            (StorageBackend::Firestore, Err(_)) => {
                return Err(ConfigError::Missing("GCP_PROJECT_ID"))
            }
            (StorageBackend::Memory, Err(_)) => "local-dev".to_string(),
        };

        let session_ttl_hours = match env::var("SESSION_TTL_HOURS") {
            Ok(raw) => {
                let hours: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("SESSION_TTL_HOURS", raw))?;
                (hours > 0).then_some(hours)
            }
            Err(_) => None,
        };

        let allowed_modes = env::var("ALLOWED_MODES").ok().and_then(|raw| {
            let modes: Vec<String> = raw
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
            (!modes.is_empty()).then_some(modes)
        });

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .unwrap_or(4000),
            storage_backend,
            gcp_project_id,
            session_ttl_hours,
            allow_negative_scores: bool_var("ALLOW_NEGATIVE_SCORES", true)?,
            allowed_modes,
            seed_demo_data: bool_var("SEED_DEMO_DATA", false)?,
        })
    }
}

fn bool_var(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(name, raw)),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment is process-global; keep every env mutation in this one test.
    #[test]
    fn test_config_from_env() {
        env::remove_var("STORAGE_BACKEND");
        env::remove_var("GCP_PROJECT_ID");
        env::set_var("SESSION_TTL_HOURS", "24");
        env::set_var("ALLOWED_MODES", "walls, passthrough,,");
        env::set_var("ALLOW_NEGATIVE_SCORES", "false");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.session_ttl_hours, Some(24));
        assert_eq!(
            config.allowed_modes,
            Some(vec!["walls".to_string(), "passthrough".to_string()])
        );
        assert!(!config.allow_negative_scores);

        env::set_var("SESSION_TTL_HOURS", "0");
        env::set_var("ALLOW_NEGATIVE_SCORES", "maybe");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("ALLOW_NEGATIVE_SCORES", _)));

        env::remove_var("ALLOW_NEGATIVE_SCORES");
        let config = Config::from_env().expect("Config should load");
        assert_eq!(config.session_ttl_hours, None);
        assert!(config.allow_negative_scores);

        env::set_var("STORAGE_BACKEND", "firestore");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("GCP_PROJECT_ID")));

        env::remove_var("STORAGE_BACKEND");
        env::remove_var("SESSION_TTL_HOURS");
        env::remove_var("ALLOWED_MODES");
    }

    #[test]
    fn test_storage_backend_parse() {
        assert_eq!("Memory".parse(), Ok(StorageBackend::Memory));
        assert_eq!(" firestore ".parse(), Ok(StorageBackend::Firestore));
        assert!("postgres".parse::<StorageBackend>().is_err());
    }
}
