// ============================
// crates/authd-lib/src/config.rs
// ============================
//! Configuration management.
use std::path::{Path, PathBuf};
use serde::Deserialize;
use figment::{Figment, providers::{Env, Format, Json, Toml, Yaml}};
use anyhow::Result;

use crate::auth::password::PasswordRequirements;
use crate::store::DEFAULT_SESSION_TTL;

/// Application settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Data directory path
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Session TTL in seconds
    pub session_ttl_secs: u64,
    /// Password requirements
    pub password_requirements: PasswordRequirements,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL.as_secs(),
            password_requirements: PasswordRequirements::default(),
        }
    }
}

impl Settings {
    /// Load settings from config files and `AUTHD_`-prefixed environment
    /// variables; later sources override earlier ones
    pub fn load() -> Result<Self> {
        let settings = Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Yaml::file("config.yaml"))
            .merge(Json::file("config.json"))
            .merge(Env::prefixed("AUTHD_"))
            .extract()?;

        Ok(settings)
    }

    /// Load settings from an explicit file path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("AUTHD_"))
            .extract()?;

        Ok(settings)
    }
}
