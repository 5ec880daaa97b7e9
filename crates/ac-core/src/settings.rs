//! Engine settings loaded from TOML.
//!
//! Defaults are embedded via `include_str!("default_settings.toml")`. A
//! `Settings` value is owned by each model instance; there is no global.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::key::KeyEvent;

pub const DEFAULT_SETTINGS_TOML: &str = include_str!("default_settings.toml");

/// Returns the embedded default settings TOML content.
pub fn default_toml() -> &'static str {
    DEFAULT_SETTINGS_TOML
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("TOML parse error: {0}")]
    Parse(String),
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
    #[error("cannot read {path}: {msg}")]
    Io { path: String, msg: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub keys: KeySettings,
    pub policy: PolicySettings,
    pub announce: AnnounceSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeySettings {
    pub accept: Vec<KeyEvent>,
    pub dismiss: Vec<KeyEvent>,
    pub accept_on_enter: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolicySettings {
    #[serde(default)]
    pub restricted_surfaces: Vec<String>,
    pub allow_non_compositional: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnnounceSettings {
    pub enabled: bool,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.display().to_string(),
            msg: e.to_string(),
        })?;
        let settings = parse_settings_toml(&content)?;
        debug!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    pub fn is_accept_key(&self, key: KeyEvent) -> bool {
        self.keys.accept.contains(&key)
    }

    pub fn is_dismiss_key(&self, key: KeyEvent) -> bool {
        self.keys.dismiss.contains(&key)
    }
}

impl Default for Settings {
    fn default() -> Self {
        parse_settings_toml(DEFAULT_SETTINGS_TOML).expect("default settings TOML must be valid")
    }
}

pub fn parse_settings_toml(toml_str: &str) -> Result<Settings, SettingsError> {
    let s: Settings = toml::from_str(toml_str).map_err(|e| SettingsError::Parse(e.to_string()))?;
    validate(&s)?;
    Ok(s)
}

fn validate(s: &Settings) -> Result<(), SettingsError> {
    macro_rules! check_host_keys {
        ($field:ident) => {
            for key in &s.keys.$field {
                if matches!(key, KeyEvent::Char(_) | KeyEvent::Enter) {
                    return Err(SettingsError::InvalidValue {
                        field: concat!("keys.", stringify!($field)).to_string(),
                        reason: format!("{key:?} cannot be bound here"),
                    });
                }
            }
        };
    }

    check_host_keys!(accept);
    check_host_keys!(dismiss);

    if let Some(key) = s.keys.accept.iter().find(|k| s.keys.dismiss.contains(*k)) {
        return Err(SettingsError::InvalidValue {
            field: "keys.dismiss".to_string(),
            reason: format!("{key:?} is also an accept key"),
        });
    }

    if s.policy.restricted_surfaces.iter().any(|p| p.trim().is_empty()) {
        return Err(SettingsError::InvalidValue {
            field: "policy.restricted_surfaces".to_string(),
            reason: "entries must be non-empty".to_string(),
        });
    }

    Ok(())
}
