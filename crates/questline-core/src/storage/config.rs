//! TOML-based application configuration.
//!
//! Stores user preferences:
//! - Notification and sound settings
//! - Optional path to a custom challenge catalog (JSON)
//!
//! Configuration is stored at `data_dir()/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

use super::data_dir;

/// Notification configuration.
///
/// `enabled` is the notification gate: the original's one-time permission
/// handshake maps to this flag, checked at delivery time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_50")]
    pub volume: u32,
    /// Path to a custom alert sound file (optional).
    /// If set, this file is handed to the host player instead of the
    /// built-in alert.
    #[serde(default)]
    pub custom_sound: Option<String>,
}

/// Challenge catalog configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path to a JSON catalog overriding the built-in challenge set.
    #[serde(default)]
    pub path: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `data_dir()/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Seed for the challenge sampler (None = entropy). Mainly useful
    /// for demos and debugging.
    #[serde(default)]
    pub sampler_seed: Option<u64>,
}

fn default_true() -> bool {
    true
}
fn default_50() -> u32 {
    50
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
            volume: 50,
            custom_sound: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notifications: NotificationsConfig::default(),
            catalog: CatalogConfig::default(),
            sampler_seed: None,
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf, std::io::Error> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, crate::error::CoreError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| {
                    ConfigError::LoadFailed {
                        path,
                        message: e.to_string(),
                    }
                })?;
                Ok(cfg)
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), crate::error::CoreError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    // The dot-path walks go through serde_json rather than toml::Value:
    // TOML has no encoding for None, so optional keys (catalog.path,
    // notifications.custom_sound, sampler_seed) vanish from a toml::Value
    // tree entirely. In JSON they stay addressable as null.

    fn json_leaf<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }
        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Get a config value as string by dot-separated key.
    ///
    /// Optional keys that are unset report as `null` rather than being
    /// mistaken for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let leaf = Self::json_leaf(&json, key)?;
        match leaf {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key.
    ///
    /// The value is coerced to the type the key currently holds; an unset
    /// optional key infers its type from the incoming text (bool, then
    /// integer, then string). The change is in-memory only -- call
    /// [`Config::save`] to persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be
    /// parsed as the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        use serde_json::Value;

        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut json = serde_json::to_value(&*self)
            .map_err(|e| invalid(e.to_string()))?;

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (parents.split('.').collect::<Vec<_>>(), leaf),
            None if key.is_empty() => return Err(unknown()),
            None => (Vec::new(), key),
        };

        let mut current = &mut json;
        for part in parents {
            current = current.get_mut(part).ok_or_else(unknown)?;
        }
        let object = current.as_object_mut().ok_or_else(unknown)?;
        let existing = object.get(leaf).ok_or_else(unknown)?;

        let new_value = match existing {
            Value::Bool(_) => Value::Bool(
                value.parse().map_err(|_| invalid(format!("expected a bool, got '{value}'")))?,
            ),
            Value::Number(_) => parse_number(value)
                .ok_or_else(|| invalid(format!("expected a number, got '{value}'")))?,
            // Unset optional key: infer the type from the text.
            Value::Null => {
                if let Ok(b) = value.parse::<bool>() {
                    Value::Bool(b)
                } else if let Some(n) = parse_number(value) {
                    n
                } else {
                    Value::String(value.to_string())
                }
            }
            _ => Value::String(value.to_string()),
        };
        object.insert(leaf.to_string(), new_value);

        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        Ok(())
    }
}

fn parse_number(value: &str) -> Option<serde_json::Value> {
    if let Ok(n) = value.parse::<u64>() {
        Some(serde_json::Value::Number(n.into()))
    } else if let Ok(n) = value.parse::<i64>() {
        Some(serde_json::Value::Number(n.into()))
    } else if let Ok(n) = value.parse::<f64>() {
        serde_json::Number::from_f64(n).map(serde_json::Value::Number)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.notifications.enabled);
        assert_eq!(parsed.notifications.volume, 50);
        assert!(parsed.catalog.path.is_none());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("notifications.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("notifications.volume").as_deref(), Some("50"));
        assert!(cfg.get("notifications.missing_key").is_none());
    }

    #[test]
    fn get_reports_unset_optional_keys_as_null() {
        let cfg = Config::default();
        assert_eq!(cfg.get("catalog.path").as_deref(), Some("null"));
        assert_eq!(cfg.get("notifications.custom_sound").as_deref(), Some("null"));
        assert_eq!(cfg.get("sampler_seed").as_deref(), Some("null"));
    }

    #[test]
    fn set_updates_nested_bool() {
        let mut cfg = Config::default();
        cfg.set("notifications.enabled", "false").unwrap();
        assert!(!cfg.notifications.enabled);
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("notifications.volume", "75").unwrap();
        assert_eq!(cfg.notifications.volume, 75);
    }

    #[test]
    fn set_installs_optional_catalog_path() {
        let mut cfg = Config::default();
        cfg.set("catalog.path", "/tmp/challenges.json").unwrap();
        assert_eq!(cfg.catalog.path.as_deref(), Some("/tmp/challenges.json"));
        assert_eq!(cfg.get("catalog.path").as_deref(), Some("/tmp/challenges.json"));
    }

    #[test]
    fn set_installs_optional_custom_sound() {
        let mut cfg = Config::default();
        cfg.set("notifications.custom_sound", "/tmp/ding.ogg").unwrap();
        assert_eq!(
            cfg.notifications.custom_sound.as_deref(),
            Some("/tmp/ding.ogg")
        );
    }

    #[test]
    fn set_infers_number_for_unset_seed() {
        let mut cfg = Config::default();
        cfg.set("sampler_seed", "42").unwrap();
        assert_eq!(cfg.sampler_seed, Some(42));
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("notifications.nonexistent_key", "value").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(_)));
        assert!(cfg.set("no.such.section", "value").is_err());
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        let err = cfg.set("notifications.enabled", "not_a_bool").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(cfg.set("notifications.volume", "loud").is_err());
        // Nothing was changed by the failed sets.
        assert!(cfg.notifications.enabled);
        assert_eq!(cfg.notifications.volume, 50);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: Config = toml::from_str("[notifications]\nvolume = 75\n").unwrap();
        assert_eq!(cfg.notifications.volume, 75);
        assert!(cfg.notifications.enabled);
        assert!(cfg.sampler_seed.is_none());
    }
}
