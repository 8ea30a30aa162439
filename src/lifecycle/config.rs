//! Runtime settings: defaults, then `account-manager.toml`, then `ACCOUNT_MANAGER__*`
//! environment variables.

use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILE: &str = "account-manager.toml";
pub const ENV_PREFIX: &str = "ACCOUNT_MANAGER__";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// A demo row created in the backend at startup.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SeedAccount {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Mailbox size for the store actor, the modal presenter and modal commands.
    pub channel_buffer: usize,
    pub object_type: String,
    pub seed_accounts: Vec<SeedAccount>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            channel_buffer: 32,
            object_type: "Account".into(),
            seed_accounts: Vec::new(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Loads `account-manager.toml` from the working directory (if present) and applies the
    /// process environment on top.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE), std::env::vars())
    }

    pub fn load_from(
        path: &Path,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, ConfigError> {
        let mut settings = match fs::read_to_string(path) {
            Ok(raw) => toml::from_str(&raw)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Settings::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        settings.apply_env(vars)?;
        settings.validate()?;
        Ok(settings)
    }

    fn apply_env(
        &mut self,
        vars: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), ConfigError> {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "CHANNEL_BUFFER" => {
                    self.channel_buffer = value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue { key, value })?;
                }
                "OBJECT_TYPE" => self.object_type = value,
                _ => {}
            }
        }
        Ok(())
    }

    /// Rejects values the runtime cannot start with (a zero `channel_buffer`).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_buffer == 0 {
            return Err(ConfigError::InvalidValue {
                key: "channel_buffer".into(),
                value: "0".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_file() {
        let settings =
            Settings::load_from(Path::new("does-not-exist.toml"), Vec::new()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.channel_buffer, 32);
        assert_eq!(settings.object_type, "Account");
    }

    #[test]
    fn test_toml_with_seeds() {
        let settings = Settings::from_toml_str(
            r#"
            channel_buffer = 8

            [[seed_accounts]]
            name = "Acme"
            description = "Widgets"

            [[seed_accounts]]
            name = "Globex"
            "#,
        )
        .unwrap();

        assert_eq!(settings.channel_buffer, 8);
        assert_eq!(settings.object_type, "Account");
        assert_eq!(settings.seed_accounts.len(), 2);
        assert_eq!(settings.seed_accounts[1].description, "");
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::load_from(
            Path::new("does-not-exist.toml"),
            env(&[
                ("ACCOUNT_MANAGER__CHANNEL_BUFFER", "4"),
                ("ACCOUNT_MANAGER__OBJECT_TYPE", "Contact"),
                ("UNRELATED", "1"),
            ]),
        )
        .unwrap();
        assert_eq!(settings.channel_buffer, 4);
        assert_eq!(settings.object_type, "Contact");
    }

    #[test]
    fn test_rejects_bad_buffer() {
        let parsed = Settings::load_from(
            Path::new("does-not-exist.toml"),
            env(&[("ACCOUNT_MANAGER__CHANNEL_BUFFER", "many")]),
        );
        assert!(matches!(parsed, Err(ConfigError::InvalidValue { .. })));

        assert!(Settings::from_toml_str("channel_buffer = 0").is_err());
        assert!(matches!(
            Settings::from_toml_str("channel_buffer = \"x\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
