//! # configs
//!
//! Layered settings for the Grapevine client.
//!
//! Loading order, later layers winning:
//! 1. built-in defaults
//! 2. `grapevine.toml` in the working directory, or the file named by `GRAPEVINE_CONFIG`
//! 3. environment variables `GRAPEVINE__SECTION__KEY` (a `.env` file is read first)

use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://newgv-env.eba-8afbetm7.us-west-1.elasticbeanstalk.com/";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_CONFIG_FILE: &str = "grapevine";
const ENV_PREFIX: &str = "GRAPEVINE";
const CONFIG_PATH_VAR: &str = "GRAPEVINE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GatewaySettings {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl GatewaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Stand-in for the browser's stored session.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct SessionSettings {
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LogSettings {
    /// Default `EnvFilter` directive; `RUST_LOG` overrides it.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub session: SessionSettings,
    pub log: LogSettings,
}

impl Settings {
    /// Loads from `.env`, the optional config file and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env is normal.
        dotenvy::dotenv().ok();
        let file = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::load_from(&file)
    }

    /// Loads with `file` (extension optional) as the file layer.
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let settings: Settings = Self::builder()?
            .add_source(File::with_name(file).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("gateway.base_url", DEFAULT_BASE_URL)?
            .set_default("gateway.timeout_ms", DEFAULT_TIMEOUT_MS)?
            .set_default("log.level", "info")?
            .set_default("log.json", false)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "gateway.base_url",
                reason: "must not be empty".into(),
            });
        }
        if self.gateway.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "gateway.timeout_ms",
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_deployed_backend() {
        let settings: Settings = Settings::builder()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.gateway.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.gateway.timeout(), Duration::from_secs(5));
        assert_eq!(settings.session.username, None);
        assert!(!settings.log.json);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let settings = Settings {
            gateway: GatewaySettings {
                base_url: "http://localhost".into(),
                timeout_ms: 0,
            },
            session: SessionSettings::default(),
            log: LogSettings {
                level: "info".into(),
                json: false,
            },
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::Invalid { key: "gateway.timeout_ms", .. })
        ));
    }
}
