//! Endpoint settings for the native client.
//!
//! Precedence: command-line flags > environment (optionally loaded from a
//! `.env` file) > compiled-in defaults from [`boltzmann_core::config`].
//!
//! | Variable                   | Meaning                          |
//! |----------------------------|----------------------------------|
//! | `BOLTZMANN_ASSET_HOST`     | Asset host base URL              |
//! | `BOLTZMANN_UPLOAD_PRESET`  | Upload preset                    |
//! | `BOLTZMANN_CLOUD_NAME`     | Asset host namespace             |
//! | `BOLTZMANN_PREDICT_URL`    | Prediction endpoint              |
//! | `BOLTZMANN_TIMEOUT_SECS`   | Per-request time budget          |

use std::time::Duration;

use boltzmann_core::ServiceConfig;
use serde::Serialize;

use crate::error::ConfigError;

pub const ENV_ASSET_HOST: &str = "BOLTZMANN_ASSET_HOST";
pub const ENV_UPLOAD_PRESET: &str = "BOLTZMANN_UPLOAD_PRESET";
pub const ENV_CLOUD_NAME: &str = "BOLTZMANN_CLOUD_NAME";
pub const ENV_PREDICT_URL: &str = "BOLTZMANN_PREDICT_URL";
pub const ENV_TIMEOUT_SECS: &str = "BOLTZMANN_TIMEOUT_SECS";

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub asset_host: Option<String>,
    pub upload_preset: Option<String>,
    pub cloud_name: Option<String>,
    pub predict_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Resolve settings from `.env`, the process environment and `overrides`.
pub fn load(overrides: &Overrides) -> Result<ServiceConfig, ConfigError> {
    // Load .env file (if present)
    let _ = dotenvy::dotenv();
    resolve(|name| std::env::var(name).ok(), overrides)
}

/// Resolve settings from an arbitrary variable lookup.
pub fn resolve(
    lookup: impl Fn(&str) -> Option<String>,
    overrides: &Overrides,
) -> Result<ServiceConfig, ConfigError> {
    let pick = |flag: &Option<String>, var: &str| -> Option<String> {
        flag.clone()
            .or_else(|| lookup(var))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let mut config = ServiceConfig::default();
    let endpoints = &mut config.endpoints;

    if let Some(base) = pick(&overrides.asset_host, ENV_ASSET_HOST) {
        endpoints.asset_host_base = require_http(ENV_ASSET_HOST, base)?;
    }
    if let Some(preset) = pick(&overrides.upload_preset, ENV_UPLOAD_PRESET) {
        endpoints.upload_preset = preset;
    }
    if let Some(cloud) = pick(&overrides.cloud_name, ENV_CLOUD_NAME) {
        endpoints.cloud_name = cloud;
    }
    if let Some(url) = pick(&overrides.predict_url, ENV_PREDICT_URL) {
        endpoints.predict_url = require_http(ENV_PREDICT_URL, url)?;
    }

    let timeout = match overrides.timeout_secs {
        Some(secs) => Some(secs),
        None => lookup(ENV_TIMEOUT_SECS)
            .map(|raw| {
                raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidVar {
                    name: ENV_TIMEOUT_SECS,
                    value: raw.clone(),
                    reason: e.to_string(),
                })
            })
            .transpose()?,
    };
    if let Some(secs) = timeout {
        if secs == 0 {
            return Err(ConfigError::InvalidVar {
                name: ENV_TIMEOUT_SECS,
                value: "0".to_string(),
                reason: "must be at least 1 second".to_string(),
            });
        }
        config = config.with_timeout(Duration::from_secs(secs));
    }

    Ok(config)
}

/// What `boltzmann config` prints.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigReport {
    pub upload_url: String,
    pub config: ServiceConfig,
}

impl From<ServiceConfig> for ConfigReport {
    fn from(config: ServiceConfig) -> Self {
        Self {
            upload_url: config.endpoints.upload_url(),
            config,
        }
    }
}

fn require_http(name: &'static str, value: String) -> Result<String, ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(value)
    } else {
        Err(ConfigError::NotHttp { name, value })
    }
}
