//! Endpoint configuration.
//!
//! Compiled-in defaults for the two external services. The browser app
//! uses them as-is; the native CLI layers `.env`, environment variables
//! and flags on top.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Asset host base URL (Cloudinary REST API).
pub const ASSET_HOST_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Unsigned upload preset configured on the asset host.
pub const UPLOAD_PRESET: &str = "ai_project";

/// Asset host namespace.
pub const CLOUD_NAME: &str = "de1yfnzdz";

/// Prediction endpoint.
pub const PREDICT_URL: &str = "https://ea94-35-231-68-211.ngrok-free.app/predict_from_url";

/// Default time budget for each request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the two external collaborators live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoints {
    /// Base URL of the asset host, without the namespace.
    pub asset_host_base: String,
    pub upload_preset: String,
    pub cloud_name: String,
    pub predict_url: String,
}

impl Endpoints {
    /// Full multipart upload URL: `{base}/{cloud_name}/image/upload`.
    pub fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.asset_host_base.trim_end_matches('/'),
            self.cloud_name
        )
    }

    /// Endpoints pointing at a local mock server, e.g. `http://127.0.0.1:8787`.
    pub fn local(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            asset_host_base: format!("{}/v1_1", base),
            predict_url: format!("{}/predict_from_url", base),
            ..Self::default()
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            asset_host_base: ASSET_HOST_BASE.to_string(),
            upload_preset: UPLOAD_PRESET.to_string(),
            cloud_name: CLOUD_NAME.to_string(),
            predict_url: PREDICT_URL.to_string(),
        }
    }
}

/// Endpoints plus per-request time budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub endpoints: Endpoints,
    #[serde(with = "duration_secs")]
    pub upload_timeout: Duration,
    #[serde(with = "duration_secs")]
    pub predict_timeout: Duration,
}

impl ServiceConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self.predict_timeout = timeout;
        self
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            upload_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            predict_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom("timeout must be a non-negative number of seconds"));
        }
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_upload_url() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.upload_url(),
            "https://api.cloudinary.com/v1_1/de1yfnzdz/image/upload"
        );
    }

    #[test]
    fn test_local_endpoints() {
        let endpoints = Endpoints::local("http://127.0.0.1:8787/");
        assert_eq!(
            endpoints.upload_url(),
            "http://127.0.0.1:8787/v1_1/de1yfnzdz/image/upload"
        );
        assert_eq!(endpoints.predict_url, "http://127.0.0.1:8787/predict_from_url");
        assert_eq!(endpoints.upload_preset, UPLOAD_PRESET);
    }

    #[test]
    fn test_config_serializes_timeouts_as_seconds() {
        let config = ServiceConfig::default().with_timeout(Duration::from_millis(1500));
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["predict_timeout"], 1.5);

        let back: ServiceConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.upload_timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_config_rejects_unrepresentable_timeouts() {
        let mut json = serde_json::to_value(ServiceConfig::default()).unwrap();
        json["predict_timeout"] = serde_json::json!(1e30);
        assert!(serde_json::from_value::<ServiceConfig>(json.clone()).is_err());

        json["predict_timeout"] = serde_json::json!(-1.0);
        assert!(serde_json::from_value::<ServiceConfig>(json).is_err());
    }
}
