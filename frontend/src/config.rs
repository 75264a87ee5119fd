//! Application configuration.
//!
//! The external endpoints come from [`boltzmann_core::config`]. For local
//! development, build with `BOLTZMANN_MOCK_URL=http://localhost:8787` to
//! point the app at `boltzmann mock-server` instead.

use boltzmann_core::{Endpoints, ServiceConfig};

/// Application name, shown in the browser tab.
pub const APP_NAME: &str = "Boltzmann Machines & RBM";

/// DOM id of the hidden file input on the demo page.
pub const FILE_INPUT_ID: &str = "file-input";

/// Mock server base URL baked in at build time, if any.
pub const MOCK_URL: Option<&str> = option_env!("BOLTZMANN_MOCK_URL");

/// Endpoints and time budgets used by the demo page.
pub fn service_config() -> ServiceConfig {
    match MOCK_URL {
        Some(base) if !base.trim().is_empty() => ServiceConfig {
            endpoints: Endpoints::local(base),
            ..ServiceConfig::default()
        },
        _ => ServiceConfig::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_config_follows_mock_url() {
        let config = service_config();
        match MOCK_URL {
            Some(base) if !base.trim().is_empty() => {
                assert!(config.endpoints.predict_url.starts_with(base.trim_end_matches('/')));
            }
            _ => assert_eq!(config, ServiceConfig::default()),
        }
    }
}
