//! # Boltzmann CLI - native client for the digit demo
//!
//! Drives the shared [`boltzmann_core::Workflow`] from the terminal with
//! reqwest, and ships local mocks of both external services.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use boltzmann_cli::NativeClient;
//! use boltzmann_core::ServiceConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = NativeClient::new(ServiceConfig::default()).unwrap();
//!     let (url, digit) = client.upload_and_predict("digit7.png".as_ref()).await.unwrap();
//!     println!("{} -> {}", url, digit);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - CLI error types
//! - [`settings`] - `.env` / environment / flag layering
//! - [`logs`] - stderr logger
//! - [`client`] - reqwest services and the native session
//! - [`mock`] - axum mock of the asset host and predictor

pub mod error;
pub mod settings;
pub mod logs;
pub mod client;
pub mod mock;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{CliError, CliResult, ConfigError};

pub use settings::{ConfigReport, Overrides};

pub use logs::ConsoleLogger;

pub use client::{guess_mime, HttpService, LocalImage, LocalPreview, NativeClient};

pub use mock::{MockConfig, MockServer, PredictBehavior, UploadBehavior};
