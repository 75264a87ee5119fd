//! # Boltzmann Core - upload-then-predict workflow
//!
//! Platform-neutral heart of the digit demo. The browser app and the native
//! CLI both drive the same [`Workflow`]; they differ only in how they store
//! it and how they talk HTTP.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   select   ┌─────────────┐   secure_url   ┌─────────────┐   digit   ┌─────────────┐
//! │ Local image │──────────▶│ Asset host  │──────────────▶│  Predictor  │─────────▶│  Session    │
//! │  (preview)  │ multipart  │ (upload)    │   {"url": ..}  │ (JSON POST) │           │  snapshot   │
//! └─────────────┘            └─────────────┘                └─────────────┘           └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Classified failures
//! - [`config`] - Endpoint defaults and time budgets
//! - [`models`] - Wire types and the [`Digit`] label
//! - [`session`] - Session value object and snapshots
//! - [`workflow`] - State machine with stale-result protection
//! - [`driver`] - Async helpers and the service/store seams

pub mod error;
pub mod config;
pub mod models;
pub mod session;
pub mod workflow;
pub mod driver;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{Failure, Stage, WorkflowError, WorkflowResult};

pub use config::{Endpoints, ServiceConfig};

pub use models::{
    parse_prediction_response,
    parse_upload_response,
    Digit,
    PredictRequest,
    PredictionResponse,
    UploadResponse,
};

pub use session::{Phase, PreviewRef, SessionSnapshot, UploadSession};

pub use workflow::{Settled, Ticket, Workflow};

pub use driver::{request_prediction, select_and_upload, DigitService, SessionStore};
