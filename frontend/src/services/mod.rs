//! Browser-side services.
//!
//! # Services
//!
//! - [`browser`] - asset host upload and prediction over `fetch`
//! - [`preview`] - object URL preview handles
//! - [`store`] - signal-backed workflow store

pub mod browser;
pub mod preview;
pub mod store;

pub use browser::*;
pub use preview::*;
pub use store::*;
