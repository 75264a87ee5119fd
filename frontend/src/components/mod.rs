//! UI Components for the Boltzmann demo.
//!
//! # Pages
//! - [`HomePage`] - Explainer sections and the "See Demo" button
//! - [`DemoPage`] - Upload/predict demo
//!
//! # Sections
//! - [`Hero`] - Page title
//! - [`BmSection`], [`RbmSection`], [`ProjectIntro`] - Static explainer text
//! - [`UploadPredictSection`] - Image upload and digit prediction

mod hero;
mod sections;
mod upload;
mod home;
mod demo;

pub use hero::*;
pub use sections::*;
pub use upload::*;
pub use home::*;
pub use demo::*;
