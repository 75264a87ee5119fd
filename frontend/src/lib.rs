//! Boltzmann Machines demo - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend explaining Boltzmann Machines and RBMs, with a
//! demo that uploads a digit image and shows the predicted label.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App (Router)                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  /       HomePage                                            │
//! │          ├── Hero                                            │
//! │          ├── BmSection, RbmSection, ProjectIntro             │
//! │          └── "See Demo" ──▶ /demo                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  /demo   DemoPage                                            │
//! │          ├── UploadPredictSection (workflow session)         │
//! │          └── "Back to Home" ──▶ /                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - Endpoint selection and UI constants
//! - [`components`] - Pages and sections
//! - [`services`] - `fetch` services, preview handles, signal store

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text=APP_NAME/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=HomePage/>
                    <Route path="/demo" view=DemoPage/>
                </Routes>
            </main>
        </Router>
    }
}
