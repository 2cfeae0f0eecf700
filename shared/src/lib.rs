//! Shared types, models and derived analytics for the crowd insights platform
//!
//! This crate contains the backend wire models and the pure analytics used by
//! the server, and by the presentation layer via WASM.

pub mod analytics;
pub mod models;
pub mod types;

pub use analytics::*;
pub use models::*;
pub use types::*;
