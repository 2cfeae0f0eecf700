//! Domain models for the crowd insights platform

mod pattern;
mod prediction;
mod recommendation;
mod snapshot;

pub use pattern::*;
pub use prediction::*;
pub use recommendation::*;
pub use snapshot::*;
