//! Domain layer - Marker engine and reference instants

pub mod markers;
pub mod reference_instant;

pub use markers::{transform, Diagnostic, MarkerSettings, Transformed};
pub use reference_instant::ReferenceInstant;
