//! Canonical entities shared by every stage of the pipeline.
//!
//! Raw findings are resolved into these types exactly once, at the
//! normalization boundary. Nothing downstream looks at raw field names.

mod dependency;
mod patch;

pub use dependency::{Dependency, DEFAULT_KIND, DEFAULT_SCHEMA};
pub use patch::{Classification, Impact, Patch, Phase, PriorityKey};
