//! Normalization of raw findings into canonical [`Patch`](crate::Patch) values.
//!
//! Producers disagree on field names (`impact` vs `severity` vs
//! `estimated_impact`, `affects` vs `creates`, ...). Every dialect is resolved
//! here so the graph and scheduler only ever see strict types.
//!
//! Normalization is best-effort per finding: a malformed field falls back to
//! its default instead of failing the batch. Only a malformed *document*
//! (see [`findings_from_document`]) is an error.

mod dependency;
mod document;
mod fields;
mod finding;

pub use dependency::{parse_dependency, parse_dependency_str};
pub use document::{findings_from_document, load_findings, normalize_document, read_document};
pub use finding::{auto_id, normalize_finding, DEFAULT_CONFIDENCE};
