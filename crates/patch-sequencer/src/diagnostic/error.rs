//! Sequencer error types.
#![allow(unused_assignments)]

use std::path::PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while loading or scheduling a patch batch.
///
/// A cyclic batch is *not* an error: it is reported through
/// [`ScheduleOutcome::Blocked`](crate::ScheduleOutcome::Blocked).
#[allow(unused_assignments)]
#[derive(Error, Diagnostic, Debug)]
pub enum SequencerError {
    // =========================================================================
    // IO Errors
    // =========================================================================
    #[error("Input file not found: {}", path.display())]
    #[diagnostic(
        code(sequencer::io::not_found),
        help("Pass the path to a findings JSON document, or omit it to run the bundled samples.")
    )]
    InputNotFound {
        path: PathBuf,
    },

    #[error("Failed to read file '{}': {message}", path.display())]
    #[diagnostic(code(sequencer::io::read_error))]
    IoError {
        path: PathBuf,
        message: String,
    },

    // =========================================================================
    // Document Errors
    // =========================================================================
    #[error("Invalid JSON: {message}")]
    #[diagnostic(code(sequencer::document::invalid_json))]
    InvalidJson {
        message: String,
    },

    #[error("Unsupported document shape: found {found}")]
    #[diagnostic(
        code(sequencer::document::unsupported_shape),
        help("Expected a top-level array of findings or an object of the form {{\"findings\": [...]}}")
    )]
    UnsupportedDocument {
        found: String,
    },

    #[error("Document has {count} schema violation(s); first: {first}")]
    #[diagnostic(
        code(sequencer::document::schema_violation),
        help("Run `sequencer check <INPUT>` for the full list, or drop --strict to normalize leniently.")
    )]
    SchemaViolations {
        count: usize,
        first: String,
    },

    // =========================================================================
    // Graph Errors
    // =========================================================================
    #[error("Duplicate patch id '{id}' (findings #{first} and #{second})")]
    #[diagnostic(
        code(sequencer::graph::duplicate_id),
        help("Patch ids must be unique within a batch.")
    )]
    DuplicatePatchId {
        id: String,
        first: usize,
        second: usize,
    },

    #[error("Dependency {dependency} of patch '{patch}' is affected by several patches: {}", candidates.join(", "))]
    #[diagnostic(
        code(sequencer::graph::ambiguous_producer),
        help("Only one patch in a batch may affect a given object when ambiguous producers are rejected.")
    )]
    AmbiguousProducer {
        patch: String,
        dependency: String,
        candidates: Vec<String>,
    },

    // =========================================================================
    // Scheduling Errors
    // =========================================================================
    #[error("Scheduler stalled after {scheduled} of {total} patches on an acyclic graph")]
    #[diagnostic(code(sequencer::schedule::invariant_violation))]
    ScheduleInvariant {
        scheduled: usize,
        total: usize,
    },
}

impl SequencerError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::IoError {
            path: path.into(),
            message: message.into(),
        }
    }
}
