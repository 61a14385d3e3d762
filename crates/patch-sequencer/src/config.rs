//! Sequencer configuration.

/// How to treat a dependency that several patches in the batch affect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AmbiguityPolicy {
    /// The first affecting patch in input order supplies the edge; the others
    /// are ignored and a warning is logged.
    #[default]
    FirstMatch,
    /// Refuse the batch with [`SequencerError::AmbiguousProducer`](crate::SequencerError::AmbiguousProducer).
    Reject,
}

/// Configuration for the patch sequencer.
#[derive(Debug, Clone, Default)]
pub struct SequencerConfig {
    /// Resolution of dependencies with more than one producer.
    pub ambiguity: AmbiguityPolicy,

    /// Check documents against the strict structural schema before
    /// normalizing them, and refuse any document with violations.
    pub strict_input: bool,
}
