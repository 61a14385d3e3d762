//! # Patch Sequencer
//!
//! Orders a batch of database schema patches into a safe execution sequence.
//! Patches declare the objects they depend on and the objects they affect;
//! the sequencer links them into a dependency graph, refuses batches with
//! dependency cycles, and otherwise emits a deterministic schedule.
//!
//! ## Architecture
//!
//! ```text
//! Findings (JSON, any dialect)
//!        │
//!        ▼
//! ┌──────────────┐
//! │  Normalize   │  Legacy field names → Patch
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │    Graph     │  depends-on ↔ affects matching, fanout
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Cycles     │  Tarjan SCC ──▶ blocked
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Schedule   │  Layers + Additive / Corrective / Destructive phases
//! └──────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use patch_sequencer::{Sequencer, SequencerConfig};
//!
//! let sequencer = Sequencer::new(SequencerConfig::default());
//! let outcome = sequencer.schedule_file("findings.json".as_ref())?;
//! println!("{}", outcome.to_json_pretty());
//! ```

pub mod config;
pub mod diagnostic;
pub mod graph;
pub mod model;
pub mod normalize;
pub mod outcome;
pub mod samples;
pub mod schedule;
pub mod validate;

use std::path::Path;

use serde_json::Value;
use tracing::{info, warn};

pub use config::{AmbiguityPolicy, SequencerConfig};
pub use diagnostic::SequencerError;
pub use graph::{Ambiguity, PatchGraph, Unmatched};
pub use model::{Classification, Dependency, Impact, Patch, Phase};
pub use outcome::ScheduleOutcome;
pub use schedule::PhaseGroup;

/// Runs the scheduling pipeline with a given configuration.
#[derive(Debug, Clone, Default)]
pub struct Sequencer {
    config: SequencerConfig,
}

impl Sequencer {
    pub fn new(config: SequencerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SequencerConfig {
        &self.config
    }

    /// Schedules a batch of canonical patches.
    ///
    /// This runs:
    /// 1. Build the dependency graph
    /// 2. Apply the ambiguity policy
    /// 3. Detect cycles (a cyclic batch returns [`ScheduleOutcome::Blocked`])
    /// 4. Layered scheduling
    /// 5. Phase grouping
    ///
    /// Errors are reserved for malformed batches (duplicate ids, rejected
    /// ambiguities); a cycle is a normal, reportable outcome.
    pub fn schedule(&self, patches: Vec<Patch>) -> Result<ScheduleOutcome, SequencerError> {
        let graph = PatchGraph::build(patches)?;
        self.check_ambiguities(&graph)?;

        let cycles = graph.cycles();
        if !cycles.is_empty() {
            info!(cycles = cycles.len(), "batch blocked by dependency cycles");
            return Ok(ScheduleOutcome::Blocked {
                cycles,
                unmatched: graph.into_unmatched(),
            });
        }

        let layers = schedule::schedule_layers(&graph)?;
        let phases = schedule::group_phases(&graph, &layers);

        Ok(ScheduleOutcome::Ok {
            layers,
            phases,
            unmatched: graph.into_unmatched(),
        })
    }

    /// Normalizes and schedules a findings document.
    pub fn schedule_document(&self, document: &Value) -> Result<ScheduleOutcome, SequencerError> {
        let patches = self.patches_from_document(document)?;
        self.schedule(patches)
    }

    /// Reads, normalizes and schedules a findings file.
    pub fn schedule_file(&self, path: &Path) -> Result<ScheduleOutcome, SequencerError> {
        let document = normalize::read_document(path)?;
        self.schedule_document(&document)
    }

    /// Turns a findings document into patches, enforcing the strict schema
    /// first when `strict_input` is set.
    pub fn patches_from_document(&self, document: &Value) -> Result<Vec<Patch>, SequencerError> {
        if self.config.strict_input {
            let violations = validate::validate_document(document)?;
            if let Some(first) = violations.first() {
                return Err(SequencerError::SchemaViolations {
                    count: violations.len(),
                    first: first.to_string(),
                });
            }
        }

        normalize::normalize_document(document)
    }

    fn check_ambiguities(&self, graph: &PatchGraph) -> Result<(), SequencerError> {
        for ambiguity in graph.ambiguities() {
            match self.config.ambiguity {
                AmbiguityPolicy::Reject => {
                    return Err(SequencerError::AmbiguousProducer {
                        patch: ambiguity.patch_id.clone(),
                        dependency: ambiguity.dependency.to_string(),
                        candidates: ambiguity.candidates.clone(),
                    });
                }
                AmbiguityPolicy::FirstMatch => {
                    warn!(
                        patch = %ambiguity.patch_id,
                        dependency = %ambiguity.dependency,
                        chosen = %ambiguity.candidates[0],
                        candidates = ambiguity.candidates.len(),
                        "dependency affected by several patches; using the first"
                    );
                }
            }
        }
        Ok(())
    }
}

/// Schedules a batch with the default configuration.
pub fn schedule_patches(patches: Vec<Patch>) -> Result<ScheduleOutcome, SequencerError> {
    Sequencer::default().schedule(patches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sample_batch_schedules() {
        let outcome = schedule_patches(samples::acyclic_batch()).unwrap();

        assert_eq!(outcome.status(), "ok");
        assert_eq!(
            outcome.layers(),
            &[
                vec!["P1", "P6", "P3", "P5"],
                vec!["P2", "P7", "P4"],
            ]
        );

        let phases: Vec<(Phase, Vec<&str>)> = outcome
            .phases()
            .iter()
            .map(|g| (g.phase, g.patch_ids.iter().map(String::as_str).collect()))
            .collect();
        assert_eq!(
            phases,
            vec![
                (Phase::Additive, vec!["P1", "P6", "P3"]),
                (Phase::Corrective, vec!["P2", "P7", "P4"]),
                (Phase::Destructive, vec!["P5"]),
            ]
        );

        assert_eq!(
            outcome.unmatched(),
            &[Unmatched {
                patch_id: "P5".into(),
                dependency: Dependency::table("old_table"),
            }]
        );
    }

    #[test]
    fn test_cyclic_batch_blocks() {
        let outcome = schedule_patches(samples::cyclic_batch()).unwrap();

        assert!(outcome.is_blocked());
        assert_eq!(outcome.cycles(), &[vec!["P9".to_string(), "P8".to_string()]]);
        assert!(outcome.layers().is_empty());
        assert!(outcome.phases().is_empty());
        assert!(outcome.unmatched().is_empty());
    }

    #[test]
    fn test_blocked_json_shape() {
        let outcome = schedule_patches(samples::cyclic_batch()).unwrap();
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({"status": "blocked", "cycles": [["P9", "P8"]], "unmatched": []})
        );
    }

    #[test]
    fn test_ok_json_shape() {
        let outcome = schedule_patches(samples::acyclic_batch()).unwrap();
        let value = serde_json::to_value(&outcome).unwrap();

        assert_eq!(value["status"], "ok");
        assert_eq!(value["phases"][0], json!(["Additive", ["P1", "P6", "P3"]]));
        assert_eq!(
            value["unmatched"],
            json!([["P5", {"schema": "public", "name": "old_table", "kind": "table"}]])
        );
    }

    #[test]
    fn test_cycle_reports_unmatched_too() {
        let mut patches = samples::cyclic_batch();
        patches.push(
            Patch::new("P10", Classification::Additive, 70, Impact::Low)
                .depends_on(Dependency::table("external")),
        );

        let outcome = schedule_patches(patches).unwrap();
        assert!(outcome.is_blocked());
        assert_eq!(outcome.unmatched().len(), 1);
        assert_eq!(outcome.unmatched()[0].patch_id, "P10");
    }

    #[test]
    fn test_reject_ambiguous_producers() {
        let patches = vec![
            Patch::new("a", Classification::Additive, 90, Impact::Low).affecting(Dependency::table("t")),
            Patch::new("b", Classification::Additive, 90, Impact::Low).affecting(Dependency::table("t")),
            Patch::new("c", Classification::Corrective, 90, Impact::Low).depends_on(Dependency::table("t")),
        ];

        let lenient = Sequencer::default().schedule(patches.clone()).unwrap();
        assert_eq!(lenient.layers(), &[vec!["a", "b"], vec!["c"]]);

        let strict = Sequencer::new(SequencerConfig {
            ambiguity: AmbiguityPolicy::Reject,
            ..Default::default()
        });
        let err = strict.schedule(patches).unwrap_err();
        assert!(matches!(err, SequencerError::AmbiguousProducer { ref candidates, .. } if candidates == &["a", "b"]));
    }

    #[test]
    fn test_strict_input_refuses_lenient_documents() {
        let doc = json!([{"id": "F1", "classification": "additive"}]);

        assert!(Sequencer::default().schedule_document(&doc).is_ok());

        let strict = Sequencer::new(SequencerConfig {
            strict_input: true,
            ..Default::default()
        });
        let err = strict.schedule_document(&doc).unwrap_err();
        assert!(matches!(err, SequencerError::SchemaViolations { count: 1, .. }));
    }
}
