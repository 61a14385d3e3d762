//! Phase grouping.
//!
//! Re-projects a layered schedule into the three execution phases. Layer
//! boundaries are ignored here: a Destructive patch sitting in the first
//! layer is still reported only under [`Phase::Destructive`]. Callers that
//! need phase-by-phase execution use the groups; callers that want maximal
//! parallelism use the layers.

use serde::{Serialize, Serializer};

use crate::graph::PatchGraph;
use crate::model::Phase;

/// Patch ids of one phase, in layer-emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseGroup {
    pub phase: Phase,
    pub patch_ids: Vec<String>,
}

impl Serialize for PhaseGroup {
    /// Serialized as a `[phase, ids]` pair.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.phase, &self.patch_ids).serialize(serializer)
    }
}

/// Buckets scheduled ids by phase. Always returns the three phases, in
/// [`Phase::ALL`] order, even when a bucket is empty.
pub fn group_phases(graph: &PatchGraph, layers: &[Vec<String>]) -> Vec<PhaseGroup> {
    let mut groups: Vec<PhaseGroup> = Phase::ALL
        .iter()
        .map(|&phase| PhaseGroup {
            phase,
            patch_ids: Vec::new(),
        })
        .collect();

    for id in layers.iter().flatten() {
        if let Some(patch) = graph.patch(id) {
            groups[patch.phase() as usize].patch_ids.push(id.clone());
        }
    }

    groups
}
