//! Layered priority scheduling.
//!
//! Each layer is the *whole* frontier of patches whose dependencies are all
//! satisfied, ordered by [`Patch::priority_key`](crate::Patch::priority_key).
//! Patches released by a layer only become eligible for the next one, so a
//! layer is always the maximal batch that may run in parallel.

mod phase;

use tracing::debug;

use crate::diagnostic::SequencerError;
use crate::graph::PatchGraph;

pub use phase::{group_phases, PhaseGroup};

/// Orders an acyclic graph into layers of patch ids.
///
/// The caller must have ruled out cycles first; a frontier that runs dry
/// before every patch is placed is reported as
/// [`SequencerError::ScheduleInvariant`].
pub fn schedule_layers(graph: &PatchGraph) -> Result<Vec<Vec<String>>, SequencerError> {
    let patches = graph.patches();
    let mut indegree = graph.indegrees().to_vec();

    let mut frontier: Vec<usize> = (0..patches.len()).filter(|&i| indegree[i] == 0).collect();
    let mut layers = Vec::new();
    let mut scheduled = 0;

    while !frontier.is_empty() {
        frontier.sort_by(|&a, &b| patches[a].priority_key().cmp(&patches[b].priority_key()));

        let mut next = Vec::new();
        for &i in &frontier {
            for &successor in graph.successor_indices(i) {
                indegree[successor] -= 1;
                if indegree[successor] == 0 {
                    next.push(successor);
                }
            }
        }

        scheduled += frontier.len();
        layers.push(frontier.iter().map(|&i| patches[i].id.clone()).collect());
        frontier = next;
    }

    if scheduled != patches.len() {
        return Err(SequencerError::ScheduleInvariant {
            scheduled,
            total: patches.len(),
        });
    }

    debug!(layers = layers.len(), patches = scheduled, "scheduled patch layers");
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, Dependency, Impact, Patch};

    fn patch(id: &str, classification: Classification, confidence: u8) -> Patch {
        Patch::new(id, classification, confidence, Impact::Medium)
    }

    #[test]
    fn test_empty_graph() {
        let graph = PatchGraph::build(Vec::new()).unwrap();
        assert!(schedule_layers(&graph).unwrap().is_empty());
    }

    #[test]
    fn test_chain_yields_one_patch_per_layer() {
        let graph = PatchGraph::build(vec![
            patch("c", Classification::Corrective, 50).depends_on(Dependency::table("b")),
            patch("b", Classification::Corrective, 50)
                .depends_on(Dependency::table("a"))
                .affecting(Dependency::table("b")),
            patch("a", Classification::Corrective, 50).affecting(Dependency::table("a")),
        ])
        .unwrap();

        assert_eq!(schedule_layers(&graph).unwrap(), vec![vec!["a"], vec!["b"], vec!["c"]]);
    }

    #[test]
    fn test_released_patch_waits_for_next_layer() {
        // "root" releases "urgent" (Additive, 99). A single-pop scheduler would
        // run "urgent" before "slow"; the layered one keeps "slow" in layer 1.
        let graph = PatchGraph::build(vec![
            patch("root", Classification::Additive, 90).affecting(Dependency::table("t")),
            patch("slow", Classification::Destructive, 10),
            patch("urgent", Classification::Additive, 99).depends_on(Dependency::table("t")),
        ])
        .unwrap();

        assert_eq!(
            schedule_layers(&graph).unwrap(),
            vec![vec!["root", "slow"], vec!["urgent"]]
        );
    }

    #[test]
    fn test_frontier_sorted_by_priority() {
        let graph = PatchGraph::build(vec![
            patch("d1", Classification::Destructive, 99),
            patch("c1", Classification::Corrective, 60),
            patch("a2", Classification::Additive, 70),
            patch("c2", Classification::Corrective, 80),
            patch("a1", Classification::Additive, 70),
            patch("x", Classification::Other("Refactor".into()), 100),
        ])
        .unwrap();

        assert_eq!(
            schedule_layers(&graph).unwrap(),
            vec![vec!["a1", "a2", "c2", "c1", "d1", "x"]]
        );
    }

    #[test]
    fn test_fanout_breaks_ties() {
        let graph = PatchGraph::build(vec![
            patch("a", Classification::Additive, 80).affecting(Dependency::table("a")),
            patch("b", Classification::Additive, 80).affecting(Dependency::table("b")),
            patch("c", Classification::Corrective, 80).depends_on(Dependency::table("b")),
        ])
        .unwrap();

        assert_eq!(schedule_layers(&graph).unwrap()[0], vec!["b", "a"]);
    }

    #[test]
    fn test_cyclic_graph_violates_invariant() {
        let graph = PatchGraph::build(vec![
            patch("a", Classification::Corrective, 50)
                .depends_on(Dependency::table("b"))
                .affecting(Dependency::table("a")),
            patch("b", Classification::Corrective, 50)
                .depends_on(Dependency::table("a"))
                .affecting(Dependency::table("b")),
        ])
        .unwrap();

        let err = schedule_layers(&graph).unwrap_err();
        assert!(matches!(err, SequencerError::ScheduleInvariant { scheduled: 0, total: 2 }));
    }
}
