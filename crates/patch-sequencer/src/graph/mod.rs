//! Dependency graph construction.
//!
//! An edge `Q → P` means "P depends on an object Q affects", so Q must be
//! scheduled no later than P. Dependencies no patch in the batch affects are
//! collected in [`PatchGraph::unmatched`]; the object may already exist in the
//! target database, so this is reported rather than rejected.
//!
//! When several patches affect the same object, the first one in input order
//! supplies the edge. Such dependencies are recorded in
//! [`PatchGraph::ambiguities`] so callers can warn or refuse the batch.

mod scc;

use std::collections::{HashMap, HashSet};

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::diagnostic::SequencerError;
use crate::model::{Dependency, Patch};

pub use scc::strongly_connected_components;

/// A dependency with no affecting patch in the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unmatched {
    pub patch_id: String,
    pub dependency: Dependency,
}

impl Serialize for Unmatched {
    /// Serialized as a `[patch_id, dependency]` pair.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.patch_id, &self.dependency).serialize(serializer)
    }
}

/// A dependency that more than one other patch affects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ambiguity {
    /// Patch declaring the dependency.
    pub patch_id: String,
    pub dependency: Dependency,
    /// Every candidate producer in input order; the first one got the edge.
    pub candidates: Vec<String>,
}

/// Patches plus the edges derived from their dependencies.
#[derive(Debug, Clone)]
pub struct PatchGraph {
    patches: Vec<Patch>,
    index: HashMap<String, usize>,
    /// Successors of each patch, in insertion order.
    edges: Vec<Vec<usize>>,
    indegree: Vec<usize>,
    unmatched: Vec<Unmatched>,
    ambiguities: Vec<Ambiguity>,
}

impl PatchGraph {
    /// Builds the graph and fills in every patch's `fanout`.
    ///
    /// Fails only when two patches share an id.
    pub fn build(mut patches: Vec<Patch>) -> Result<Self, SequencerError> {
        let mut index = HashMap::with_capacity(patches.len());
        for (i, patch) in patches.iter().enumerate() {
            if let Some(first) = index.insert(patch.id.clone(), i) {
                return Err(SequencerError::DuplicatePatchId {
                    id: patch.id.clone(),
                    first,
                    second: i,
                });
            }
        }

        // Producers of each object, in input order.
        let mut producers: HashMap<&Dependency, Vec<usize>> = HashMap::new();
        for (i, patch) in patches.iter().enumerate() {
            for object in &patch.affects {
                let list = producers.entry(object).or_default();
                if list.last() != Some(&i) {
                    list.push(i);
                }
            }
        }

        let mut edges = vec![Vec::new(); patches.len()];
        let mut indegree = vec![0; patches.len()];
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        let mut unmatched = Vec::new();
        let mut ambiguities = Vec::new();

        for (target, patch) in patches.iter().enumerate() {
            for dependency in &patch.dependencies {
                let candidates: Vec<usize> = producers
                    .get(dependency)
                    .map(|list| list.iter().copied().filter(|&q| q != target).collect())
                    .unwrap_or_default();

                let Some(&source) = candidates.first() else {
                    unmatched.push(Unmatched {
                        patch_id: patch.id.clone(),
                        dependency: dependency.clone(),
                    });
                    continue;
                };

                if candidates.len() > 1 {
                    ambiguities.push(Ambiguity {
                        patch_id: patch.id.clone(),
                        dependency: dependency.clone(),
                        candidates: candidates.iter().map(|&q| patches[q].id.clone()).collect(),
                    });
                }

                if seen.insert((source, target)) {
                    edges[source].push(target);
                    indegree[target] += 1;
                }
            }
        }

        drop(producers);
        for (patch, successors) in patches.iter_mut().zip(&edges) {
            patch.fanout = successors.len();
        }

        debug!(
            patches = patches.len(),
            edges = seen.len(),
            unmatched = unmatched.len(),
            ambiguous = ambiguities.len(),
            "built dependency graph"
        );

        Ok(Self {
            patches,
            index,
            edges,
            indegree,
            unmatched,
            ambiguities,
        })
    }

    /// Patches in input order, with `fanout` computed.
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn patch(&self, id: &str) -> Option<&Patch> {
        self.index.get(id).map(|&i| &self.patches[i])
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Ids of the patches that directly depend on `id`.
    pub fn successors(&self, id: &str) -> Vec<&str> {
        self.index
            .get(id)
            .map(|&i| self.edges[i].iter().map(|&j| self.patches[j].id.as_str()).collect())
            .unwrap_or_default()
    }

    /// Number of patches `id` waits on.
    pub fn indegree(&self, id: &str) -> Option<usize> {
        self.index.get(id).map(|&i| self.indegree[i])
    }

    /// Every edge as a `(from, to)` id pair.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.edges.iter().enumerate().flat_map(move |(from, successors)| {
            successors
                .iter()
                .map(move |&to| (self.patches[from].id.as_str(), self.patches[to].id.as_str()))
        })
    }

    pub fn unmatched(&self) -> &[Unmatched] {
        &self.unmatched
    }

    pub fn ambiguities(&self) -> &[Ambiguity] {
        &self.ambiguities
    }

    /// Groups of patches that depend on each other in a cycle, in discovery
    /// order. Empty for an acyclic graph.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        strongly_connected_components(&self.edges)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| component.into_iter().map(|i| self.patches[i].id.clone()).collect())
            .collect()
    }

    pub(crate) fn successor_indices(&self, i: usize) -> &[usize] {
        &self.edges[i]
    }

    pub(crate) fn indegrees(&self) -> &[usize] {
        &self.indegree
    }

    pub(crate) fn into_unmatched(self) -> Vec<Unmatched> {
        self.unmatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classification, Impact};

    fn patch(id: &str) -> Patch {
        Patch::new(id, Classification::Corrective, 50, Impact::Medium)
    }

    #[test]
    fn test_edge_from_producer_to_consumer() {
        let graph = PatchGraph::build(vec![
            patch("create").affecting(Dependency::table("users")),
            patch("alter").depends_on(Dependency::table("users")),
        ])
        .unwrap();

        assert_eq!(graph.successors("create"), vec!["alter"]);
        assert_eq!(graph.indegree("alter"), Some(1));
        assert_eq!(graph.patch("create").unwrap().fanout, 1);
        assert_eq!(graph.patch("alter").unwrap().fanout, 0);
        assert!(graph.unmatched().is_empty());
    }

    #[test]
    fn test_match_requires_all_fields() {
        let graph = PatchGraph::build(vec![
            patch("a").affecting(Dependency::new("public", "users", "view")),
            patch("b").depends_on(Dependency::table("users")),
        ])
        .unwrap();

        assert_eq!(graph.edges().count(), 0);
        assert_eq!(graph.unmatched().len(), 1);
        assert_eq!(graph.unmatched()[0].patch_id, "b");
    }

    #[test]
    fn test_duplicate_edges_collapse() {
        let graph = PatchGraph::build(vec![
            patch("base")
                .affecting(Dependency::table("a"))
                .affecting(Dependency::table("b")),
            patch("user")
                .depends_on(Dependency::table("a"))
                .depends_on(Dependency::table("b"))
                .depends_on(Dependency::table("a")),
        ])
        .unwrap();

        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![("base", "user")]);
        assert_eq!(graph.indegree("user"), Some(1));
        assert_eq!(graph.patch("base").unwrap().fanout, 1);
    }

    #[test]
    fn test_self_affecting_dependency_is_unmatched() {
        let graph = PatchGraph::build(vec![patch("drop")
            .depends_on(Dependency::table("old"))
            .affecting(Dependency::table("old"))])
        .unwrap();

        assert_eq!(graph.edges().count(), 0);
        assert_eq!(
            graph.unmatched(),
            &[Unmatched {
                patch_id: "drop".into(),
                dependency: Dependency::table("old"),
            }]
        );
    }

    #[test]
    fn test_first_producer_wins() {
        let graph = PatchGraph::build(vec![
            patch("first").affecting(Dependency::table("t")),
            patch("second").affecting(Dependency::table("t")),
            patch("user").depends_on(Dependency::table("t")),
        ])
        .unwrap();

        assert_eq!(graph.successors("first"), vec!["user"]);
        assert!(graph.successors("second").is_empty());
        assert_eq!(graph.ambiguities().len(), 1);
        assert_eq!(graph.ambiguities()[0].candidates, vec!["first", "second"]);
    }

    #[test]
    fn test_later_producer_skips_self() {
        let graph = PatchGraph::build(vec![
            patch("p").depends_on(Dependency::table("t")).affecting(Dependency::table("t")),
            patch("q").affecting(Dependency::table("t")),
        ])
        .unwrap();

        assert_eq!(graph.successors("q"), vec!["p"]);
        assert!(graph.unmatched().is_empty());
        assert!(graph.ambiguities().is_empty());
    }

    #[test]
    fn test_unmatched_keeps_declaration_order() {
        let graph = PatchGraph::build(vec![
            patch("a").depends_on(Dependency::table("x")).depends_on(Dependency::table("y")),
            patch("b").depends_on(Dependency::table("z")),
        ])
        .unwrap();

        let names: Vec<_> = graph
            .unmatched()
            .iter()
            .map(|u| (u.patch_id.as_str(), u.dependency.name.as_str()))
            .collect();
        assert_eq!(names, vec![("a", "x"), ("a", "y"), ("b", "z")]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let err = PatchGraph::build(vec![patch("a"), patch("b"), patch("a")]).unwrap_err();
        assert!(matches!(
            err,
            SequencerError::DuplicatePatchId { ref id, first: 0, second: 2 } if id == "a"
        ));
    }

    #[test]
    fn test_unmatched_serializes_as_pair() {
        let entry = Unmatched {
            patch_id: "P5".into(),
            dependency: Dependency::table("old_table"),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!(["P5", {"schema": "public", "name": "old_table", "kind": "table"}])
        );
    }

    #[test]
    fn test_cycles_reported_by_id() {
        let graph = PatchGraph::build(vec![
            patch("a").depends_on(Dependency::table("b_out")).affecting(Dependency::table("a_out")),
            patch("b").depends_on(Dependency::table("a_out")).affecting(Dependency::table("b_out")),
            patch("c").depends_on(Dependency::table("a_out")),
        ])
        .unwrap();

        let cycles = graph.cycles();
        assert_eq!(cycles.len(), 1);
        let mut members = cycles[0].clone();
        members.sort();
        assert_eq!(members, vec!["a", "b"]);
    }
}
