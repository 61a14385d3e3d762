//! Patch entity and its scheduling priorities.

use std::cmp::Reverse;
use std::fmt;

use serde::{Serialize, Serializer};

use super::Dependency;

/// Migration class of a patch.
///
/// Values outside the three known classes are kept verbatim in
/// [`Classification::Other`] and rank below every known class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Classification {
    Additive,
    Corrective,
    Destructive,
    Other(String),
}

impl Classification {
    /// Parses a raw classification, title-casing it first (`"corrective"` and
    /// `"CORRECTIVE"` both become [`Classification::Corrective`]).
    pub fn parse(raw: &str) -> Self {
        let titled = title_case(raw);
        match titled.as_str() {
            "Additive" => Self::Additive,
            "Corrective" => Self::Corrective,
            "Destructive" => Self::Destructive,
            _ => Self::Other(titled),
        }
    }

    /// Scheduling priority. Higher runs first.
    pub const fn priority(&self) -> u8 {
        match self {
            Self::Additive => 3,
            Self::Corrective => 2,
            Self::Destructive => 1,
            Self::Other(_) => 0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Additive => "Additive",
            Self::Corrective => "Corrective",
            Self::Destructive => "Destructive",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Classification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Estimated impact of applying a patch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Impact {
    Low,
    Medium,
    High,
    Other(String),
}

impl Impact {
    /// Parses a raw impact, lower-casing it first.
    pub fn parse(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        match lowered.as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Other(lowered),
        }
    }

    /// Scheduling priority. Lower impact runs first.
    pub const fn priority(&self) -> u8 {
        match self {
            Self::Low => 3,
            Self::Medium => 2,
            Self::High => 1,
            Self::Other(_) => 0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Impact {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Execution phase buckets, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Phase {
    Additive,
    Corrective,
    Destructive,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Additive, Phase::Corrective, Phase::Destructive];

    /// Phase bucket for a classification. Unknown classes run last.
    pub fn for_classification(classification: &Classification) -> Self {
        match classification {
            Classification::Additive => Phase::Additive,
            Classification::Corrective => Phase::Corrective,
            Classification::Destructive | Classification::Other(_) => Phase::Destructive,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Additive => "Additive",
            Phase::Corrective => "Corrective",
            Phase::Destructive => "Destructive",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort key used to order a scheduling frontier; the smallest key goes first.
///
/// Class, confidence, impact and fanout are compared highest-first, and the
/// id breaks any remaining tie lexicographically.
pub type PriorityKey<'a> = (Reverse<u8>, Reverse<u8>, Reverse<u8>, Reverse<usize>, &'a str);

/// A unit of schema change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Patch {
    pub id: String,
    pub classification: Classification,
    /// Confidence in the patch, always within `0..=100`.
    pub confidence: u8,
    pub impact: Impact,
    /// Objects this patch needs to exist (or be in their new shape) first.
    pub dependencies: Vec<Dependency>,
    /// Objects this patch creates or changes.
    pub affects: Vec<Dependency>,
    /// Number of patches that *directly* depend on something this patch
    /// affects (graph out-degree). This is not the transitive reach.
    /// Zero until the patch has been placed in a [`PatchGraph`](crate::PatchGraph).
    pub fanout: usize,
}

impl Patch {
    pub fn new(
        id: impl Into<String>,
        classification: Classification,
        confidence: u8,
        impact: Impact,
    ) -> Self {
        Self {
            id: id.into(),
            classification,
            confidence: confidence.min(100),
            impact,
            dependencies: Vec::new(),
            affects: Vec::new(),
            fanout: 0,
        }
    }

    /// Adds a dependency.
    pub fn depends_on(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// Adds an affected object.
    pub fn affecting(mut self, dependency: Dependency) -> Self {
        self.affects.push(dependency);
        self
    }

    pub fn priority_key(&self) -> PriorityKey<'_> {
        (
            Reverse(self.classification.priority()),
            Reverse(self.confidence),
            Reverse(self.impact.priority()),
            Reverse(self.fanout),
            &self.id,
        )
    }

    pub fn phase(&self) -> Phase {
        Phase::for_classification(&self.classification)
    }
}

/// First character upper-cased, the rest lower-cased.
fn title_case(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_title_cases() {
        assert_eq!(Classification::parse("corrective"), Classification::Corrective);
        assert_eq!(Classification::parse("ADDITIVE"), Classification::Additive);
        assert_eq!(
            Classification::parse("refactor"),
            Classification::Other("Refactor".to_string())
        );
    }

    #[test]
    fn test_impact_lower_cases() {
        assert_eq!(Impact::parse("HIGH"), Impact::High);
        assert_eq!(Impact::parse("Critical"), Impact::Other("critical".to_string()));
    }

    #[test]
    fn test_unknown_values_rank_lowest() {
        assert!(Classification::Other("X".into()).priority() < Classification::Destructive.priority());
        assert!(Impact::Other("x".into()).priority() < Impact::High.priority());
    }

    #[test]
    fn test_priority_key_ordering() {
        let additive = Patch::new("b", Classification::Additive, 10, Impact::High);
        let corrective = Patch::new("a", Classification::Corrective, 99, Impact::Low);
        assert!(additive.priority_key() < corrective.priority_key());

        let confident = Patch::new("z", Classification::Corrective, 90, Impact::High);
        let unsure = Patch::new("a", Classification::Corrective, 80, Impact::Low);
        assert!(confident.priority_key() < unsure.priority_key());

        let low = Patch::new("z", Classification::Corrective, 80, Impact::Low);
        let high = Patch::new("a", Classification::Corrective, 80, Impact::High);
        assert!(low.priority_key() < high.priority_key());

        let mut wide = Patch::new("z", Classification::Corrective, 80, Impact::Low);
        wide.fanout = 3;
        assert!(wide.priority_key() < low.priority_key());

        let first = Patch::new("a", Classification::Corrective, 80, Impact::Low);
        assert!(first.priority_key() < low.priority_key());
    }

    #[test]
    fn test_unknown_class_lands_in_destructive_phase() {
        let patch = Patch::new("x", Classification::Other("Refactor".into()), 50, Impact::Medium);
        assert_eq!(patch.phase(), Phase::Destructive);
    }

    #[test]
    fn test_new_clamps_confidence() {
        let patch = Patch::new("x", Classification::Additive, 250, Impact::Low);
        assert_eq!(patch.confidence, 100);
    }
}
