//! Scheduling results.

use serde::Serialize;

use crate::graph::Unmatched;
use crate::schedule::PhaseGroup;

/// Result of scheduling a batch.
///
/// Serializes with a `status` tag:
///
/// ```json
/// {"status": "blocked", "cycles": [["P9", "P8"]], "unmatched": []}
/// {"status": "ok", "layers": [...], "phases": [["Additive", [...]], ...], "unmatched": [...]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScheduleOutcome {
    /// The batch contains dependency cycles; nothing was scheduled.
    Blocked {
        /// Every cycle found, each listing its member ids.
        cycles: Vec<Vec<String>>,
        unmatched: Vec<Unmatched>,
    },
    /// The batch was scheduled.
    Ok {
        /// Parallel batches, in execution order.
        layers: Vec<Vec<String>>,
        /// Additive, Corrective and Destructive buckets, in that order.
        phases: Vec<PhaseGroup>,
        unmatched: Vec<Unmatched>,
    },
}

impl ScheduleOutcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Blocked { .. } => "blocked",
            Self::Ok { .. } => "ok",
        }
    }

    /// Empty when blocked.
    pub fn layers(&self) -> &[Vec<String>] {
        match self {
            Self::Ok { layers, .. } => layers,
            Self::Blocked { .. } => &[],
        }
    }

    /// Empty when blocked.
    pub fn phases(&self) -> &[PhaseGroup] {
        match self {
            Self::Ok { phases, .. } => phases,
            Self::Blocked { .. } => &[],
        }
    }

    /// Empty when scheduled.
    pub fn cycles(&self) -> &[Vec<String>] {
        match self {
            Self::Blocked { cycles, .. } => cycles,
            Self::Ok { .. } => &[],
        }
    }

    pub fn unmatched(&self) -> &[Unmatched] {
        match self {
            Self::Blocked { unmatched, .. } | Self::Ok { unmatched, .. } => unmatched,
        }
    }

    /// Pretty-printed JSON document.
    pub fn to_json_pretty(&self) -> String {
        // Every field is a string, list or plain struct, so serialization
        // cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
