//! Build failures and data-quality anomalies.
//!
//! [`BuildError`] means no tree could be produced. [`Anomaly`] values are
//! soft: the tree is still built (deterministically) and the anomalies ride
//! along in [`crate::BuiltTree::anomalies`] so callers can surface them.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("requested root `{id}` matches no record")]
    RootNotFound { id: String },

    #[error("no record without a manager; cannot choose a default root")]
    NoRootResolvable,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// Several records have no manager; the first in input order was used.
    #[error("{} records have no manager; using `{chosen}` as root", candidates.len())]
    AmbiguousRoot {
        chosen: String,
        candidates: Vec<String>,
    },

    /// A manager chain loops back on itself. `path` follows manager
    /// references from `id` around the loop and back to `id`.
    #[error("manager cycle at `{id}`: {}", path.join(" -> "))]
    CycleDetected { id: String, path: Vec<String> },

    /// Several records share an id; the last one wins.
    #[error("employee id `{id}` appears {occurrences} times; keeping the last")]
    DuplicateIdentifier { id: String, occurrences: usize },

    /// A record names a manager id that matches no record.
    #[error("`{id}` reports to unknown manager `{manager}`")]
    DanglingManager { id: String, manager: String },
}

impl Anomaly {
    pub fn is_cycle(&self) -> bool {
        matches!(self, Anomaly::CycleDetected { .. })
    }
}
