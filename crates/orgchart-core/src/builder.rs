//! Tree construction: flat records → rooted tree.
//!
//! Only the subtree reachable from the effective root is materialized;
//! records outside it do not appear in the result at all. The walk keeps an
//! explicit stack and the set of ids on the current descent path, so a
//! manager cycle ends the descent at the repeated id instead of looping.
//! Cycles themselves are reported once, by [`RecordSet`], for the whole sheet.

use std::collections::HashSet;

use crate::config::ChartConfig;
use crate::error::{Anomaly, BuildError};
use crate::node::Node;
use crate::record::{Record, RecordSet};

/// A freshly built tree plus everything odd noticed while building it.
#[derive(Debug, Clone)]
pub struct BuiltTree {
    pub root: Node,
    pub anomalies: Vec<Anomaly>,
}

impl BuiltTree {
    pub fn cycles(&self) -> impl Iterator<Item = &Anomaly> {
        self.anomalies.iter().filter(|a| a.is_cycle())
    }

    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }
}

/// Build the tree rooted at `root_id`, or at the default root when `None`.
///
/// The default root is the first record (input order) without a manager.
/// Several such records yield [`Anomaly::AmbiguousRoot`], not an error.
/// The returned nodes carry no derived statistics yet; see
/// [`crate::derive::annotate`].
pub fn build(
    records: &RecordSet,
    root_id: Option<&str>,
    config: &ChartConfig,
) -> Result<BuiltTree, BuildError> {
    let mut anomalies = records.anomalies().to_vec();
    let root_idx = resolve_root(records, root_id, &mut anomalies)?;
    let root = materialize(records, root_idx, config);

    tracing::debug!(
        root = %root.id,
        nodes = root.len(),
        anomalies = anomalies.len(),
        "built tree"
    );

    Ok(BuiltTree { root, anomalies })
}

fn resolve_root(
    records: &RecordSet,
    root_id: Option<&str>,
    anomalies: &mut Vec<Anomaly>,
) -> Result<usize, BuildError> {
    if let Some(id) = root_id {
        return records.index_of(id).ok_or_else(|| BuildError::RootNotFound {
            id: id.to_string(),
        });
    }

    let candidates = records.root_candidates();
    let Some(&chosen) = candidates.first() else {
        return Err(BuildError::NoRootResolvable);
    };

    if candidates.len() > 1 {
        tracing::warn!(
            chosen = %chosen,
            candidates = candidates.len(),
            "multiple records without a manager; using the first"
        );
        anomalies.push(Anomaly::AmbiguousRoot {
            chosen: chosen.to_string(),
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
        });
    }

    records
        .index_of(chosen)
        .ok_or(BuildError::NoRootResolvable)
}

struct Frame<'r> {
    record: &'r Record,
    reports: std::slice::Iter<'r, usize>,
    children: Vec<Node>,
}

impl<'r> Frame<'r> {
    fn new(records: &'r RecordSet, idx: usize) -> Self {
        let record = records.record(idx);
        let reports = records.report_indices(&record.employee_id);
        Frame {
            record,
            reports: reports.iter(),
            children: Vec::with_capacity(reports.len()),
        }
    }

    fn into_node(self, config: &ChartConfig) -> Node {
        let mut node = Node::from_record(self.record, config);
        node.children = self.children;
        node
    }
}

fn materialize(
    records: &RecordSet,
    root_idx: usize,
    config: &ChartConfig,
) -> Node {
    let mut current = Frame::new(records, root_idx);
    let mut ancestors: Vec<Frame<'_>> = Vec::new();
    let mut on_path: HashSet<&str> = HashSet::from([current.record.employee_id.as_str()]);

    loop {
        if let Some(&child_idx) = current.reports.next() {
            let child_id = records.record(child_idx).employee_id.as_str();
            if on_path.contains(child_id) {
                // Already in `RecordSet::anomalies`.
                tracing::debug!(id = %child_id, depth = ancestors.len() + 1, "manager cycle; not descending again");
                continue;
            }

            on_path.insert(child_id);
            let parent = std::mem::replace(&mut current, Frame::new(records, child_idx));
            ancestors.push(parent);
            continue;
        }

        on_path.remove(current.record.employee_id.as_str());
        let node = current.into_node(config);
        match ancestors.pop() {
            Some(mut parent) => {
                parent.children.push(node);
                current = parent;
            }
            None => return node,
        }
    }
}
