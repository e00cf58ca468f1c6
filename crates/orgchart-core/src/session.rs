//! Caller-side view state and the rebuild pipeline.
//!
//! [`rebuild`] is the whole engine in one call: build → annotate → project.
//! [`ViewState`] is the explicit state threaded into it, and [`OrgChart`]
//! bundles one loaded sheet with its view state for interactive front ends.

use crate::builder::{build, BuiltTree};
use crate::collapse::{project, CollapseSet};
use crate::config::ChartConfig;
use crate::derive::annotate;
use crate::error::BuildError;
use crate::record::{RawRow, RecordSet};
use crate::zoom::ZoomState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub collapsed: CollapseSet,
    pub zoom: ZoomState,
}

impl ViewState {
    /// Flip `id` in the collapse set. Nodes nobody reports to are left alone.
    pub fn toggle_collapse(&mut self, id: &str, records: &RecordSet) -> bool {
        if !records.has_reports(id) {
            return false;
        }
        if !self.collapsed.remove(id) {
            self.collapsed.insert(id.to_string());
        }
        true
    }

    pub fn zoom_in(&mut self, id: &str, records: &RecordSet) -> bool {
        self.zoom.zoom_in(id, records.default_root_id())
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom.zoom_out()
    }

    /// Back to the default root, with everything expanded.
    ///
    /// Clearing the collapse set here is a front-end policy; the zoom
    /// controller itself only resets zoom history.
    pub fn reset_to_root(&mut self) {
        self.zoom.reset();
        self.collapsed.clear();
    }
}

/// Build, annotate and project a fresh tree for `view`.
pub fn rebuild(
    records: &RecordSet,
    view: &ViewState,
    config: &ChartConfig,
) -> Result<BuiltTree, BuildError> {
    let mut tree = build(records, view.zoom.current_root(), config)?;
    annotate(&mut tree.root, records);
    project(&mut tree.root, &view.collapsed);
    Ok(tree)
}

/// Interaction hints for one rendered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeControls {
    /// The node is the explicitly zoomed root.
    pub is_zoomed_root: bool,
    /// Offer "zoom in" (every node except the displayed root).
    pub show_zoom_in: bool,
    /// Offer "zoom out" (only on the zoomed root, with history to return to).
    pub can_zoom_out: bool,
    pub is_collapsed: bool,
}

/// One loaded sheet plus the view state of whoever is looking at it.
#[derive(Debug, Clone, Default)]
pub struct OrgChart {
    records: RecordSet,
    config: ChartConfig,
    view: ViewState,
}

impl OrgChart {
    pub fn new(records: RecordSet, config: ChartConfig) -> Self {
        Self {
            records,
            config,
            view: ViewState::default(),
        }
    }

    pub fn from_rows(rows: &[RawRow], config: ChartConfig) -> Self {
        let records = RecordSet::from_rows(rows, &config);
        Self::new(records, config)
    }

    /// Replace the data. Collapse and zoom state belong to the old data and
    /// are dropped.
    pub fn load(&mut self, rows: &[RawRow]) {
        self.records = RecordSet::from_rows(rows, &self.config);
        self.view = ViewState::default();
    }

    pub fn records(&self) -> &RecordSet {
        &self.records
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// The root currently displayed, if any can be resolved.
    pub fn effective_root(&self) -> Option<&str> {
        self.view
            .zoom
            .effective_root(self.records.default_root_id())
    }

    /// Rebuild the displayed tree.
    ///
    /// A zoomed root that no longer exists falls back to the default root
    /// rather than failing.
    pub fn tree(&self) -> Result<BuiltTree, BuildError> {
        match rebuild(&self.records, &self.view, &self.config) {
            Err(BuildError::RootNotFound { id }) => {
                tracing::warn!(id = %id, "zoomed root not found; showing default root");
                let fallback = ViewState {
                    collapsed: self.view.collapsed.clone(),
                    zoom: ZoomState::default(),
                };
                rebuild(&self.records, &fallback, &self.config)
            }
            other => other,
        }
    }

    pub fn toggle_collapse(&mut self, id: &str) -> bool {
        let changed = self.view.toggle_collapse(id, &self.records);
        tracing::debug!(id = %id, changed, collapsed = self.view.collapsed.len(), "toggle collapse");
        changed
    }

    pub fn zoom_in(&mut self, id: &str) -> bool {
        let changed = self.view.zoom_in(id, &self.records);
        tracing::debug!(id = %id, changed, depth = self.view.zoom.back_stack().len(), "zoom in");
        changed
    }

    pub fn zoom_out(&mut self) -> bool {
        let changed = self.view.zoom_out();
        tracing::debug!(changed, root = ?self.view.zoom.current_root(), "zoom out");
        changed
    }

    pub fn reset_to_root(&mut self) {
        self.view.reset_to_root();
    }

    pub fn controls(&self, id: &str) -> NodeControls {
        let is_zoomed_root = self.view.zoom.current_root() == Some(id);
        let is_displayed_root = self.effective_root() == Some(id);
        NodeControls {
            is_zoomed_root,
            show_zoom_in: !is_displayed_root,
            can_zoom_out: is_zoomed_root && self.view.zoom.can_zoom_out(),
            is_collapsed: self.view.collapsed.contains(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Scalar;

    fn staff_rows() -> Vec<RawRow> {
        let cfg = ChartConfig::default();
        [
            ("1", "NO_MANAGER", "Alice"),
            ("2", "1", "Bob"),
            ("3", "1", "Carol"),
            ("4", "2", "Dan"),
        ]
        .iter()
        .map(|(id, mgr, name)| {
            [
                (cfg.id_column.as_str(), Scalar::from(*id)),
                (cfg.manager_column.as_str(), Scalar::from(*mgr)),
                (cfg.name_column.as_str(), Scalar::from(*name)),
            ]
            .into_iter()
            .collect()
        })
        .collect()
    }

    fn chart() -> OrgChart {
        OrgChart::from_rows(&staff_rows(), ChartConfig::default())
    }

    #[test]
    fn collapsing_bob_hides_dan_but_keeps_counts() {
        let mut chart = chart();
        assert!(chart.toggle_collapse("2"));

        let root = chart.tree().unwrap().root;
        let bob = root.find("2").unwrap();
        assert!(bob.is_collapsed);
        assert!(bob.children.is_empty());
        assert_eq!(bob.descendant_count, 1);
        assert_eq!(root.descendant_count, 3);

        assert!(chart.toggle_collapse("2"));
        let root = chart.tree().unwrap().root;
        assert_eq!(root.find("2").unwrap().children.len(), 1);
    }

    #[test]
    fn toggling_a_leaf_is_a_no_op() {
        let mut chart = chart();
        assert!(!chart.toggle_collapse("3"));
        assert!(chart.view().collapsed.is_empty());
    }

    #[test]
    fn zoom_into_bob_shows_only_his_subtree() {
        let mut chart = chart();
        assert!(chart.zoom_in("2"));

        let root = chart.tree().unwrap().root;
        assert_eq!(root.name, "Bob");
        assert_eq!(root.len(), 2);
        assert!(root.find("1").is_none());
        assert!(root.find("3").is_none());

        assert!(chart.zoom_out());
        assert_eq!(chart.tree().unwrap().root.name, "Alice");
    }

    #[test]
    fn zooming_into_default_root_is_rejected() {
        let mut chart = chart();
        assert!(!chart.zoom_in("1"));
        assert!(!chart.view().zoom.can_zoom_out());
    }

    #[test]
    fn controls_follow_zoom_state() {
        let mut chart = chart();
        assert_eq!(
            chart.controls("1"),
            NodeControls {
                is_zoomed_root: false,
                show_zoom_in: false,
                can_zoom_out: false,
                is_collapsed: false,
            }
        );
        assert!(chart.controls("2").show_zoom_in);

        chart.zoom_in("2");
        let bob = chart.controls("2");
        assert!(bob.is_zoomed_root);
        assert!(bob.can_zoom_out);
        assert!(!bob.show_zoom_in);
        assert!(chart.controls("4").show_zoom_in);
    }

    #[test]
    fn reset_clears_zoom_and_collapse() {
        let mut chart = chart();
        chart.toggle_collapse("2");
        chart.zoom_in("2");
        chart.reset_to_root();
        assert_eq!(chart.view(), &ViewState::default());
    }

    #[test]
    fn missing_zoomed_root_falls_back_to_default() {
        let mut chart = chart();
        chart.zoom_in("4");
        chart.load(&staff_rows()[..3]);
        assert_eq!(chart.view(), &ViewState::default());

        let mut view = ViewState::default();
        view.zoom.zoom_in("4", Some("1"));
        let chart = OrgChart {
            view,
            ..chart
        };
        assert_eq!(chart.tree().unwrap().root.name, "Alice");
        assert_eq!(
            rebuild(chart.records(), chart.view(), chart.config()).unwrap_err(),
            BuildError::RootNotFound { id: "4".to_string() }
        );
    }
}
