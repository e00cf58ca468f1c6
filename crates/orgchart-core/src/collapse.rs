//! Collapse projection: hide the children of selected nodes.

use std::collections::BTreeSet;

use crate::node::Node;

/// Ids whose children are hidden from view.
pub type CollapseSet = BTreeSet<String>;

/// Mark collapsed nodes and drop their children, pre-order.
///
/// Destructive: descendants of a collapsed node are gone from this tree, so
/// always project onto a freshly built and annotated tree. Derived counts
/// are left untouched, which is what keeps a collapsed node's
/// `descendant_count` meaningful.
pub fn project(root: &mut Node, collapsed: &CollapseSet) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        node.is_collapsed = collapsed.contains(&node.id);
        if node.is_collapsed {
            node.children.clear();
        } else {
            stack.extend(node.children.iter_mut());
        }
    }
}
