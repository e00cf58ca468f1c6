//! Per-node statistics, computed post-order over the un-pruned tree.

use crate::node::Node;
use crate::record::RecordSet;

struct Pending {
    node: Node,
    rest: std::vec::IntoIter<Node>,
    done: Vec<Node>,
    descendants: usize,
}

impl Pending {
    fn new(mut node: Node) -> Self {
        let children = std::mem::take(&mut node.children);
        Pending {
            done: Vec::with_capacity(children.len()),
            rest: children.into_iter(),
            node,
            descendants: 0,
        }
    }

    fn finish(self, records: &RecordSet) -> Node {
        let mut node = self.node;
        node.children = self.done;
        node.descendant_count = self.descendants;
        node.has_children = records.has_reports(&node.id);
        node
    }
}

/// Fill in `has_children` and `descendant_count` for every node under `root`.
///
/// `has_children` looks at the full record set, not at the materialized
/// children, so it stays true for a node whose reports were cut off by the
/// cycle guard. Must run before [`crate::collapse::project`].
pub fn annotate(root: &mut Node, records: &RecordSet) {
    let tree = std::mem::take(root);
    *root = annotate_owned(tree, records);
}

fn annotate_owned(root: Node, records: &RecordSet) -> Node {
    let mut current = Pending::new(root);
    let mut ancestors: Vec<Pending> = Vec::new();

    loop {
        if let Some(child) = current.rest.next() {
            let parent = std::mem::replace(&mut current, Pending::new(child));
            ancestors.push(parent);
            continue;
        }

        let node = current.finish(records);
        match ancestors.pop() {
            Some(mut parent) => {
                parent.descendants += 1 + node.descendant_count;
                parent.done.push(node);
                current = parent;
            }
            None => return node,
        }
    }
}
