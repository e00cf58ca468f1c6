//! Tree vertices handed to renderers.

use serde::Serialize;

use crate::config::ChartConfig;
use crate::record::{Record, Scalar};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: Scalar,
}

/// One employee in a built tree.
///
/// Renderers read these fields but never write them. A rebuild produces an
/// entirely new tree, so holding on to a `Node` across state changes is
/// meaningless; look nodes up again by id.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Direct reports, in input order. Empty when collapsed.
    pub children: Vec<Node>,
    /// Someone in the full data set reports to this node.
    pub has_children: bool,
    /// Size of the subtree below this node as built (before collapsing).
    pub descendant_count: usize,
    pub is_collapsed: bool,
}

impl Node {
    /// A bare node for `record`, carrying the configured attribute columns.
    pub fn from_record(record: &Record, config: &ChartConfig) -> Self {
        let attributes = if config.attribute_fields.is_empty() {
            record
                .fields
                .iter()
                .filter(|(column, _)| !config.is_core_column(column))
                .map(|(column, value)| Attribute {
                    name: column.to_string(),
                    value: value.clone(),
                })
                .collect()
        } else {
            config
                .attribute_fields
                .iter()
                .map(|column| Attribute {
                    name: column.clone(),
                    value: record.fields.get(column).cloned().unwrap_or_default(),
                })
                .collect()
        };

        Node {
            id: record.employee_id.clone(),
            name: record.display_name.clone(),
            attributes,
            ..Node::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Scalar> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
    }

    /// Pre-order walk over this node and everything currently below it.
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Number of nodes currently in this tree (self included).
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        self.iter().find(|n| n.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Node> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter_mut().rev());
        }
        None
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
