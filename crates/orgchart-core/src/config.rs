//! Column mapping and display field selection.
//!
//! Header names are a concern of whoever produced the spreadsheet, so nothing
//! in the engine hard-codes them; everything reads through [`ChartConfig`].

use serde::{Deserialize, Serialize};

pub const DEFAULT_NO_MANAGER_SENTINEL: &str = "NO_MANAGER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Column holding the unique employee identifier
    pub id_column: String,
    /// Column holding the manager's employee identifier
    pub manager_column: String,
    /// Column holding the name shown on each node
    pub name_column: String,
    /// Manager value meaning "top of hierarchy"
    pub no_manager_sentinel: String,
    /// Columns copied onto each node, in display order.
    ///
    /// Empty means "every column except the id/manager/name columns".
    pub attribute_fields: Vec<String>,
    /// Subset of `attribute_fields` renderers annotate nodes with
    pub visible_fields: Vec<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            id_column: "User/Employee ID".to_string(),
            manager_column: "Manager User Sys ID".to_string(),
            name_column: "Display Name".to_string(),
            no_manager_sentinel: DEFAULT_NO_MANAGER_SENTINEL.to_string(),
            attribute_fields: [
                "Position Title_1",
                "Country/Region",
                "Company",
                "Location",
                "Functional Area / Department",
                "Career Level",
                "Job Classification",
                "Job Grade",
                "Division",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            visible_fields: [
                "Functional Area / Department",
                "Company",
                "Country/Region",
                "Location",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
        }
    }
}

impl ChartConfig {
    /// True for the three columns the engine reads directly.
    pub fn is_core_column(&self, column: &str) -> bool {
        column == self.id_column || column == self.manager_column || column == self.name_column
    }

    /// Whether a column is copied onto nodes as an attribute.
    pub fn retains(&self, column: &str) -> bool {
        if self.attribute_fields.is_empty() {
            !self.is_core_column(column)
        } else {
            self.attribute_fields.iter().any(|f| f == column)
        }
    }

    /// Visible fields that are actually retained on nodes.
    pub fn annotation_fields(&self) -> impl Iterator<Item = &str> {
        self.visible_fields
            .iter()
            .map(String::as_str)
            .filter(|f| self.retains(f))
    }
}
