//! Text rendering of a built tree.
//!
//! This is presentation only: it reads `Node` fields and never changes them.

use std::sync::OnceLock;

use colored::Colorize;
use orgchart_core::{ChartConfig, Node, Scalar};
use regex::Regex;

/// Leading cost-center style codes: `1234 - Finance` → `Finance`.
fn code_prefix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{3,}[ _-]?").expect("static pattern"))
}

/// Display form of an attribute value: blanks become `-` and numeric code
/// prefixes are dropped from text.
pub fn clean_value(value: &Scalar) -> String {
    match value {
        v if v.is_blank() => "-".to_string(),
        Scalar::Text(s) => {
            let cleaned = code_prefix().replace(s, "");
            let cleaned = cleaned.trim().trim_start_matches('-').trim();
            if cleaned.is_empty() {
                "-".to_string()
            } else {
                cleaned.to_string()
            }
        }
        other => other.to_key(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub color: bool,
}

/// One line for `node`, without tree connectors.
pub fn node_label(node: &Node, config: &ChartConfig, style: TextStyle) -> String {
    let mut parts: Vec<String> = Vec::new();

    let name = if node.name.is_empty() { "(unnamed)" } else { node.name.as_str() };
    let head = format!("{name} ({})", node.id);
    parts.push(if style.color { head.bold().to_string() } else { head });

    if node.has_children {
        let count = match node.descendant_count {
            1 => "1 report".to_string(),
            n => format!("{n} reports"),
        };
        parts.push(if style.color { count.dimmed().to_string() } else { count });
    }

    for field in config.annotation_fields() {
        if let Some(value) = node.attribute(field) {
            parts.push(format!("{field}: {}", clean_value(value)));
        }
    }

    let mut line = parts.join(" · ");
    if node.is_collapsed {
        let marker = "[+]";
        line.push(' ');
        line.push_str(&if style.color { marker.yellow().bold().to_string() } else { marker.to_string() });
    }
    line
}

/// Render the whole tree with box-drawing connectors.
pub fn render_text(root: &Node, config: &ChartConfig, style: TextStyle) -> String {
    let mut out = String::new();
    out.push_str(&node_label(root, config, style));
    out.push('\n');

    // (node, connector prefix, is last sibling)
    let mut stack: Vec<(&Node, String, bool)> = root
        .children
        .iter()
        .enumerate()
        .rev()
        .map(|(i, child)| (child, String::new(), i + 1 == root.children.len()))
        .collect();

    while let Some((node, prefix, is_last)) = stack.pop() {
        let connector = if is_last { "└─ " } else { "├─ " };
        out.push_str(&prefix);
        out.push_str(connector);
        out.push_str(&node_label(node, config, style));
        out.push('\n');

        let child_prefix = format!("{prefix}{}", if is_last { "   " } else { "│  " });
        let n = node.children.len();
        for (i, child) in node.children.iter().enumerate().rev() {
            stack.push((child, child_prefix.clone(), i + 1 == n));
        }
    }
    out
}
