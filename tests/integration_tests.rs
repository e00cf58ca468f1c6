//! Integration tests for the complete org chart pipeline
//!
//! These tests run exported sheets end to end:
//! - XLSX/CSV/JSON file → rows → records → tree
//! - collapse and zoom through `OrgChart`
//! - anomaly reporting on malformed hierarchies
//!
//! Run with: cargo test --test integration_tests

use std::fs;
use std::path::PathBuf;

use orgchart_core::{Anomaly, BuildError, ChartConfig, OrgChart};
use orgchart_ingest::load_rows;
use tempfile::{tempdir, TempDir};

fn write_sheet(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn chart_from(name: &str, contents: &str) -> OrgChart {
    let (_dir, path) = write_sheet(name, contents);
    let rows = load_rows(&path).expect("sheet should load");
    OrgChart::from_rows(&rows, ChartConfig::default())
}

const STAFF_CSV: &str = "\
User/Employee ID,Display Name,Manager User Sys ID,Company,Location
1,Alice,NO_MANAGER,Acme,Lisbon
2,Bob,1,Acme,Porto
3,Carol,1,Acme,
4,Dan,2,Acme,Porto
";

// ============================================================================
// Build + derive
// ============================================================================

#[test]
fn test_csv_sheet_builds_the_reporting_tree() {
    let chart = chart_from("staff.csv", STAFF_CSV);
    let tree = chart.tree().unwrap();
    assert!(tree.is_clean());

    let alice = &tree.root;
    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.descendant_count, 3);
    assert!(alice.has_children);

    let bob = alice.find("2").unwrap();
    assert_eq!(bob.children.len(), 1);
    assert_eq!(bob.children[0].name, "Dan");
    assert_eq!(bob.descendant_count, 1);

    let carol = alice.find("3").unwrap();
    assert!(carol.children.is_empty());
    assert_eq!(carol.descendant_count, 0);
    assert!(!carol.has_children);
}

#[test]
fn test_xlsx_workbook_builds_the_same_tree_as_csv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Org 2024.xlsx");
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    for (row, line) in STAFF_CSV.lines().enumerate() {
        for (col, cell) in line.split(',').enumerate() {
            let (row, col) = (row as u32, col as u16);
            match cell.parse::<f64>() {
                Ok(n) => sheet.write_number(row, col, n).unwrap(),
                Err(_) if cell.is_empty() => continue,
                Err(_) => sheet.write_string(row, col, cell).unwrap(),
            };
        }
    }
    workbook.save(&path).unwrap();

    let chart = OrgChart::from_rows(&load_rows(&path).unwrap(), ChartConfig::default());
    assert_eq!(orgchart_ingest::chart_title(&path), "Org 2024");
    assert_eq!(
        chart.tree().unwrap().root,
        chart_from("staff.csv", STAFF_CSV).tree().unwrap().root
    );
}

#[test]
fn test_json_sheet_links_numeric_and_text_ids() {
    let chart = chart_from(
        "staff.json",
        r#"[
            {"User/Employee ID": 1, "Display Name": "Alice", "Manager User Sys ID": ""},
            {"User/Employee ID": 2, "Display Name": "Bob", "Manager User Sys ID": 1.0},
            {"User/Employee ID": "3", "Display Name": "Carol", "Manager User Sys ID": "1"},
            {"User/Employee ID": 4.0, "Display Name": "Dan", "Manager User Sys ID": 2}
        ]"#,
    );
    let root = chart.tree().unwrap().root;
    assert_eq!(root.len(), 4);
    assert_eq!(root.find("4").map(|n| n.name.as_str()), Some("Dan"));
}

#[test]
fn test_node_attributes_follow_config() {
    let chart = chart_from("staff.csv", STAFF_CSV);
    let root = chart.tree().unwrap().root;
    let carol = root.find("3").unwrap();

    let names: Vec<&str> = carol.attributes.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ChartConfig::default().attribute_fields);
    assert!(carol.attribute("Location").unwrap().is_blank());
    assert_eq!(carol.attribute("Company").unwrap().to_key(), "Acme");
}

#[test]
fn test_mojibake_names_are_repaired() {
    let chart = chart_from(
        "staff.csv",
        "User/Employee ID,Display Name,Manager User Sys ID\n1,JoÃ£o,NO_MANAGER\n",
    );
    assert_eq!(chart.tree().unwrap().root.name, "João");
}

// ============================================================================
// Collapse + zoom
// ============================================================================

#[test]
fn test_collapse_then_expand_restores_the_subtree() {
    let mut chart = chart_from("staff.csv", STAFF_CSV);
    let original = chart.tree().unwrap().root;

    assert!(chart.toggle_collapse("2"));
    let collapsed = chart.tree().unwrap().root;
    let bob = collapsed.find("2").unwrap();
    assert!(bob.is_collapsed);
    assert!(bob.children.is_empty());
    assert_eq!(bob.descendant_count, 1);
    assert_eq!(collapsed.len(), 3);

    assert!(chart.toggle_collapse("2"));
    assert_eq!(chart.tree().unwrap().root, original);
}

#[test]
fn test_zoom_into_bob_hides_everyone_else() {
    let mut chart = chart_from("staff.csv", STAFF_CSV);
    assert!(chart.zoom_in("2"));

    let root = chart.tree().unwrap().root;
    assert_eq!(root.name, "Bob");
    let ids: Vec<&str> = root.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "4"]);

    assert!(chart.controls("2").can_zoom_out);
    assert!(chart.zoom_out());
    assert_eq!(chart.tree().unwrap().root.name, "Alice");
    assert!(!chart.zoom_out());
}

#[test]
fn test_collapse_survives_zoom() {
    let mut chart = chart_from("staff.csv", STAFF_CSV);
    chart.toggle_collapse("2");
    chart.zoom_in("2");

    let root = chart.tree().unwrap().root;
    assert!(root.is_collapsed);
    assert_eq!(root.len(), 1);
    assert_eq!(root.descendant_count, 1);

    chart.reset_to_root();
    assert_eq!(chart.tree().unwrap().root.len(), 4);
}

#[test]
fn test_loading_new_data_resets_the_view() {
    let mut chart = chart_from("staff.csv", STAFF_CSV);
    chart.zoom_in("2");
    chart.toggle_collapse("1");

    let (_dir, path) = write_sheet(
        "other.csv",
        "User/Employee ID,Display Name,Manager User Sys ID\n10,Zoe,\n11,Yan,10\n",
    );
    chart.load(&load_rows(&path).unwrap());
    let root = chart.tree().unwrap().root;
    assert_eq!(root.name, "Zoe");
    assert_eq!(root.descendant_count, 1);
}

// ============================================================================
// Anomalies
// ============================================================================

#[test]
fn test_cycle_is_reported_not_looped() {
    let chart = chart_from(
        "loop.csv",
        "User/Employee ID,Display Name,Manager User Sys ID\nA,Ann,B\nB,Ben,A\n",
    );
    assert_eq!(chart.tree().unwrap_err(), BuildError::NoRootResolvable);

    let mut chart = chart;
    assert!(chart.zoom_in("A"));
    let tree = chart.tree().unwrap();
    assert_eq!(tree.root.len(), 2);
    assert!(tree.cycles().any(|a| matches!(a, Anomaly::CycleDetected { id, .. } if id == "A")));
}

#[test]
fn test_cycle_outside_the_displayed_tree_is_still_reported() {
    let chart = chart_from(
        "island.csv",
        "\
User/Employee ID,Display Name,Manager User Sys ID
1,Alice,NO_MANAGER
2,Bob,1
3,Carol,4
4,Dan,3
",
    );
    let tree = chart.tree().unwrap();
    assert_eq!(tree.root.len(), 2);
    assert!(!tree.is_clean());
    let cycles: Vec<&Anomaly> = tree.cycles().collect();
    assert_eq!(
        cycles,
        vec![&Anomaly::CycleDetected {
            id: "3".to_string(),
            path: vec!["3".to_string(), "4".to_string(), "3".to_string()],
        }]
    );
}

#[test]
fn test_data_quality_anomalies_ride_along() {
    let chart = chart_from(
        "messy.csv",
        "\
User/Employee ID,Display Name,Manager User Sys ID
1,Alice,NO_MANAGER
9,Nine,
2,Bob,1
2,Bobby,1
3,Carol,404
",
    );
    let tree = chart.tree().unwrap();
    assert_eq!(tree.root.name, "Alice");
    assert_eq!(tree.root.find("2").unwrap().name, "Bobby");
    assert_eq!(tree.root.len(), 2);

    let kinds: Vec<&str> = tree
        .anomalies
        .iter()
        .map(|a| match a {
            Anomaly::AmbiguousRoot { .. } => "ambiguous",
            Anomaly::CycleDetected { .. } => "cycle",
            Anomaly::DuplicateIdentifier { .. } => "duplicate",
            Anomaly::DanglingManager { .. } => "dangling",
        })
        .collect();
    assert!(kinds.contains(&"ambiguous"));
    assert!(kinds.contains(&"duplicate"));
    assert!(kinds.contains(&"dangling"));

    let json = serde_json::to_value(&tree.anomalies).unwrap();
    assert!(json
        .as_array()
        .unwrap()
        .iter()
        .any(|a| a["kind"] == "ambiguous_root" && a["chosen"] == "1"));
}
