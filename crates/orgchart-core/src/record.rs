//! Flat input rows and their normalized, indexed form.
//!
//! Spreadsheet exports type the same column inconsistently (an id may arrive
//! as `1042`, `1042.0` or `"1042"`), and manager lookups are exact string
//! matches, so every id is coerced to one canonical string form up front.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ChartConfig;
use crate::error::Anomaly;

// ============================================================================
// Raw values
// ============================================================================

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    #[default]
    Empty,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Natural string form, used wherever a cell becomes a lookup key.
    ///
    /// Integral floats drop their fraction so `1042.0` and `1042` agree.
    pub fn to_key(&self) -> String {
        match self {
            Scalar::Empty => String::new(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Integer(i) => i.to_string(),
            Scalar::Float(f) => {
                if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Scalar::Text(s) => s.clone(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Empty => true,
            Scalar::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_key())
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

/// One input row: column header → cell, in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRow {
    cells: Vec<(String, Scalar)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a cell; a repeated header overwrites the earlier value in place.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Scalar>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some((_, slot)) => *slot = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.cells.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<Scalar>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

// ============================================================================
// Normalized records
// ============================================================================

/// Manager reference after normalization.
///
/// `None` is the single "no manager" marker; it cannot collide with a real id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ManagerRef {
    None,
    Id(String),
}

impl ManagerRef {
    /// Blank cells, missing cells and the sentinel all mean "no manager".
    pub fn from_cell(cell: Option<&Scalar>, sentinel: &str) -> Self {
        match cell {
            None => ManagerRef::None,
            Some(v) if v.is_blank() => ManagerRef::None,
            Some(v) => {
                let key = v.to_key();
                if key == sentinel {
                    ManagerRef::None
                } else {
                    ManagerRef::Id(key)
                }
            }
        }
    }

    pub fn as_id(&self) -> Option<&str> {
        match self {
            ManagerRef::None => None,
            ManagerRef::Id(id) => Some(id),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ManagerRef::None)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub employee_id: String,
    pub display_name: String,
    pub manager: ManagerRef,
    /// The whole source row, including the core columns.
    pub fields: RawRow,
}

/// Coerce one raw row into a [`Record`]. Never fails: missing columns become
/// empty strings (or "no manager").
pub fn normalize(row: &RawRow, config: &ChartConfig) -> Record {
    let key = |column: &str| row.get(column).map(Scalar::to_key).unwrap_or_default();

    Record {
        employee_id: key(config.id_column.as_str()),
        display_name: key(config.name_column.as_str()),
        manager: ManagerRef::from_cell(
            row.get(&config.manager_column),
            &config.no_manager_sentinel,
        ),
        fields: row.clone(),
    }
}

// ============================================================================
// Indexed record set
// ============================================================================

/// Immutable, indexed view of one uploaded sheet.
///
/// Built once per data load; every tree build borrows it.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<Record>,
    /// id → index of the winning (last) record with that id
    by_id: HashMap<String, usize>,
    /// manager id → winning direct reports, in input order
    reports: HashMap<String, Vec<usize>>,
    /// every id referenced as a manager by any record
    managers: HashSet<String>,
    anomalies: Vec<Anomaly>,
}

impl RecordSet {
    pub fn new(records: Vec<Record>) -> Self {
        let mut by_id: HashMap<String, usize> = HashMap::with_capacity(records.len());
        let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
        for (idx, record) in records.iter().enumerate() {
            by_id.insert(record.employee_id.clone(), idx);
            *occurrences.entry(record.employee_id.as_str()).or_default() += 1;
        }

        let mut anomalies = Vec::new();
        for (id, count) in occurrences.into_iter().filter(|(_, n)| *n > 1) {
            tracing::warn!(id = %id, occurrences = count, "duplicate employee id; keeping the last row");
            anomalies.push(Anomaly::DuplicateIdentifier {
                id: id.to_string(),
                occurrences: count,
            });
        }

        let mut reports: HashMap<String, Vec<usize>> = HashMap::new();
        let mut managers = HashSet::new();
        for (idx, record) in records.iter().enumerate() {
            let Some(manager) = record.manager.as_id() else {
                continue;
            };
            managers.insert(manager.to_string());

            if by_id.get(&record.employee_id) != Some(&idx) {
                continue;
            }
            if by_id.contains_key(manager) {
                reports.entry(manager.to_string()).or_default().push(idx);
            } else {
                tracing::warn!(id = %record.employee_id, manager = %manager, "manager id matches no record");
                anomalies.push(Anomaly::DanglingManager {
                    id: record.employee_id.clone(),
                    manager: manager.to_string(),
                });
            }
        }

        anomalies.extend(manager_cycles(&records, &by_id));

        tracing::debug!(
            records = records.len(),
            unique_ids = by_id.len(),
            managers = managers.len(),
            "indexed record set"
        );

        Self {
            records,
            by_id,
            reports,
            managers,
            anomalies,
        }
    }

    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a RawRow>, config: &ChartConfig) -> Self {
        Self::new(rows.into_iter().map(|row| normalize(row, config)).collect())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub(crate) fn record(&self, idx: usize) -> &Record {
        &self.records[idx]
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// The record that owns `id` (the last one, if duplicated).
    pub fn get(&self, id: &str) -> Option<&Record> {
        self.index_of(id).map(|idx| &self.records[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub(crate) fn report_indices(&self, id: &str) -> &[usize] {
        self.reports.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Direct reports of `id`, in input order.
    pub fn direct_reports<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a Record> + 'a {
        self.report_indices(id)
            .iter()
            .map(move |&idx| &self.records[idx])
    }

    /// True iff any record names `id` as its manager.
    pub fn has_reports(&self, id: &str) -> bool {
        self.managers.contains(id)
    }

    /// Distinct ids of records without a manager, in input order.
    pub fn root_candidates(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| r.manager.is_none())
            .map(|r| r.employee_id.as_str())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// The root used when no explicit root is requested.
    pub fn default_root_id(&self) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.manager.is_none())
            .map(|r| r.employee_id.as_str())
    }

    /// Record-level anomalies: duplicate ids, dangling manager references
    /// and manager cycles, whether or not any root reaches them.
    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }
}

/// Follow every winning record's manager chain once and report each distinct
/// loop. The path starts and ends at the record where the loop closes.
fn manager_cycles(records: &[Record], by_id: &HashMap<String, usize>) -> Vec<Anomaly> {
    // 0 = not visited yet, otherwise 1 + the index the visiting walk started at
    let mut walk_of = vec![0usize; records.len()];
    let mut cycles = Vec::new();

    for start in 0..records.len() {
        if walk_of[start] != 0 || by_id.get(&records[start].employee_id) != Some(&start) {
            continue;
        }
        let walk = start + 1;
        let mut chain: Vec<usize> = Vec::new();
        let mut idx = start;
        loop {
            if walk_of[idx] != 0 {
                if walk_of[idx] == walk {
                    let from = chain.iter().position(|&i| i == idx).unwrap_or(0);
                    let id = records[idx].employee_id.clone();
                    let mut path: Vec<String> = chain[from..]
                        .iter()
                        .map(|&i| records[i].employee_id.clone())
                        .collect();
                    path.push(id.clone());
                    tracing::warn!(id = %id, length = path.len() - 1, "manager cycle");
                    cycles.push(Anomaly::CycleDetected { id, path });
                }
                break;
            }
            walk_of[idx] = walk;
            chain.push(idx);
            match records[idx].manager.as_id().and_then(|m| by_id.get(m)) {
                Some(&next) => idx = next,
                None => break,
            }
        }
    }
    cycles
}
