//! Excel workbooks: the first worksheet, header row first.
//!
//! Blank rows are skipped and blank cells become [`Scalar::Empty`], which is
//! what a sheet-to-JSON export with empty-cell defaults would produce.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use orgchart_core::{RawRow, Scalar};

use crate::encoding::repair_mojibake;

pub fn rows_from_workbook(path: &Path) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet = workbook.sheet_names().first().cloned().unwrap_or_default();
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| anyhow!("workbook has no worksheets"))?
        .with_context(|| format!("reading worksheet `{sheet}`"))?;

    let mut lines = range.rows();
    let Some(header_cells) = lines.next() else {
        tracing::warn!(sheet = %sheet, "first worksheet is empty");
        return Ok(Vec::new());
    };
    let headers: Vec<String> = header_cells
        .iter()
        .map(|cell| repair_mojibake(cell.to_string().trim()).into_owned())
        .collect();
    if headers.iter().any(String::is_empty) {
        tracing::warn!(sheet = %sheet, "columns without a header ignored");
    }

    let mut rows = Vec::new();
    for cells in lines {
        if cells.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let row: RawRow = headers
            .iter()
            .zip(cells)
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.clone(), cell_to_scalar(cell)))
            .collect();
        rows.push(row);
    }
    tracing::debug!(sheet = %sheet, rows = rows.len(), columns = headers.len(), "read worksheet");
    Ok(rows)
}

fn cell_to_scalar(cell: &Data) -> Scalar {
    match cell {
        Data::Empty => Scalar::Empty,
        Data::Bool(b) => Scalar::Bool(*b),
        Data::Int(i) => Scalar::Integer(*i),
        Data::Float(f) => number(*f),
        Data::String(s) if s.is_empty() => Scalar::Empty,
        Data::String(s) => Scalar::Text(repair_mojibake(s).into_owned()),
        Data::DateTime(dt) => Scalar::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Scalar::Text(s.clone()),
        Data::Error(e) => Scalar::Text(e.to_string()),
    }
}

/// Workbooks store every number as a double; whole ones are ids and counts.
fn number(f: f64) -> Scalar {
    if f.fract() == 0.0 && f.abs() < 9.0e15 {
        Scalar::Integer(f as i64)
    } else {
        Scalar::Float(f)
    }
}
