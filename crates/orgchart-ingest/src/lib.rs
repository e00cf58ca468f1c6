//! Spreadsheet export ingestion for org charts
//!
//! Reads what a spreadsheet tool produces and hands the engine plain rows:
//! - XLSX/XLS: the first worksheet of a workbook, header row first
//! - JSON: an array of row objects (sheet-to-JSON output)
//! - CSV: header row + one row per employee
//!
//! Column headers and string cells pass through [`repair_mojibake`], since
//! exports of non-ASCII names are frequently double-decoded.

pub mod csv_rows;
pub mod encoding;
pub mod json;
pub mod workbook;

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use orgchart_core::RawRow;

pub use encoding::repair_mojibake;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Workbook,
    Json,
    Csv,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xls" => Ok(Self::Workbook),
            other => Err(anyhow!(
                "{}: unknown sheet format `{other}` (expected xlsx|xls|csv|json)",
                path.display()
            )),
        }
    }
}

/// Load every row of an exported sheet.
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>> {
    let format = SheetFormat::from_path(path)?;
    let rows = match format {
        SheetFormat::Workbook => workbook::rows_from_workbook(path)
            .with_context(|| format!("reading workbook {}", path.display()))?,
        SheetFormat::Json => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            json::rows_from_json_str(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        SheetFormat::Csv => {
            let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
            csv_rows::rows_from_csv(file).with_context(|| format!("parsing {}", path.display()))?
        }
    };
    tracing::debug!(path = %path.display(), rows = rows.len(), ?format, "loaded sheet");
    Ok(rows)
}

/// Display title for a sheet: the file name without its spreadsheet extension.
pub fn chart_title(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.rsplit_once('.') {
        Some((stem, ext))
            if ["xlsx", "xlsm", "xls", "csv", "json"]
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known)) =>
        {
            stem.to_string()
        }
        _ => name,
    }
}
