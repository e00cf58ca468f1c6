//! CSV exports: a header row followed by one row per employee.

use std::io::Read;

use anyhow::{Context, Result};
use orgchart_core::{RawRow, Scalar};

use crate::encoding::repair_mojibake;

pub fn rows_from_csv<R: Read>(reader: R) -> Result<Vec<RawRow>> {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = csv
        .headers()
        .context("reading CSV header row")?
        .iter()
        .map(|h| repair_mojibake(h).into_owned())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in csv.records().enumerate() {
        let record = record.with_context(|| format!("reading CSV row {}", idx + 2))?;
        if record.len() > headers.len() {
            tracing::warn!(
                row = idx + 2,
                cells = record.len(),
                columns = headers.len(),
                "extra cells beyond the header row ignored"
            );
        }

        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                let cell = match record.get(col) {
                    None | Some("") => Scalar::Empty,
                    Some(text) => Scalar::Text(repair_mojibake(text).into_owned()),
                };
                (header.clone(), cell)
            })
            .collect();
        rows.push(row);
    }
    Ok(rows)
}
