//! Sheet-to-JSON exports: an array of `{ "Column": value, ... }` objects.

use anyhow::{anyhow, Result};
use orgchart_core::{RawRow, Scalar};
use serde_json::Value;

use crate::encoding::repair_mojibake;

pub fn rows_from_json_str(text: &str) -> Result<Vec<RawRow>> {
    let value: Value = serde_json::from_str(text)?;
    rows_from_json(&value)
}

pub fn rows_from_json(value: &Value) -> Result<Vec<RawRow>> {
    let Value::Array(items) = value else {
        return Err(anyhow!("expected a JSON array of row objects"));
    };

    let mut rows: Vec<RawRow> = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let Value::Object(obj) = item else {
            tracing::warn!(row = idx, "skipping non-object row");
            continue;
        };
        rows.push(
            obj.iter()
                .map(|(column, cell)| (repair_mojibake(column).into_owned(), cell_to_scalar(cell)))
                .collect(),
        );
    }
    Ok(rows)
}

fn cell_to_scalar(cell: &Value) -> Scalar {
    match cell {
        Value::Null => Scalar::Empty,
        Value::Bool(b) => Scalar::Bool(*b),
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Scalar::Integer(i),
            // Past i64::MAX; the exact digits are the key.
            (None, Some(_)) => Scalar::Text(n.to_string()),
            (None, None) => n.as_f64().map(Scalar::Float).unwrap_or_default(),
        },
        Value::String(s) => Scalar::Text(repair_mojibake(s).into_owned()),
        // Nested values have no cell equivalent; keep them readable.
        other => Scalar::Text(other.to_string()),
    }
}
