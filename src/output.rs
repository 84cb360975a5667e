//! Formats query results for the CLI: pipe-separated fields, `NULL`
//! rendered as an empty field, one line per row.

use crate::value::Value;

fn field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Formats a single row as `field1|field2|...`.
pub fn format_row(row: &[Value]) -> String {
    row.iter().map(field).collect::<Vec<String>>().join("|")
}

/// Formats a full row set, one line per row.
pub fn format_rows(rows: &[Vec<Value>]) -> String {
    rows.iter()
        .map(|r| format_row(r))
        .collect::<Vec<String>>()
        .join("\n")
}
