//! Cell-level helpers for sheet-like rows.
//!
//! A cell is whatever a spreadsheet can hold: a number, a piece of text or
//! nothing. `serde_json::Value` covers all three and serializes naturally.

use serde_json::Value;

pub type Cell = Value;
pub type Row = Vec<Cell>;

/// Render a cell as text. Empty cells become `""`.
pub fn cell_text(cell: &Cell) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Cell at `column`, or an empty cell when the row is short.
pub fn cell_at(row: &[Cell], column: usize) -> &Cell {
    row.get(column).unwrap_or(&Value::Null)
}

/// Integer reading of a cell with leading-integer semantics:
/// `"12abc"` is 12, `12.9` is 12, `"abc"` and empty cells are 0.
pub fn cell_int(cell: &Cell) -> i64 {
    match cell {
        Value::Number(n) => match n.as_i64() {
            Some(v) => v,
            None => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
                .unwrap_or(0),
        },
        Value::String(s) => leading_int(s).unwrap_or(0),
        _ => 0,
    }
}

/// Parses the integer prefix of `text`, skipping leading whitespace.
/// Returns `None` when no digit follows the optional sign.
pub fn leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen = true;
        value = value.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }

    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}
