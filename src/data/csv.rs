//! CSV loading for training data.
//!
//! Supported format:
//! - UTF-8, comma-separated
//! - Optional header row (auto-detected: first row is a header if it contains
//!   any non-numeric, non-empty cell)
//! - Double-quoted fields with embedded commas are handled correctly
//! - The last column is the target value; everything before it is a feature.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub struct CsvParseError(pub String);

impl fmt::Display for CsvParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for CsvParseError {}

/// Parses CSV text into `(inputs, targets)`.
pub fn parse_csv(text: &str) -> Result<(Vec<Vec<f64>>, Vec<f64>), CsvParseError> {
    let mut lines = text.lines().peekable();

    // Auto-detect header: skip first line if any cell is non-numeric.
    if let Some(first) = lines.peek() {
        if is_header(first) {
            lines.next();
        }
    }

    let mut inputs: Vec<Vec<f64>> = Vec::new();
    let mut targets: Vec<f64> = Vec::new();

    for (row_idx, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells = parse_csv_row(line);
        if cells.is_empty() {
            continue;
        }
        if cells.len() < 2 {
            return Err(CsvParseError(format!(
                "Row {}: expected at least 2 columns (features + target), got {}",
                row_idx + 1,
                cells.len()
            )));
        }

        let feature_cells = &cells[..cells.len() - 1];
        let target_cell = &cells[cells.len() - 1];

        let feats = parse_floats(feature_cells, row_idx + 1)?;
        let target = target_cell.trim().parse::<f64>().map_err(|_| {
            CsvParseError(format!(
                "Row {}: target '{}' is not a valid number",
                row_idx + 1,
                target_cell
            ))
        })?;

        inputs.push(feats);
        targets.push(target);
    }

    if inputs.is_empty() {
        return Err(CsvParseError(
            "CSV contains no data rows after parsing".into(),
        ));
    }

    // Verify all rows have the same feature width.
    let n_feats = inputs[0].len();
    for (i, row) in inputs.iter().enumerate() {
        if row.len() != n_feats {
            return Err(CsvParseError(format!(
                "Row {}: feature count {} does not match first row's {}",
                i + 1,
                row.len(),
                n_feats
            )));
        }
    }

    Ok((inputs, targets))
}

/// Formats a dataset as CSV with a generated header row.
pub fn format_csv(inputs: &[Vec<f64>], targets: &[f64]) -> String {
    let n_feats = inputs.first().map_or(0, |row| row.len());
    let mut out = String::new();
    for i in 0..n_feats {
        out.push_str(&format!("x{i},"));
    }
    out.push_str("y\n");
    for (row, target) in inputs.iter().zip(targets.iter()) {
        for cell in row {
            out.push_str(&format!("{cell},"));
        }
        out.push_str(&format!("{target}\n"));
    }
    out
}

/// Reads and parses a CSV file.
pub fn load_csv<P: AsRef<Path>>(path: P) -> io::Result<(Vec<Vec<f64>>, Vec<f64>)> {
    let text = fs::read_to_string(path)?;
    parse_csv(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Writes a dataset to a CSV file.
pub fn save_csv<P: AsRef<Path>>(path: P, inputs: &[Vec<f64>], targets: &[f64]) -> io::Result<()> {
    fs::write(path, format_csv(inputs, targets))
}

/// Returns `true` if the row looks like a header (any cell non-numeric).
fn is_header(line: &str) -> bool {
    let cells = parse_csv_row(line);
    cells.iter().any(|c| {
        let t = c.trim();
        !t.is_empty() && t.parse::<f64>().is_err()
    })
}

/// Parses a single CSV row, handling double-quoted fields.
fn parse_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '"' => {
                if in_quotes && i + 1 < chars.len() && chars[i + 1] == '"' {
                    // Escaped quote inside quoted field.
                    current.push('"');
                    i += 2;
                    continue;
                }
                in_quotes = !in_quotes;
            }
            ',' if !in_quotes => {
                fields.push(current.clone());
                current.clear();
            }
            c => current.push(c),
        }
        i += 1;
    }
    fields.push(current);
    fields
}

/// Parses a slice of string cells as `f64`, with row info on failure.
fn parse_floats(cells: &[String], row_num: usize) -> Result<Vec<f64>, CsvParseError> {
    cells
        .iter()
        .map(|c| {
            c.trim()
                .parse::<f64>()
                .map_err(|_| CsvParseError(format!("Row {}: '{}' is not a valid number", row_num, c)))
        })
        .collect()
}
