//! Decoded spreadsheet contents.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One decoded spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Date-formatted workbook cell, stored as its spreadsheet serial.
    DateTime(f64),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed textual form; whole numbers render without a fraction.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(text) => text.trim().to_string(),
            CellValue::Number(value) | CellValue::DateTime(value) => format_number(*value),
            CellValue::Bool(value) => value.to_string(),
        }
    }

    /// Numeric value usable as a spreadsheet date serial.
    pub fn as_serial(&self) -> Option<f64> {
        match self {
            CellValue::Number(value) | CellValue::DateTime(value) => Some(*value),
            _ => None,
        }
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

/// Header row plus data rows of the first sheet.
///
/// Rows may be ragged; cells past the end of a row read as empty. Each data
/// row keeps the 1-based sheet row it came from, so rows after a dropped
/// blank row still report their real position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadsheetTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
    row_numbers: Vec<usize>,
}

/// Sheet row of the first data row when the header sits on row 1.
pub const FIRST_DATA_ROW: usize = 2;

impl SpreadsheetTable {
    /// Table whose data rows are consecutive, starting at sheet row 2.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let row_numbers = (FIRST_DATA_ROW..FIRST_DATA_ROW + rows.len()).collect();
        Self {
            headers,
            rows,
            row_numbers,
        }
    }

    /// Table with an explicit sheet row number per data row.
    ///
    /// Missing trailing numbers continue from the last known one.
    pub fn with_row_numbers(
        headers: Vec<String>,
        rows: Vec<Vec<CellValue>>,
        mut row_numbers: Vec<usize>,
    ) -> Self {
        row_numbers.truncate(rows.len());
        let mut next = row_numbers.last().map_or(FIRST_DATA_ROW, |last| last + 1);
        while row_numbers.len() < rows.len() {
            row_numbers.push(next);
            next += 1;
        }
        Self {
            headers,
            rows,
            row_numbers,
        }
    }

    /// 1-based sheet row of data row `index`.
    pub fn row_number(&self, index: usize) -> usize {
        self.row_numbers
            .get(index)
            .copied()
            .unwrap_or(FIRST_DATA_ROW + index)
    }

    pub fn row_numbers(&self) -> &[usize] {
        &self.row_numbers
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|candidate| candidate == header)
    }

    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Leading rows handed to the mapper as context.
    pub fn sample_rows(&self, limit: usize) -> &[Vec<CellValue>] {
        &self.rows[..self.rows.len().min(limit)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_numbers_render_without_fraction() {
        assert_eq!(CellValue::Number(901234567.0).to_text(), "901234567");
        assert_eq!(CellValue::Number(1.5).to_text(), "1.5");
    }

    #[test]
    fn ragged_rows_read_as_empty() {
        let table = SpreadsheetTable::new(
            vec!["A".into(), "B".into()],
            vec![vec![CellValue::from("x")]],
        );
        assert_eq!(table.cell(0, 1), &CellValue::Empty);
        assert_eq!(table.cell(5, 0), &CellValue::Empty);
    }

    #[test]
    fn row_numbers_default_to_consecutive_rows() {
        let table = SpreadsheetTable::new(vec!["A".into()], vec![vec![], vec![]]);
        assert_eq!(table.row_numbers(), &[2, 3]);

        let sparse = SpreadsheetTable::with_row_numbers(
            vec!["A".into()],
            vec![vec![], vec![], vec![]],
            vec![2, 5],
        );
        assert_eq!(sparse.row_numbers(), &[2, 5, 6]);
        assert_eq!(sparse.row_number(1), 5);
    }

    #[test]
    fn blank_text_is_blank() {
        assert!(CellValue::from("   ").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }
}
