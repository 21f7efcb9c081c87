//! Shared header/row shaping for every input format.

use std::collections::HashMap;

use resi_model::{CellValue, SpreadsheetTable};

use crate::error::{IngestError, Result};

/// Turn decoded rows into a table: row 0 is the header row, fully blank
/// data rows are dropped.
///
/// `header_row` is the 1-based sheet row the header was read from; kept data
/// rows remember their own sheet row relative to it.
pub(crate) fn build_table<I>(rows: I, header_row: usize) -> Result<SpreadsheetTable>
where
    I: IntoIterator<Item = Vec<CellValue>>,
{
    let mut rows = rows.into_iter();
    let header_cells = rows.next().ok_or(IngestError::EmptySheet)?;
    let headers = build_headers(&header_cells);
    if headers.is_empty() {
        return Err(IngestError::EmptySheet);
    }

    let (row_numbers, data): (Vec<usize>, Vec<Vec<CellValue>>) = rows
        .enumerate()
        .filter(|(_, row)| !row.iter().all(CellValue::is_blank))
        .map(|(index, row)| (header_row + 1 + index, row))
        .unzip();
    if data.is_empty() {
        return Err(IngestError::NoDataRows);
    }

    tracing::debug!(
        columns = headers.len(),
        rows = data.len(),
        "decoded spreadsheet"
    );
    Ok(SpreadsheetTable::with_row_numbers(headers, data, row_numbers))
}

/// Trimmed header text; blanks become `Column N` and repeats get a ` (n)` suffix.
fn build_headers(cells: &[CellValue]) -> Vec<String> {
    let last_used = cells
        .iter()
        .rposition(|cell| !cell.is_blank())
        .map_or(0, |index| index + 1);
    let mut seen: HashMap<String, usize> = HashMap::new();
    cells[..last_used]
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            let text = cell.to_text();
            let base = if text.is_empty() {
                format!("Column {}", index + 1)
            } else {
                text
            };
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                base
            } else {
                format!("{base} ({count})")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|cell| CellValue::from(*cell)).collect()
    }

    #[test]
    fn blank_and_duplicate_headers_stay_addressable() {
        let table = build_table(
            vec![
                text_row(&[" Họ tên ", "", "Họ tên", "Email", ""]),
                text_row(&["A", "B", "C", "D"]),
            ],
            1,
        )
        .unwrap();
        assert_eq!(
            table.headers(),
            &["Họ tên", "Column 2", "Họ tên (2)", "Email"]
        );
    }

    #[test]
    fn fully_blank_rows_are_dropped() {
        let table = build_table(
            vec![
                text_row(&["Họ tên", "SĐT"]),
                text_row(&["", "  "]),
                text_row(&["Nguyễn Văn A"]),
                Vec::new(),
                text_row(&["Trần Thị B"]),
            ],
            1,
        )
        .unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.row_numbers(), &[3, 5]);
    }

    #[test]
    fn row_numbers_follow_a_lowered_header() {
        let table = build_table(
            vec![text_row(&["Họ tên"]), text_row(&["Nguyễn Văn A"])],
            3,
        )
        .unwrap();
        assert_eq!(table.row_numbers(), &[4]);
    }

    #[test]
    fn header_only_is_a_format_error() {
        let error = build_table(vec![text_row(&["Họ tên"]), text_row(&[""])], 1).unwrap_err();
        assert!(matches!(error, IngestError::NoDataRows));
        assert!(error.is_format_error());
    }

    #[test]
    fn no_rows_at_all_is_empty_sheet() {
        let error = build_table(Vec::<Vec<CellValue>>::new(), 1).unwrap_err();
        assert!(matches!(error, IngestError::EmptySheet));
    }
}
