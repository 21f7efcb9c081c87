//! Workbook decoding (xlsx, xlsm, xls, ods) via calamine.

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use resi_model::{CellValue, SpreadsheetTable};

use crate::error::{IngestError, Result};
use crate::table::build_table;

/// Decode the first sheet of a workbook.
pub fn read_workbook(bytes: &[u8]) -> Result<SpreadsheetTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|source| IngestError::Workbook { source })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::EmptySheet)?
        .map_err(|source| IngestError::Workbook { source })?;

    if range.is_empty() {
        return Err(IngestError::EmptySheet);
    }
    // Ranges can start below row 1 when the top of the sheet is empty.
    let header_row = range.start().map_or(1, |(row, _)| row as usize + 1);
    build_table(
        range
            .rows()
            .map(|row| row.iter().map(cell_from_data).collect::<Vec<_>>()),
        header_row,
    )
}

/// Map a calamine cell onto the model's cell type.
pub fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Float(value) => CellValue::Number(*value),
        Data::String(text) => {
            if text.trim().is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(text.clone())
            }
        }
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => CellValue::DateTime(value.as_f64()),
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    use calamine::CellErrorType;

    use super::*;

    #[test]
    fn converts_scalar_cells() {
        assert_eq!(cell_from_data(&Data::Int(42)), CellValue::Number(42.0));
        assert_eq!(
            cell_from_data(&Data::String("Nam".into())),
            CellValue::Text("Nam".into())
        );
        assert_eq!(cell_from_data(&Data::String("  ".into())), CellValue::Empty);
        assert_eq!(
            cell_from_data(&Data::Error(CellErrorType::Div0)),
            CellValue::Empty
        );
        assert_eq!(
            cell_from_data(&Data::DateTimeIso("2014-08-15".into())),
            CellValue::Text("2014-08-15".into())
        );
    }

    #[test]
    fn garbage_bytes_are_a_decode_error() {
        let error = read_workbook(b"definitely not a workbook").unwrap_err();
        assert!(matches!(error, IngestError::Workbook { .. }));
        assert!(!error.is_format_error());
    }
}
