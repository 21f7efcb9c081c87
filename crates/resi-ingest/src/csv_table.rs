//! CSV decoding.

use resi_model::{CellValue, SpreadsheetTable};

use crate::error::{IngestError, Result};
use crate::table::build_table;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode UTF-8 CSV bytes; rows may have differing lengths.
pub fn read_csv(bytes: &[u8]) -> Result<SpreadsheetTable> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv { source })?;
        rows.push(record.iter().map(CellValue::from).collect::<Vec<_>>());
    }
    build_table(rows, 1)
}
