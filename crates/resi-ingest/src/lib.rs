//! Spreadsheet ingestion for the resident import pipeline.
//!
//! Decodes an uploaded workbook or CSV file into a [`SpreadsheetTable`]:
//! the first sheet only, row 0 as headers, fully blank rows dropped.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use resi_ingest::read_path;
//!
//! let table = read_path(Path::new("dan-cu.xlsx"))?;
//! println!("{} rows", table.row_count());
//! ```

use std::path::Path;

use resi_model::SpreadsheetTable;

mod check;
mod csv_table;
mod error;
mod table;
mod workbook;

// === Error Types ===
pub use error::{IngestError, Result};

// === Pre-check ===
pub use check::{
    FileMetadata, MAX_SPREADSHEET_SIZE, SpreadsheetFormat, validate_metadata,
    validate_metadata_with_limit,
};

// === Decoding ===
pub use csv_table::read_csv;
pub use workbook::{cell_from_data, read_workbook};

/// Decode spreadsheet bytes of a known format.
pub fn read_spreadsheet(bytes: &[u8], format: SpreadsheetFormat) -> Result<SpreadsheetTable> {
    if format.is_workbook() {
        read_workbook(bytes)
    } else {
        read_csv(bytes)
    }
}

/// Pre-check a file on disk, then decode it.
pub fn read_path(path: &Path) -> Result<SpreadsheetTable> {
    let metadata = FileMetadata::from_path(path)?;
    let format = validate_metadata(&metadata)?;
    let bytes = std::fs::read(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_spreadsheet(&bytes, format)?;
    tracing::info!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "read spreadsheet"
    );
    Ok(table)
}
