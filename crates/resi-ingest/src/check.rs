//! Fail-fast checks on upload metadata, run before any decoding.

use std::path::Path;

use crate::error::{IngestError, Result};

/// Maximum accepted spreadsheet size (10 MB).
pub const MAX_SPREADSHEET_SIZE: u64 = 10 * 1024 * 1024;

/// Container format, decided from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Xlsx,
    Xlsm,
    Xls,
    Ods,
    Csv,
}

impl SpreadsheetFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, extension) = name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "xlsx" => Some(Self::Xlsx),
            "xlsm" => Some(Self::Xlsm),
            "xls" => Some(Self::Xls),
            "ods" => Some(Self::Ods),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    pub fn is_workbook(self) -> bool {
        !matches!(self, Self::Csv)
    }
}

/// What is known about an upload before its bytes are read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub name: String,
    pub size: u64,
}

impl FileMetadata {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Stat a file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                IngestError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                IngestError::FileRead {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, metadata.len()))
    }
}

/// Reject unsupported extensions and oversized files.
pub fn validate_metadata(metadata: &FileMetadata) -> Result<SpreadsheetFormat> {
    validate_metadata_with_limit(metadata, MAX_SPREADSHEET_SIZE)
}

/// Same as [`validate_metadata`] with a custom size ceiling.
pub fn validate_metadata_with_limit(
    metadata: &FileMetadata,
    max_size: u64,
) -> Result<SpreadsheetFormat> {
    let format = SpreadsheetFormat::from_name(&metadata.name).ok_or_else(|| {
        IngestError::UnsupportedExtension {
            name: metadata.name.clone(),
        }
    })?;
    if metadata.size > max_size {
        return Err(IngestError::FileTooLarge {
            name: metadata.name.clone(),
            size: metadata.size,
            max: max_size,
        });
    }
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_case_insensitive() {
        assert_eq!(
            SpreadsheetFormat::from_name("DanCu.XLSX"),
            Some(SpreadsheetFormat::Xlsx)
        );
        assert_eq!(SpreadsheetFormat::from_name("residents"), None);
        assert_eq!(SpreadsheetFormat::from_name("notes.txt"), None);
    }

    #[test]
    fn size_ceiling_is_inclusive() {
        let at_limit = FileMetadata::new("a.xls", MAX_SPREADSHEET_SIZE);
        assert!(validate_metadata(&at_limit).is_ok());
        let over = FileMetadata::new("a.xls", MAX_SPREADSHEET_SIZE + 1);
        assert!(matches!(
            validate_metadata(&over),
            Err(IngestError::FileTooLarge { .. })
        ));
    }
}
