//! JSON file helpers shared by the progress snapshot and the error log.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ImportError, Result};

/// Write `value` as pretty JSON through a temp file and a rename, so readers
/// never observe a half-written file.
pub(crate) fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|source| ImportError::Json {
        operation: "encode",
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ImportError::Io {
            operation: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file = File::create(&temp_path).map_err(|source| ImportError::Io {
        operation: "create",
        path: temp_path.clone(),
        source,
    })?;
    file.write_all(&bytes).map_err(|source| ImportError::Io {
        operation: "write",
        path: temp_path.clone(),
        source,
    })?;
    file.sync_all().map_err(|source| ImportError::Io {
        operation: "sync",
        path: temp_path.clone(),
        source,
    })?;

    fs::rename(&temp_path, path).map_err(|source| ImportError::Io {
        operation: "rename",
        path: path.to_path_buf(),
        source,
    })
}

/// Read a JSON file; a missing file is `None`.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ImportError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|source| ImportError::Json {
            operation: "decode",
            path: path.to_path_buf(),
            source,
        })
}

/// Delete a file; a missing file is fine.
pub(crate) fn remove_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(ImportError::Io {
            operation: "delete",
            path: path.to_path_buf(),
            source,
        }),
    }
}
