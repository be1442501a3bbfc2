//! JSON persistence helpers
//!
//! Every file fintrack owns (the ledger and the settings) is read and written
//! through here. A write either replaces the whole file or leaves the old one
//! in place.

use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::FintrackError;

/// Read a JSON file, treating a missing or empty file as `T::default()`
///
/// An empty file is what `touch` or an interrupted first run leaves behind;
/// both mean "nothing recorded yet".
pub fn read_json<T, P>(path: P) -> Result<T, FintrackError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No file yet, using defaults");
            return Ok(T::default());
        }
        Err(e) => {
            return Err(FintrackError::Storage(format!(
                "Failed to open {}: {}",
                path.display(),
                e
            )))
        }
    };

    let is_empty = file.metadata().map(|m| m.len() == 0).unwrap_or(false);
    if is_empty {
        tracing::debug!(path = %path.display(), "Empty file, using defaults");
        return Ok(T::default());
    }

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| FintrackError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Hidden sibling used while a write is in flight, e.g. `.transactions.json.tmp`
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "fintrack".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}

/// Serialize `data` and atomically replace `path` with it
///
/// Serialization happens before any file is touched, so a value that cannot
/// be encoded never clobbers the previous contents.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), FintrackError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let mut bytes = serde_json::to_vec_pretty(data)
        .map_err(|e| FintrackError::Storage(format!("Failed to serialize data: {}", e)))?;
    bytes.push(b'\n');

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            FintrackError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = temp_path_for(path);
    let written = File::create(&temp_path).and_then(|mut file| {
        file.write_all(&bytes)?;
        file.sync_all()
    });

    if let Err(e) = written.and_then(|_| fs::rename(&temp_path, path)) {
        let _ = fs::remove_file(&temp_path);
        return Err(FintrackError::Storage(format!(
            "Failed to write {}: {}",
            path.display(),
            e
        )));
    }

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Wrote file");
    Ok(())
}
