//! Shared on-disk record handling
//!
//! Two codecs back the cache files: pretty-printed JSON for the records
//! a person may want to inspect (build cache, config cache) and bincode
//! for the compact binary records (precompiled cache, flag cache).
//!
//! Reads distinguish "not found", "undecodable", and "I/O error"
//! internally, but the public readers built on top collapse all three
//! to a miss: a cache is advisory and its unavailability must never
//! block a build. Decode failures are logged before being discarded so
//! stale-format files remain diagnosable.
//!
//! Writes are whole-file overwrites through a sibling temp file and an
//! atomic rename, so a concurrent reader observes either the old or the
//! new record, never a truncated one. Write failures propagate: a write
//! reported as success that did not happen would cause false hits later.

use serde::Serialize;
use serde::de::DeserializeOwned;
use silo_core::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Why a cache file could not be read
#[derive(Debug)]
pub(crate) enum ReadError {
    /// The file does not exist
    NotFound,
    /// The file exists but did not decode (corrupt or stale format)
    Decode(String),
    /// Reading the file failed outright
    Io(std::io::Error),
}

fn read_bytes(path: &Path) -> std::result::Result<Vec<u8>, ReadError> {
    fs::read(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ReadError::NotFound
        } else {
            ReadError::Io(e)
        }
    })
}

/// Collapse a read outcome to the public miss-or-hit shape, logging the
/// cases worth knowing about.
fn collapse<T>(res: std::result::Result<T, ReadError>, path: &Path) -> Option<T> {
    match res {
        Ok(value) => Some(value),
        Err(ReadError::NotFound) => None,
        Err(ReadError::Decode(message)) => {
            tracing::warn!(
                path = %path.display(),
                "discarding undecodable cache file: {message}"
            );
            None
        }
        Err(ReadError::Io(e)) => {
            tracing::debug!(path = %path.display(), "cache read failed: {e}");
            None
        }
    }
}

/// Read a JSON record, treating absence and corruption as a miss
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let res = read_bytes(path).and_then(|bytes| {
        serde_json::from_slice(&bytes).map_err(|e| ReadError::Decode(e.to_string()))
    });
    collapse(res, path)
}

/// Write a JSON record atomically, overwriting any previous one
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|e| Error::serialization(format!("failed to encode {}: {e}", path.display())))?;
    write_atomic(path, &bytes)
}

/// Read a bincode record, treating absence and corruption as a miss
pub(crate) fn read_bincode<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let res = read_bytes(path).and_then(|bytes| {
        bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
            .map(|(value, _)| value)
            .map_err(|e| ReadError::Decode(e.to_string()))
    });
    collapse(res, path)
}

/// Write a bincode record atomically, overwriting any previous one
pub(crate) fn write_bincode<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|e| Error::serialization(format!("failed to encode {}: {e}", path.display())))?;
    write_atomic(path, &bytes)
}

/// Idempotent directory creation; racing callers are fine
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io(e, dir, "create_dir_all"))
}

/// Write bytes to a sibling temp file, then rename over the target.
///
/// The temp name is deterministic per target, which is safe because
/// callers never write the same cache key concurrently.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::configuration(format!("not a file path: {}", path.display())))?;
    let tmp = path.with_file_name(format!("{}.tmp", file_name.to_string_lossy()));
    fs::write(&tmp, bytes).map_err(|e| Error::io(e, &tmp, "write"))?;
    fs::rename(&tmp, path).map_err(|e| Error::io(e, path, "rename"))
}
