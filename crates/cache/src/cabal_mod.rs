//! Cabal-file modification-time cache
//!
//! Records the mtime of a package's cabal file at the moment it was
//! last successfully processed. The stamp is carried by the sentinel
//! file's own filesystem mtime, forced after writing — the write itself
//! would otherwise stamp it "now". The sentinel's contents are fixed
//! and meaningless.

use chrono::{DateTime, Utc};
use silo_core::{Error, Result};
use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::storage;

/// Sentinel file name inside a package's cache directory
pub const CABAL_MOD_FILE: &str = "cabal-mod";

const CABAL_MOD_PAYLOAD: &[u8] = b"Just used for its modification time";

/// The recorded cabal-file mtime, or `None` if never recorded or
/// unreadable
#[must_use]
pub fn read_cabal_mod(dir: &Path) -> Option<DateTime<Utc>> {
    let meta = fs::metadata(dir.join(CABAL_MOD_FILE)).ok()?;
    let mtime = meta.modified().ok()?;
    Some(DateTime::<Utc>::from(mtime))
}

/// Record `stamp` as the processed cabal-file mtime
pub fn write_cabal_mod(dir: &Path, stamp: DateTime<Utc>) -> Result<()> {
    storage::ensure_dir(dir)?;
    let path = dir.join(CABAL_MOD_FILE);
    fs::write(&path, CABAL_MOD_PAYLOAD).map_err(|e| Error::io(e, &path, "write"))?;

    let file = fs::File::options()
        .write(true)
        .open(&path)
        .map_err(|e| Error::io(e, &path, "open"))?;
    let at = SystemTime::from(stamp);
    file.set_times(fs::FileTimes::new().set_accessed(at).set_modified(at))
        .map_err(|e| Error::io(e, &path, "set_times"))?;
    Ok(())
}
