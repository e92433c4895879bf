//! Per-component build caches
//!
//! One JSON file per (package directory, component) records what each
//! source file looked like at the last successful build. The build
//! orchestrator compares a freshly computed map against the stored one
//! to decide whether the component is dirty; this module only persists
//! the facts.
//!
//! The file is replaced wholesale on every successful build and never
//! partially updated. There is deliberately no delete operation here:
//! cache invalidation removes only the config cache, and stale build
//! caches are harmless because a config change already forces a rebuild.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use silo_core::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::component::NamedComponent;
use crate::storage;

/// Subdirectory of a package's cache directory holding component caches
pub const BUILD_CACHES_DIR: &str = "caches";

/// Cache-relevant metadata for one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCacheInfo {
    /// File size in bytes
    pub size: u64,
    /// Modification time at hash time
    pub mod_time: DateTime<Utc>,
    /// Content hash (hex SHA-256)
    pub hash: String,
}

/// Map from source file path to its recorded metadata
pub type BuildCacheMap = BTreeMap<String, FileCacheInfo>;

fn build_cache_file(dir: &Path, component: &NamedComponent) -> PathBuf {
    dir.join(BUILD_CACHES_DIR).join(component.cache_file_name())
}

/// Read the build cache for one component of the package at `dir`.
///
/// Ensures the cache subdirectory exists as a side effect. A missing or
/// corrupt cache reads as `None`, which the caller treats as "always
/// dirty"; it is never an error.
#[must_use]
pub fn read_build_cache(dir: &Path, component: &NamedComponent) -> Option<BuildCacheMap> {
    let path = build_cache_file(dir, component);
    if let Some(parent) = path.parent()
        && storage::ensure_dir(parent).is_err()
    {
        return None;
    }
    storage::read_json(&path)
}

/// Overwrite the build cache for one component of the package at `dir`
pub fn write_build_cache(
    dir: &Path,
    component: &NamedComponent,
    cache: &BuildCacheMap,
) -> Result<()> {
    let path = build_cache_file(dir, component);
    if let Some(parent) = path.parent() {
        storage::ensure_dir(parent)?;
    }
    storage::write_json(&path, cache)
}
