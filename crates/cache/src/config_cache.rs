//! Configuration caches
//!
//! Source files are only half of build dirtiness; the other half is the
//! configuration the component was built with. A [`ConfigCache`]
//! records everything about the configuration that is not a source
//! file: configure options, the resolved dependency set, the selected
//! components, and cabal flag assignments. The orchestrator compares
//! the stored value against the current one and rebuilds on drift.
//!
//! Two addressings share the record type:
//! - per package directory (`config-cache`, JSON, human-inspectable)
//! - per installed artifact (the "flag cache", bincode, under the silo
//!   root) for dependencies that were built and registered globally

use serde::{Deserialize, Serialize};
use silo_core::env::BuildEnv;
use silo_core::ident::{GhcPkgId, Installed};
use silo_core::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::storage;

/// Per-directory config cache file name
pub const CONFIG_CACHE_FILE: &str = "config-cache";

/// Flag-cache directory under the silo root
pub const FLAG_CACHE_DIR: &str = "flag-cache";

/// Configure options, split by whether they carry a directory value.
///
/// Path-related options (prefixes, build dirs, package databases)
/// differ between environments without affecting build output, so they
/// are excluded from the precompiled-cache fingerprint. Both halves
/// participate in config-drift comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigureOpts {
    /// Options whose values are directories
    pub path_related: Vec<String>,
    /// Everything else, in the order passed to the configure step
    pub non_path_related: Vec<String>,
}

/// Everything about a build configuration that is not a source file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigCache {
    /// The configure options the component was built with
    pub opts: ConfigureOpts,
    /// Build identities of every dependency
    pub deps: BTreeSet<GhcPkgId>,
    /// Which components were built (by cache file name)
    pub components: BTreeSet<String>,
    /// Cabal flag assignments
    pub cabal_flags: BTreeMap<String, bool>,
}

/// Read the config cache for the package at `dir`; missing or corrupt
/// reads as `None`
#[must_use]
pub fn read_config_cache(dir: &Path) -> Option<ConfigCache> {
    storage::read_json(&dir.join(CONFIG_CACHE_FILE))
}

/// Overwrite the config cache for the package at `dir`
pub fn write_config_cache(dir: &Path, cache: &ConfigCache) -> Result<()> {
    storage::ensure_dir(dir)?;
    storage::write_json(&dir.join(CONFIG_CACHE_FILE), cache)
}

/// Remove the config cache for the package at `dir`; absence is not an
/// error
pub fn delete_config_cache(dir: &Path) -> Result<()> {
    let path = dir.join(CONFIG_CACHE_FILE);
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(e, &path, "remove")),
    }
}

/// Invalidate the caches for the package at `dir`.
///
/// Only the config cache is removed. Build caches are left in place:
/// a config change already forces the rebuild, and the stale file map
/// is overwritten by the next successful build.
// TODO: revisit whether build caches should be dropped here too once
// the rebuild decision logic settles.
pub fn delete_caches(dir: &Path) -> Result<()> {
    delete_config_cache(dir)
}

fn flag_cache_file(env: &BuildEnv, installed: &Installed) -> PathBuf {
    env.root
        .join(FLAG_CACHE_DIR)
        .join(installed.flag_cache_file_name())
}

/// Read the flag cache for an installed artifact; missing or corrupt
/// reads as `None`
#[must_use]
pub fn read_flag_cache(env: &BuildEnv, installed: &Installed) -> Option<ConfigCache> {
    storage::read_bincode(&flag_cache_file(env, installed))
}

/// Overwrite the flag cache for an installed artifact
pub fn write_flag_cache(env: &BuildEnv, installed: &Installed, cache: &ConfigCache) -> Result<()> {
    let path = flag_cache_file(env, installed);
    if let Some(parent) = path.parent() {
        storage::ensure_dir(parent)?;
    }
    storage::write_bincode(&path, cache)
}
