//! Precompiled-package cache
//!
//! When two environments build the same package source with the same
//! configuration and the same resolved dependencies, the second build
//! is pure waste: the registration files and executables from the first
//! can be copied and re-registered instead. This module persists where
//! those artifacts live, keyed hard enough that a hit is safe:
//!
//! ```text
//! root/precompiled/<platform>/<compiler>/<cabal-format>/<source-key>/<fingerprint>
//! ```
//!
//! Toolchain segments keep incompatible compilers apart; the source key
//! identifies the package *content* (not name+version — a local
//! checkout can differ from the released tarball); the fingerprint
//! covers non-path configure options and the dependency set. The two
//! trailing segments pass through the path-length guard.
//!
//! Recorded artifact paths are relative to the silo root, so a record
//! written under one root still resolves after the root moves (a second
//! user mounting the same shared cache, a relocated CI workspace).
//! Records from old silo versions stored absolute paths; re-rooting
//! leaves those untouched.

use serde::{Deserialize, Serialize};
use silo_core::Result;
use silo_core::env::BuildEnv;
use silo_core::ident::{GhcPkgId, SourceKey};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config_cache::ConfigureOpts;
use crate::fingerprint::config_fingerprint;
use crate::path_guard::guarded_cache_path;
use crate::storage;

/// Precompiled-cache directory under the silo root
pub const PRECOMPILED_DIR: &str = "precompiled";

/// Where a previously built package's artifacts live.
///
/// Paths are stored root-relative and re-rooted on read; a consumer
/// receives paths under the *current* root. Existence of the files is
/// not verified here — a consumer copying them must tolerate staleness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecompiledCache {
    /// The main library's registration file, if the package has one
    pub library: Option<PathBuf>,
    /// Registration files of internal libraries
    pub sub_libs: BTreeSet<PathBuf>,
    /// Installed executables
    pub exes: BTreeSet<PathBuf>,
}

fn precompiled_cache_file(
    env: &BuildEnv,
    source_key: &SourceKey,
    opts: &ConfigureOpts,
    deps: &BTreeSet<GhcPkgId>,
) -> PathBuf {
    let base = env
        .root
        .join(PRECOMPILED_DIR)
        .join(&env.platform)
        .join(&env.compiler_version)
        .join(&env.cabal_version);
    let fingerprint = config_fingerprint(opts, deps);
    guarded_cache_path(&env.path_limit, &base, source_key.as_str(), &fingerprint)
}

/// Express `path` relative to `root`, or leave it alone if it lives
/// elsewhere. `root.join` later inverts both cases: joining a relative
/// path re-roots it, joining an absolute path returns it unchanged.
fn unroot(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
}

fn reroot(root: &Path, record: PrecompiledCache) -> PrecompiledCache {
    PrecompiledCache {
        library: record.library.map(|p| root.join(p)),
        sub_libs: record.sub_libs.into_iter().map(|p| root.join(p)).collect(),
        exes: record.exes.into_iter().map(|p| root.join(p)).collect(),
    }
}

/// Record the artifacts of a freshly built package.
///
/// `library` and `sub_libs` name registration files in the snapshot
/// package db; `exes` name executables in the snapshot bin dir. The
/// record overwrites any previous one at this key.
pub fn write_precompiled_cache(
    env: &BuildEnv,
    source_key: &SourceKey,
    opts: &ConfigureOpts,
    deps: &BTreeSet<GhcPkgId>,
    library: Option<&GhcPkgId>,
    sub_libs: &BTreeSet<GhcPkgId>,
    exes: &BTreeSet<String>,
) -> Result<()> {
    let conf_file = |id: &GhcPkgId| env.snapshot_pkg_db.join(format!("{id}.conf"));
    let record = PrecompiledCache {
        library: library.map(|id| unroot(&env.root, &conf_file(id))),
        sub_libs: sub_libs
            .iter()
            .map(|id| unroot(&env.root, &conf_file(id)))
            .collect(),
        exes: exes
            .iter()
            .map(|name| unroot(&env.root, &env.snapshot_bin_dir.join(name)))
            .collect(),
    };

    let path = precompiled_cache_file(env, source_key, opts, deps);
    if let Some(parent) = path.parent() {
        storage::ensure_dir(parent)?;
    }
    storage::write_bincode(&path, &record)
}

/// Look up artifacts for a package/configuration/dependency combination.
///
/// `None` is the normal cache-miss outcome — absent record, corrupt
/// record, stale format, all the same. A hit comes back with every path
/// rooted under the current `env.root`.
#[must_use]
pub fn read_precompiled_cache(
    env: &BuildEnv,
    source_key: &SourceKey,
    opts: &ConfigureOpts,
    deps: &BTreeSet<GhcPkgId>,
) -> Option<PrecompiledCache> {
    let path = precompiled_cache_file(env, source_key, opts, deps);
    let record: PrecompiledCache = storage::read_bincode(&path)?;
    Some(reroot(&env.root, record))
}
