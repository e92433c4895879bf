//! The injected build-environment context
//!
//! Every cache operation that depends on the broader environment (root
//! directories, toolchain identity, platform quirks) receives a
//! [`BuildEnv`] rather than discovering those facts itself. The value
//! is constructed once at startup and threaded through as an immutable
//! reference.

use std::path::PathBuf;

/// Path-length policy for the host filesystem.
///
/// Windows rejects paths of 260 or more UTF-16 code units; everything
/// else we support does not care. The policy is a plain value selected
/// once at startup so callers stay free of conditional compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathLimit {
    /// Whether the platform enforces a maximum path length
    pub constrained: bool,
    /// The maximum, measured in the platform's native character units
    pub max_units: usize,
}

impl PathLimit {
    /// The Windows `MAX_PATH` constant
    pub const WINDOWS_MAX_PATH: usize = 260;

    /// The policy for the machine we are running on
    #[must_use]
    pub fn host() -> Self {
        Self {
            constrained: cfg!(windows),
            max_units: Self::WINDOWS_MAX_PATH,
        }
    }

    /// A policy that never shortens paths
    #[must_use]
    pub fn unconstrained() -> Self {
        Self {
            constrained: false,
            max_units: usize::MAX,
        }
    }

    /// A constrained policy with the given maximum, for tests and
    /// unusual filesystems
    #[must_use]
    pub fn constrained(max_units: usize) -> Self {
        Self {
            constrained: true,
            max_units,
        }
    }
}

/// Immutable environment context for cache operations.
///
/// `root` is the movable silo root: everything the precompiled cache
/// records is expressed relative to it so a relocated root (another
/// user, another checkout of the same shared cache) still resolves.
#[derive(Debug, Clone)]
pub struct BuildEnv {
    /// The silo root directory (snapshot-shared, movable)
    pub root: PathBuf,
    /// The project-local work root (e.g. `.silo-work` inside a project)
    pub local_root: PathBuf,
    /// Compiler identity, e.g. `ghc-9.6.4`
    pub compiler_version: String,
    /// Package-description format version, e.g. `Cabal-3.10.2.0`
    pub cabal_version: String,
    /// Target platform, e.g. `x86_64-linux`
    pub platform: String,
    /// The snapshot package database holding library registration files
    pub snapshot_pkg_db: PathBuf,
    /// The snapshot bin directory holding installed executables
    pub snapshot_bin_dir: PathBuf,
    /// Path-length policy for this host
    pub path_limit: PathLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconstrained_limit_never_triggers() {
        let limit = PathLimit::unconstrained();
        assert!(!limit.constrained);
    }

    #[test]
    fn test_constrained_limit_carries_max() {
        let limit = PathLimit::constrained(64);
        assert!(limit.constrained);
        assert_eq!(limit.max_units, 64);
    }
}
