//! Persistent build-artifact caches for silo
//!
//! This crate decides nothing about *what* to build; it persists and
//! reports the facts the build orchestrator bases those decisions on:
//!
//! - [`build_cache`] — per-component source-file metadata, the "is this
//!   component dirty" record
//! - [`config_cache`] — configuration fingerprint per package directory
//!   or per installed dependency (the flag cache)
//! - [`precompiled`] — cross-environment reuse of already-built
//!   libraries and executables
//! - [`installed`] — which package executables are installed per scope
//! - [`cabal_mod`] — the processed cabal file's modification time
//! - [`test_memo`] — whether a package's test suite last passed
//!
//! # Failure policy
//!
//! Every cache here is advisory. Reads collapse "never written",
//! "corrupt", and "unreadable" into a miss — a broken cache costs a
//! rebuild, never a failed build. Writes are atomic whole-file
//! replacements and their errors do propagate, because a silently
//! dropped write would surface later as a wrong cache answer.
//!
//! # Keys and relocation
//!
//! Cache identity comes from [`fingerprint`]: SHA-256 over the
//! non-path configure options and the dependency set, rendered
//! URL-safe. Precompiled records store artifact paths relative to the
//! silo root and re-root them on read, so a shared cache survives the
//! root moving between machines or users. [`path_guard`] keeps the
//! composed paths inside Windows' path-length limit.

pub mod build_cache;
pub mod cabal_mod;
pub mod component;
pub mod config_cache;
pub mod fingerprint;
pub mod installed;
pub mod path_guard;
pub mod precompiled;
mod storage;
pub mod test_memo;

pub use build_cache::{BuildCacheMap, FileCacheInfo, read_build_cache, write_build_cache};
pub use cabal_mod::{read_cabal_mod, write_cabal_mod};
pub use component::NamedComponent;
pub use config_cache::{
    ConfigCache, ConfigureOpts, delete_caches, delete_config_cache, read_config_cache,
    read_flag_cache, write_config_cache, write_flag_cache,
};
pub use fingerprint::{Fingerprint, config_fingerprint};
pub use installed::{InstallLocation, list_installed, mark_installed, mark_not_installed};
pub use precompiled::{PrecompiledCache, read_precompiled_cache, write_precompiled_cache};
pub use test_memo::{check_test_success, set_test_failure, set_test_success};
