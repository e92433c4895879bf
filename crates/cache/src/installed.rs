//! Installed-executable registry
//!
//! Tracks which package-level executables have been installed into a
//! scope. A marker file's name is the full package identifier; its
//! contents are a fixed sentinel. "Installed" is pure set membership,
//! so listing the marker directory reconstructs everything.
//!
//! Legacy silo versions could leave two markers for one package name
//! (different versions). That state is ambiguous, and the registry
//! refuses to guess: every marker for such a name is dropped from
//! listings until a write resolves it. `mark_installed` clears all
//! markers for its package name before writing, so the ambiguity heals
//! on the next install.

use silo_core::env::BuildEnv;
use silo_core::ident::{PackageIdent, PackageName};
use silo_core::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::storage;

/// Marker directory name under a scope's root
pub const INSTALLED_DIR: &str = "installed-packages";

const INSTALLED_PAYLOAD: &[u8] = b"Installed";

/// Which root holds a package's install markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallLocation {
    /// The snapshot-shared scope under the silo root
    Snapshot,
    /// The project-local scope under the project work root
    Local,
}

fn installed_dir(env: &BuildEnv, loc: InstallLocation) -> PathBuf {
    let base = match loc {
        InstallLocation::Snapshot => &env.root,
        InstallLocation::Local => &env.local_root,
    };
    base.join(INSTALLED_DIR)
}

/// All markers in a scope, grouped by package name. Unparseable file
/// names are skipped; a missing directory reads as empty.
fn markers_by_name(env: &BuildEnv, loc: InstallLocation) -> BTreeMap<PackageName, Vec<PackageIdent>> {
    let dir = installed_dir(env, loc);
    let mut by_name: BTreeMap<PackageName, Vec<PackageIdent>> = BTreeMap::new();
    let Ok(entries) = fs::read_dir(&dir) else {
        return by_name;
    };
    for entry in entries.flatten() {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(ident) = PackageIdent::parse(name) else {
            continue;
        };
        by_name.entry(ident.name.clone()).or_default().push(ident);
    }
    by_name
}

/// The executables installed in a scope.
///
/// A package name with more than one marker is ambiguous and reported
/// as not installed at all; the listing never picks a version
/// arbitrarily. Listing failure (e.g. the directory was never created)
/// is an empty result, not an error.
#[must_use]
pub fn list_installed(env: &BuildEnv, loc: InstallLocation) -> Vec<PackageIdent> {
    let mut out = Vec::new();
    for (name, mut idents) in markers_by_name(env, loc) {
        if idents.len() > 1 {
            tracing::warn!(
                package = %name,
                markers = idents.len(),
                "multiple install markers for one package; treating it as not installed"
            );
            continue;
        }
        out.append(&mut idents);
    }
    out
}

/// Record that `ident`'s executables are installed in a scope.
///
/// Any existing marker for the same package name (whatever its version)
/// is removed first, which also repairs the ambiguous-duplicate case.
pub fn mark_installed(env: &BuildEnv, loc: InstallLocation, ident: &PackageIdent) -> Result<()> {
    let dir = installed_dir(env, loc);
    storage::ensure_dir(&dir)?;
    if let Some(existing) = markers_by_name(env, loc).remove(&ident.name) {
        for old in existing {
            mark_not_installed(env, loc, &old)?;
        }
    }
    let path = dir.join(ident.to_string());
    fs::write(&path, INSTALLED_PAYLOAD).map_err(|e| Error::io(e, &path, "write"))
}

/// Remove the install marker for `ident`; absence is success
pub fn mark_not_installed(env: &BuildEnv, loc: InstallLocation, ident: &PackageIdent) -> Result<()> {
    let path = installed_dir(env, loc).join(ident.to_string());
    match fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(Error::io(e, &path, "remove")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use silo_core::env::PathLimit;
    use std::path::Path;

    fn env(root: &Path) -> BuildEnv {
        BuildEnv {
            root: root.join("silo"),
            local_root: root.join("project/.silo-work"),
            compiler_version: "ghc-9.6.4".to_string(),
            cabal_version: "Cabal-3.10.2.0".to_string(),
            platform: "x86_64-linux".to_string(),
            snapshot_pkg_db: root.join("silo/pkgdb"),
            snapshot_bin_dir: root.join("silo/bin"),
            path_limit: PathLimit::unconstrained(),
        }
    }

    #[test]
    fn test_empty_scope_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let env = env(dir.path());
        assert!(list_installed(&env, InstallLocation::Snapshot).is_empty());
    }

    #[test]
    fn test_mark_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let env = env(dir.path());
        let ident = PackageIdent::new("foo", "1.0");
        mark_installed(&env, InstallLocation::Snapshot, &ident).unwrap();
        assert_eq!(list_installed(&env, InstallLocation::Snapshot), vec![ident]);
    }

    #[test]
    fn test_scopes_are_disjoint() {
        let dir = tempfile::tempdir().unwrap();
        let env = env(dir.path());
        let ident = PackageIdent::new("foo", "1.0");
        mark_installed(&env, InstallLocation::Local, &ident).unwrap();
        assert!(list_installed(&env, InstallLocation::Snapshot).is_empty());
        assert_eq!(list_installed(&env, InstallLocation::Local), vec![ident]);
    }

    #[test]
    fn test_marker_payload_is_fixed() {
        let dir = tempfile::tempdir().unwrap();
        let env = env(dir.path());
        mark_installed(&env, InstallLocation::Snapshot, &PackageIdent::new("foo", "1.0")).unwrap();
        let contents = fs::read(env.root.join(INSTALLED_DIR).join("foo-1.0")).unwrap();
        assert_eq!(contents, b"Installed");
    }

    #[test]
    fn test_reinstall_replaces_version() {
        let dir = tempfile::tempdir().unwrap();
        let env = env(dir.path());
        mark_installed(&env, InstallLocation::Snapshot, &PackageIdent::new("foo", "1.0")).unwrap();
        mark_installed(&env, InstallLocation::Snapshot, &PackageIdent::new("foo", "2.0")).unwrap();
        assert_eq!(
            list_installed(&env, InstallLocation::Snapshot),
            vec![PackageIdent::new("foo", "2.0")]
        );
    }

    #[test]
    fn test_duplicate_markers_resolve_to_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let env = env(dir.path());
        // Simulate the legacy state: two markers written directly.
        let markers = env.root.join(INSTALLED_DIR);
        fs::create_dir_all(&markers).unwrap();
        fs::write(markers.join("foo-1.0"), INSTALLED_PAYLOAD).unwrap();
        fs::write(markers.join("foo-2.0"), INSTALLED_PAYLOAD).unwrap();
        fs::write(markers.join("bar-0.1"), INSTALLED_PAYLOAD).unwrap();

        // Ambiguous "foo" disappears; unambiguous "bar" survives.
        assert_eq!(
            list_installed(&env, InstallLocation::Snapshot),
            vec![PackageIdent::new("bar", "0.1")]
        );

        // Unmarking one copy resolves the ambiguity.
        mark_not_installed(&env, InstallLocation::Snapshot, &PackageIdent::new("foo", "1.0"))
            .unwrap();
        let mut listed = list_installed(&env, InstallLocation::Snapshot);
        listed.sort();
        assert_eq!(
            listed,
            vec![PackageIdent::new("bar", "0.1"), PackageIdent::new("foo", "2.0")]
        );
    }

    #[test]
    fn test_unmark_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let env = env(dir.path());
        mark_not_installed(&env, InstallLocation::Snapshot, &PackageIdent::new("ghost", "0.0"))
            .unwrap();
    }

    #[test]
    fn test_unparseable_marker_names_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let env = env(dir.path());
        let markers = env.root.join(INSTALLED_DIR);
        fs::create_dir_all(&markers).unwrap();
        fs::write(markers.join("no-version-here"), INSTALLED_PAYLOAD).unwrap();
        assert!(list_installed(&env, InstallLocation::Snapshot).is_empty());
    }
}
