//! Package and installed-artifact identifiers
//!
//! These are thin newtypes over the strings the resolver hands us. The
//! cache layer only needs them to be comparable, orderable (for
//! deterministic set encodings), and renderable as filesystem-safe path
//! segments.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A package name, e.g. `text` or `unordered-containers`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PackageName(String);

impl PackageName {
    /// Create a package name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A package identifier: name plus version, rendered `name-version`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PackageIdent {
    /// Package name
    pub name: PackageName,
    /// Version string, e.g. `1.2.3.4`
    pub version: String,
}

impl PackageIdent {
    /// Create a package identifier
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: PackageName::new(name),
            version: version.into(),
        }
    }

    /// Parse a `name-version` string, as used for install-marker file names.
    ///
    /// The split point is the last `-` that is followed by a version (a
    /// digit-led run of digits and dots). Package names may themselves
    /// contain hyphens (`attoparsec-iso8601-1.1.0.0`). Returns `None`
    /// for strings that do not carry a version suffix.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let (name, version) = s.rsplit_once('-')?;
        if name.is_empty() || !is_version(version) {
            return None;
        }
        Some(Self::new(name, version))
    }
}

/// A version is a non-empty, digit-led run of digits and dots.
fn is_version(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_digit())
        && s.chars().all(|c| c.is_ascii_digit() || c == '.')
}

impl fmt::Display for PackageIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

/// An installed library's GHC package id, e.g. `text-2.1-Ab3dE...`
///
/// Opaque to silo: produced by the package registration step and only
/// ever compared, ordered, and used as a path fragment.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GhcPkgId(String);

impl GhcPkgId {
    /// Wrap a raw GHC package id string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GhcPkgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A structural identity for package source content.
///
/// Computed by the snapshot resolver from the package's source tree, so
/// two checkouts with identical content share a key regardless of
/// location, name, or declared version.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceKey(String);

impl SourceKey {
    /// Wrap a precomputed source content key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An installed artifact, as addressed by the flag cache
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Installed {
    /// An installed library, identified by its GHC package id
    Library {
        /// The library's package name
        name: PackageName,
        /// The registered package id
        ghc_pkg_id: GhcPkgId,
    },
    /// An installed executable, identified by its package identifier
    Executable(PackageIdent),
}

impl Installed {
    /// The flag-cache file name for this artifact.
    ///
    /// Libraries are keyed by their GHC package id (unique per build),
    /// executables by their package identifier. The two namespaces
    /// cannot collide: a GHC package id always carries a trailing hash
    /// segment that is not a version.
    #[must_use]
    pub fn flag_cache_file_name(&self) -> String {
        match self {
            Installed::Library { ghc_pkg_id, .. } => ghc_pkg_id.as_str().to_string(),
            Installed::Executable(ident) => ident.to_string(),
        }
    }

    /// The package name of the installed artifact
    #[must_use]
    pub fn package_name(&self) -> &PackageName {
        match self {
            Installed::Library { name, .. } => name,
            Installed::Executable(ident) => &ident.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_display_roundtrip() {
        let ident = PackageIdent::new("foo", "1.0");
        assert_eq!(ident.to_string(), "foo-1.0");
        assert_eq!(PackageIdent::parse("foo-1.0"), Some(ident));
    }

    #[test]
    fn test_parse_hyphenated_name() {
        let ident = PackageIdent::parse("attoparsec-iso8601-1.1.0.0").unwrap();
        assert_eq!(ident.name.as_str(), "attoparsec-iso8601");
        assert_eq!(ident.version, "1.1.0.0");
    }

    #[test]
    fn test_parse_rejects_versionless() {
        assert_eq!(PackageIdent::parse("noversion"), None);
        assert_eq!(PackageIdent::parse("trailing-dash-"), None);
        assert_eq!(PackageIdent::parse("-1.0"), None);
    }

    #[test]
    fn test_parse_rejects_non_numeric_suffix() {
        // The last segment must be digit-led to count as a version.
        assert_eq!(PackageIdent::parse("foo-bar"), None);
    }

    #[test]
    fn test_flag_cache_names_by_variant() {
        let lib = Installed::Library {
            name: PackageName::new("text"),
            ghc_pkg_id: GhcPkgId::new("text-2.1-Ab3dE"),
        };
        let exe = Installed::Executable(PackageIdent::new("pandoc", "3.1"));
        assert_eq!(lib.flag_cache_file_name(), "text-2.1-Ab3dE");
        assert_eq!(exe.flag_cache_file_name(), "pandoc-3.1");
    }

    #[test]
    fn test_idents_are_ordered() {
        let a = PackageIdent::new("aeson", "2.0");
        let b = PackageIdent::new("aeson", "2.1");
        assert!(a < b);
    }
}
