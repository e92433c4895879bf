//! Configuration fingerprints
//!
//! A fingerprint is the identity of a build configuration: the
//! configure options that affect output, plus the full set of
//! dependency build identities, hashed with SHA-256 and rendered in the
//! URL-safe base64 alphabet so it can serve directly as a path segment.
//!
//! Directory-valued options never enter the hash — install prefixes and
//! build dirs differ between environments, and a precompiled artifact
//! is still reusable when only those differ. The split is carried by
//! [`ConfigureOpts`](crate::config_cache::ConfigureOpts), so exclusion
//! holds by construction rather than by pattern-matching flag names.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use silo_core::ident::GhcPkgId;
use std::collections::BTreeSet;
use std::fmt;

use crate::config_cache::ConfigureOpts;

/// A deterministic, filesystem-safe identity for a build configuration.
///
/// 43 characters: a 256-bit digest in unpadded URL-safe base64.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// The fingerprint as a path-segment-ready string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Fingerprint a configuration: ordered non-path configure options plus
/// the dependency set.
///
/// Every field is length-prefixed before hashing so adjacent values
/// cannot run together (`["ab", "c"]` and `["a", "bc"]` must differ).
/// The dependency set iterates in `BTreeSet` order, making the result
/// independent of insertion order.
#[must_use]
pub fn config_fingerprint(opts: &ConfigureOpts, deps: &BTreeSet<GhcPkgId>) -> Fingerprint {
    let mut hasher = Sha256::new();
    for opt in &opts.non_path_related {
        update_field(&mut hasher, opt);
    }
    // Separator between the option list and the dependency set, so an
    // option cannot masquerade as a dependency id.
    hasher.update([0u8]);
    for dep in deps {
        update_field(&mut hasher, dep.as_str());
    }
    Fingerprint(URL_SAFE_NO_PAD.encode(hasher.finalize()))
}

fn update_field(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}

/// A fixed-length stand-in for an over-long path segment.
///
/// 22 characters: the first 16 bytes of the segment's SHA-256 digest in
/// unpadded URL-safe base64. Used by the path-length guard; collision
/// risk at 128 bits is accepted as negligible.
#[must_use]
pub fn short_path_segment(segment: &str) -> String {
    let digest = Sha256::digest(segment.as_bytes());
    URL_SAFE_NO_PAD.encode(&digest[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(non_path: &[&str], path: &[&str]) -> ConfigureOpts {
        ConfigureOpts {
            path_related: path.iter().map(ToString::to_string).collect(),
            non_path_related: non_path.iter().map(ToString::to_string).collect(),
        }
    }

    fn deps(ids: &[&str]) -> BTreeSet<GhcPkgId> {
        ids.iter().map(|id| GhcPkgId::new(*id)).collect()
    }

    #[test]
    fn test_fingerprint_is_filesystem_safe() {
        let fp = config_fingerprint(&opts(&["-O2"], &[]), &deps(&["base-4.18"]));
        assert_eq!(fp.as_str().len(), 43);
        assert!(
            fp.as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_fingerprint_ignores_path_options() {
        let a = config_fingerprint(&opts(&["-O2"], &["--prefix=/home/u1"]), &deps(&[]));
        let b = config_fingerprint(&opts(&["-O2"], &["--prefix=/mnt/u2"]), &deps(&[]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_tracks_non_path_options() {
        let a = config_fingerprint(&opts(&["-O2"], &[]), &deps(&[]));
        let b = config_fingerprint(&opts(&["-O0"], &[]), &deps(&[]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_tracks_dependencies() {
        let a = config_fingerprint(&opts(&[], &[]), &deps(&["base-4.18"]));
        let b = config_fingerprint(&opts(&[], &[]), &deps(&["base-4.19"]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_adjacent_fields_do_not_run_together() {
        let a = config_fingerprint(&opts(&["ab", "c"], &[]), &deps(&[]));
        let b = config_fingerprint(&opts(&["a", "bc"], &[]), &deps(&[]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_option_is_not_a_dependency() {
        let a = config_fingerprint(&opts(&["x-1.0"], &[]), &deps(&[]));
        let b = config_fingerprint(&opts(&[], &[]), &deps(&["x-1.0"]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_short_segment_is_fixed_length() {
        assert_eq!(short_path_segment("x").len(), 22);
        assert_eq!(short_path_segment(&"y".repeat(500)).len(), 22);
    }

    #[test]
    fn test_short_segment_is_deterministic() {
        assert_eq!(short_path_segment("abc"), short_path_segment("abc"));
        assert_ne!(short_path_segment("abc"), short_path_segment("abd"));
    }
}
