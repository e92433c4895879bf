//! Path-length guard for constrained platforms
//!
//! Windows rejects paths at or beyond 260 UTF-16 code units. The
//! precompiled cache composes paths from a content key and a
//! configuration fingerprint, either of which can push a deep root over
//! that limit, so the guard substitutes fixed-length hashes of the two
//! trailing segments when the composed path would not fit. On
//! unconstrained platforms the guard is a no-op.
//!
//! The policy arrives as a plain [`PathLimit`] value chosen at startup;
//! there is no conditional compilation here and the shortening itself
//! is a pure function of its inputs.

use silo_core::env::PathLimit;
use std::path::{Path, PathBuf};

use crate::fingerprint::{Fingerprint, short_path_segment};

/// A path's length in native character units: UTF-16 code units, the
/// measure Windows applies. Characters beyond the Basic Multilingual
/// Plane count as two.
#[must_use]
pub fn native_units(path: &Path) -> usize {
    path.to_string_lossy().chars().map(char::len_utf16).sum()
}

/// Compose `base/content_key/fingerprint`, shortening the two trailing
/// segments when the result would exceed the platform's path limit.
///
/// Shortened paths are deterministic (same inputs, same path) and
/// distinct logical keys stay distinct within hash-collision tolerance.
#[must_use]
pub fn guarded_cache_path(
    limit: &PathLimit,
    base: &Path,
    content_key: &str,
    fingerprint: &Fingerprint,
) -> PathBuf {
    let full = base.join(content_key).join(fingerprint.as_str());
    if !limit.constrained || native_units(&full) < limit.max_units {
        return full;
    }
    base.join(short_path_segment(content_key))
        .join(short_path_segment(fingerprint.as_str()))
}
