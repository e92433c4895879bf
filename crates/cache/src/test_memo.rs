//! Test-success memoization
//!
//! One marker file per package directory remembers whether the test
//! suite last passed, so `silo test` can skip suites that passed
//! against unchanged inputs. Absent, unreadable, or unrecognized
//! contents all read as "did not pass" — strict equality with the
//! success sentinel, nothing fuzzy.

use silo_core::Result;
use std::fs;
use std::path::Path;

use crate::storage;

/// Marker file name inside a package's cache directory
pub const TEST_SUCCESS_FILE: &str = "test-success";

const SUCCESS_PAYLOAD: &[u8] = b"success";
const FAILURE_PAYLOAD: &[u8] = b"failure";

fn write_marker(dir: &Path, payload: &[u8]) -> Result<()> {
    storage::ensure_dir(dir)?;
    storage::write_atomic(&dir.join(TEST_SUCCESS_FILE), payload)
}

/// Record that the package's test suite passed
pub fn set_test_success(dir: &Path) -> Result<()> {
    write_marker(dir, SUCCESS_PAYLOAD)
}

/// Record that the package's test suite failed
pub fn set_test_failure(dir: &Path) -> Result<()> {
    write_marker(dir, FAILURE_PAYLOAD)
}

/// Whether the package's test suite is recorded as having passed
#[must_use]
pub fn check_test_success(dir: &Path) -> bool {
    fs::read(dir.join(TEST_SUCCESS_FILE))
        .map(|contents| contents == SUCCESS_PAYLOAD)
        .unwrap_or(false)
}
