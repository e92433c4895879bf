//! Buildable-component identity
//!
//! Each package builds up to five kinds of component, and each gets its
//! own build-cache file. The mapping from component to file name is
//! exhaustive by construction: adding a variant is a compile error
//! until every match arm exists.

use serde::{Deserialize, Serialize};

/// One buildable unit within a package
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedComponent {
    /// The package's main library
    Lib,
    /// A named internal (sub-)library
    SubLib(String),
    /// A named executable
    Exe(String),
    /// A named test suite
    Test(String),
    /// A named benchmark
    Bench(String),
}

impl NamedComponent {
    /// The build-cache file name for this component.
    ///
    /// The main library has a fixed name; every parameterized kind is
    /// `<kind>-<name>`. Kind prefixes are pairwise distinct, so two
    /// different components never alias one file.
    #[must_use]
    pub fn cache_file_name(&self) -> String {
        match self {
            NamedComponent::Lib => "lib".to_string(),
            NamedComponent::SubLib(name) => format!("sub-lib-{name}"),
            NamedComponent::Exe(name) => format!("exe-{name}"),
            NamedComponent::Test(name) => format!("test-{name}"),
            NamedComponent::Bench(name) => format!("bench-{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_names_per_kind() {
        assert_eq!(NamedComponent::Lib.cache_file_name(), "lib");
        assert_eq!(
            NamedComponent::SubLib("impl".to_string()).cache_file_name(),
            "sub-lib-impl"
        );
        assert_eq!(
            NamedComponent::Exe("silo".to_string()).cache_file_name(),
            "exe-silo"
        );
        assert_eq!(
            NamedComponent::Test("spec".to_string()).cache_file_name(),
            "test-spec"
        );
        assert_eq!(
            NamedComponent::Bench("perf".to_string()).cache_file_name(),
            "bench-perf"
        );
    }

    #[test]
    fn test_same_name_different_kind_never_alias() {
        let components = [
            NamedComponent::SubLib("x".to_string()),
            NamedComponent::Exe("x".to_string()),
            NamedComponent::Test("x".to_string()),
            NamedComponent::Bench("x".to_string()),
        ];
        let names: std::collections::BTreeSet<_> =
            components.iter().map(NamedComponent::cache_file_name).collect();
        assert_eq!(names.len(), components.len());
    }
}
