// src/recipe/store.rs

//! Dependency package store interface
//!
//! The store that actually fetches and installs `boost`, `opencv` and friends
//! lives outside this crate. The kitchen only needs to know where each pinned
//! requirement ends up on disk so generated descriptors can point at it.

use crate::recipe::format::Requirement;
use std::path::{Path, PathBuf};

/// Maps requirements to their installed prefixes
pub trait PackageStore: Send + Sync {
    /// Install prefix of a requirement (contains `include/`, `lib/`, `bin/`)
    fn prefix(&self, requirement: &Requirement) -> PathBuf;

    /// Directory holding a build tool's executables
    fn bin_dir(&self, requirement: &Requirement) -> PathBuf {
        self.prefix(requirement).join("bin")
    }
}

/// A store laid out as `<root>/<name>/<version>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PackageStore for LocalStore {
    fn prefix(&self, requirement: &Requirement) -> PathBuf {
        self.root.join(requirement.name).join(requirement.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_store_layout() {
        let store = LocalStore::new("/opt/store");
        let boost = Requirement::runtime("boost", "1.85.0");
        assert_eq!(store.prefix(&boost), PathBuf::from("/opt/store/boost/1.85.0"));

        let cmake = Requirement::build_tool("cmake", "3.30.1");
        assert_eq!(store.bin_dir(&cmake), PathBuf::from("/opt/store/cmake/3.30.1/bin"));
    }
}
