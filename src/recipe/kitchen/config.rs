// src/recipe/kitchen/config.rs

//! Configuration types for the Kitchen

use crate::error::GenerationError;
use crate::recipe::options::OptionSet;
use crate::recipe::toolchain::{GeneratedArtifacts, Layout, ToolchainFamily};
use std::path::{Path, PathBuf};

/// Configuration for the Kitchen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitchenConfig {
    /// Project sources (CMakeLists.txt, cnn/)
    pub source_dir: PathBuf,
    /// Generated descriptors and the build tree go here
    pub build_dir: PathBuf,
    /// Install destination
    pub package_dir: PathBuf,
    /// Root of the dependency store (`<root>/<name>/<version>`)
    pub store_root: PathBuf,
    /// Number of parallel jobs
    pub jobs: u32,
    /// Wipe the build directory before generating
    pub clean_build_dir: bool,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        Self {
            source_dir: PathBuf::from("."),
            build_dir: PathBuf::from("build"),
            package_dir: PathBuf::from("package"),
            store_root: PathBuf::from("/var/cache/cnn/store"),
            jobs,
            clean_build_dir: false,
        }
    }
}

impl KitchenConfig {
    /// Configuration rooted at a source directory
    ///
    /// Build and package directories default to `build/` and `package/`
    /// under the source directory.
    pub fn for_source(source_dir: &Path) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            build_dir: source_dir.join("build"),
            package_dir: source_dir.join("package"),
            ..Self::default()
        }
    }

    pub fn with_build_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.build_dir = dir.into();
        self
    }

    pub fn with_package_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.package_dir = dir.into();
        self
    }

    pub fn with_store_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.store_root = root.into();
        self
    }

    /// Set the job count; zero is treated as one
    pub fn with_jobs(mut self, jobs: u32) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_clean_build_dir(mut self, clean: bool) -> Self {
        self.clean_build_dir = clean;
        self
    }

    /// Directory layout for a cook, resolved against the current directory
    ///
    /// Build steps run from the source dir, the build dir and the build tree,
    /// so every path they receive must be absolute.
    pub fn layout(&self) -> Result<Layout, GenerationError> {
        Ok(Layout::new(
            absolute(&self.source_dir)?,
            absolute(&self.build_dir)?,
            absolute(&self.package_dir)?,
        ))
    }
}

fn absolute(path: &Path) -> Result<PathBuf, GenerationError> {
    std::path::absolute(path).map_err(|e| GenerationError::new(path, e))
}

/// Result of cooking the recipe
#[derive(Debug)]
pub struct CookResult {
    /// Toolchain family used for every stage
    pub family: ToolchainFamily,
    /// Refined options the package was built with
    pub options: OptionSet,
    /// Descriptors written by the generate stage
    pub artifacts: GeneratedArtifacts,
    /// Where the package was installed
    pub package_dir: PathBuf,
    /// Content hash of settings, options and requirements
    pub package_id: String,
    /// Path of the written `cnninfo.json`
    pub manifest_path: PathBuf,
}

/// Result of a generate-only run
#[derive(Debug)]
pub struct PrepareResult {
    pub family: ToolchainFamily,
    pub options: OptionSet,
    pub artifacts: GeneratedArtifacts,
}
