// src/recipe/kitchen/package.rs

//! Package identity and the `cnninfo.json` manifest
//!
//! The package id is the SHA-256 of a canonical JSON rendering of the
//! settings, refined options and requirements. Anything that changes the
//! binary changes the id.

use crate::error::PackageError;
use crate::recipe::format::{Requirement, RequirementSet, RECIPE};
use crate::recipe::options::OptionSet;
use crate::recipe::settings::Settings;
use crate::recipe::toolchain::ToolchainFamily;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Manifest file name inside the package directory
pub const MANIFEST_FILE: &str = "cnninfo.json";

#[derive(Serialize)]
struct IdentityInput<'a> {
    settings: &'a Settings,
    options: &'a OptionSet,
    requirements: Vec<String>,
}

/// Hex SHA-256 over settings, options and requirements
pub fn package_id(
    settings: &Settings,
    options: &OptionSet,
    requirements: &RequirementSet,
) -> Result<String, PackageError> {
    let input = IdentityInput {
        settings,
        options,
        requirements: requirements
            .all()
            .iter()
            .map(|r| format!("{}:{}", r.kind, r.reference()))
            .collect(),
    };

    // Struct fields serialize in declaration order, so the rendering is stable
    let canonical = serde_json::to_vec(&input).map_err(|e| PackageError::Manifest {
        path: PathBuf::from(MANIFEST_FILE),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    Ok(hex::encode(Sha256::digest(&canonical)))
}

/// Contents of `cnninfo.json`
#[derive(Debug, Clone, Serialize)]
pub struct PackageManifest<'a> {
    pub name: &'static str,
    pub version: &'static str,
    pub package_id: String,
    pub family: ToolchainFamily,
    pub settings: &'a Settings,
    pub options: &'a OptionSet,
    pub requires: Vec<&'static Requirement>,
}

impl<'a> PackageManifest<'a> {
    pub fn new(
        settings: &'a Settings,
        options: &'a OptionSet,
        requirements: &RequirementSet,
        family: ToolchainFamily,
    ) -> Result<Self, PackageError> {
        Ok(Self {
            name: RECIPE.name,
            version: RECIPE.version,
            package_id: package_id(settings, options, requirements)?,
            family,
            settings,
            options,
            requires: requirements.all().iter().collect(),
        })
    }

    /// Write the manifest into the package directory
    pub fn write(&self, package_dir: &Path) -> Result<PathBuf, PackageError> {
        let path = package_dir.join(MANIFEST_FILE);
        let manifest_error = |source: std::io::Error| PackageError::Manifest {
            path: path.clone(),
            source,
        };

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| manifest_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;

        fs::create_dir_all(package_dir).map_err(manifest_error)?;
        fs::write(&path, json).map_err(manifest_error)?;
        debug!("Wrote package manifest {}", path.display());

        Ok(path)
    }
}
