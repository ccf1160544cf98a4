// src/recipe/profile.rs

//! Profile parsing
//!
//! A profile is a TOML file carrying the settings and raw option values for
//! one cook:
//!
//! ```toml
//! [settings]
//! os = "Linux"
//! arch = "x86_64"
//! build_type = "Release"
//!
//! [settings.compiler]
//! name = "gcc"
//! version = "13"
//! cppstd = "20"
//!
//! [options]
//! shared = false
//! fPIC = true
//! optimized = 2
//! ```
//!
//! Command-line overrides (`os=Windows`, `compiler.cppstd=23`, `shared=True`)
//! are applied on top with [`Profile::apply_setting`] and
//! [`Profile::apply_option`].

use crate::error::{Error, Result};
use crate::recipe::options::RawOptions;
use crate::recipe::settings::Settings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings plus raw options for one cook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub settings: Settings,

    #[serde(default)]
    pub options: RawOptions,
}

impl Profile {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            options: RawOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RawOptions) -> Self {
        self.options = options;
        self
    }

    /// Override a single setting
    pub fn apply_setting(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "os" => self.settings.os = value.to_string(),
            "arch" => self.settings.arch = value.to_string(),
            "build_type" => {
                self.settings.build_type = value.parse().map_err(Error::ParseError)?;
            }
            "compiler" => self.settings.compiler.name = value.to_string(),
            "compiler.version" => self.settings.compiler.version = Some(value.to_string()),
            "compiler.cppstd" => self.settings.compiler.cppstd = Some(value.to_string()),
            other => {
                return Err(Error::ParseError(format!(
                    "Unknown setting '{}'. Expected os, arch, build_type, compiler, \
                     compiler.version or compiler.cppstd",
                    other
                )));
            }
        }
        Ok(())
    }

    /// Override a single option
    pub fn apply_option(&mut self, key: &str, value: &str) -> Result<()> {
        self.options.set(key, value)
    }

    /// Apply `key=value` overrides in order
    pub fn apply_overrides(&mut self, settings: &[String], options: &[String]) -> Result<()> {
        for assignment in settings {
            let (key, value) = parse_assignment(assignment)?;
            self.apply_setting(key, value)?;
        }
        for assignment in options {
            let (key, value) = parse_assignment(assignment)?;
            self.apply_option(key, value)?;
        }
        Ok(())
    }
}

/// Split `key=value`
pub fn parse_assignment(s: &str) -> Result<(&str, &str)> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => Err(Error::ParseError(format!(
            "Invalid assignment '{}'. Expected key=value",
            s
        ))),
    }
}

/// Parse a profile from a TOML string
pub fn parse_profile(content: &str) -> Result<Profile> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid profile: {}", e)))
}

/// Parse a profile from a file
pub fn parse_profile_file(path: &Path) -> Result<Profile> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read profile {}: {}", path.display(), e)))?;

    parse_profile(&content)
}
