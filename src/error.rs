// src/error.rs

//! Error types for the recipe pipeline
//!
//! Each pipeline stage has its own error enum so the caller can tell exactly
//! where a cook stopped. The crate-level [`Error`] wraps all of them.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Pipeline stage that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Reading and parsing the profile (settings + raw options)
    Profile,
    /// Settings validation
    Validate,
    /// Writing toolchain and dependency descriptors
    Generate,
    /// Configure/build steps of the selected toolchain
    Build,
    /// Install step and package manifest
    Package,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Validate => "validate",
            Self::Generate => "generate",
            Self::Build => "build",
            Self::Package => "package",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settings rejected by the validator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Operating system is not in the supported set
    #[error("No support for the operating system: {0}")]
    UnsupportedPlatform(String),

    /// Requested language standard is outside the accepted range
    #[error("C++ standard {requested} is out of range: requires {min} <= cppstd <= {max}")]
    StandardOutOfRange {
        requested: String,
        min: String,
        max: String,
        /// True when the request was below `min`, false when above `max`
        below_minimum: bool,
    },

    /// No language standard was given, so the range cannot be checked
    #[error("compiler.cppstd is not defined for this configuration")]
    StandardUndefined,

    /// A language standard that does not parse as a standard at all
    #[error("Invalid C++ standard: {0}")]
    InvalidStandard(String),
}

impl ConfigError {
    /// Whether the standard was rejected for being too old
    pub fn is_standard_too_low(&self) -> bool {
        matches!(self, Self::StandardOutOfRange { below_minimum: true, .. })
    }

    /// Whether the standard was rejected for being too new
    pub fn is_standard_too_high(&self) -> bool {
        matches!(self, Self::StandardOutOfRange { below_minimum: false, .. })
    }
}

/// Failure while writing generated artifacts
#[derive(Debug, Error)]
#[error("Failed to generate {}: {source}", .path.display())]
pub struct GenerationError {
    /// File or directory that could not be written
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

impl GenerationError {
    pub fn new(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}

/// An external build step exited non-zero or could not be run
#[derive(Debug, Clone, Error)]
#[error("{step} step failed with exit code {}\n{output}", exit_label(.exit_code))]
pub struct BuildError {
    /// Step name (configure, build, autoreconf, make)
    pub step: String,
    /// Exit status, `None` if the process was killed or never started
    pub exit_code: Option<i32>,
    /// Captured diagnostic output
    pub output: String,
}

/// Failure of the install step or the package manifest
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("install step failed with exit code {}\n{output}", exit_label(.exit_code))]
    InstallFailed {
        exit_code: Option<i32>,
        output: String,
    },

    #[error("Failed to write package manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated)".to_string(),
    }
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Package(#[from] PackageError),

    /// Malformed profile, override or option value
    #[error("Parse error: {0}")]
    ParseError(String),

    /// I/O outside of the generate/package stages (profile reading)
    #[error("I/O error: {0}")]
    IoError(String),
}

impl Error {
    /// The stage that produced this error
    pub fn stage(&self) -> Stage {
        match self {
            Self::Config(_) => Stage::Validate,
            Self::Generation(_) => Stage::Generate,
            Self::Build(_) => Stage::Build,
            Self::Package(_) => Stage::Package,
            Self::ParseError(_) | Self::IoError(_) => Stage::Profile,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
