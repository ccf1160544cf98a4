// src/recipe/validate.rs

//! Settings validation
//!
//! The gate in front of the pipeline. Nothing is generated or executed for
//! settings that fail here.

use crate::error::ConfigError;
use crate::recipe::settings::{CppStandard, OperatingSystem, Settings};
use tracing::debug;

/// Inclusive range of accepted C++ standards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardRange {
    pub min: CppStandard,
    pub max: CppStandard,
}

impl StandardRange {
    pub fn contains(&self, standard: &CppStandard) -> bool {
        self.min.ordinal() <= standard.ordinal() && standard.ordinal() <= self.max.ordinal()
    }

    /// Check a standard against both bounds
    pub fn check(&self, standard: &CppStandard) -> Result<(), ConfigError> {
        if self.contains(standard) {
            return Ok(());
        }

        Err(ConfigError::StandardOutOfRange {
            requested: standard.to_string(),
            min: self.min.to_string(),
            max: self.max.to_string(),
            below_minimum: standard.ordinal() < self.min.ordinal(),
        })
    }
}

/// C++20 through C++23, matching the project's CMakeLists
pub const STANDARD_RANGE: StandardRange = StandardRange {
    min: CppStandard::new(20),
    max: CppStandard::new(23),
};

/// Check that the settings are buildable by this recipe
///
/// The OS check runs first; an unsupported platform is reported even when
/// the standard is also wrong.
pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    let os: OperatingSystem = settings.os.parse()?;
    debug!("Operating system {} is supported", os);

    let standard = settings
        .compiler
        .standard()?
        .ok_or(ConfigError::StandardUndefined)?;
    STANDARD_RANGE.check(&standard)?;
    debug!("C++ standard {} is within [{}, {}]", standard, STANDARD_RANGE.min, STANDARD_RANGE.max);

    Ok(())
}
