// src/recipe/options.rs

//! Recipe options and their refinement
//!
//! Callers supply [`RawOptions`] where every value is optional; anything left
//! out takes the recipe default. Refinement then removes options that do not
//! apply to the target:
//!
//! 1. **Declaration** ([`OptionSet::declare`]): on Windows `fPIC` does not exist.
//! 2. **Configure** ([`OptionSet::configure`]): a shared build has no `fPIC`.
//!
//! A removed option is `None`, never a default value.

use crate::error::{Error, Result};
use crate::recipe::settings::Settings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Value of the `optimized` option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OptimizationLevel {
    #[default]
    O1,
    O2,
    O3,
}

impl OptimizationLevel {
    pub fn all() -> &'static [OptimizationLevel] {
        &[Self::O1, Self::O2, Self::O3]
    }

    pub fn level(&self) -> u8 {
        match self {
            Self::O1 => 1,
            Self::O2 => 2,
            Self::O3 => 3,
        }
    }

    /// Compiler flag for this level
    pub fn flag(&self) -> &'static str {
        match self {
            Self::O1 => "-O1",
            Self::O2 => "-O2",
            Self::O3 => "-O3",
        }
    }
}

impl TryFrom<i64> for OptimizationLevel {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            1 => Ok(Self::O1),
            2 => Ok(Self::O2),
            3 => Ok(Self::O3),
            other => Err(Error::ParseError(format!(
                "'{}' is not a valid 'options.optimized' value. Possible values are [1, 2, 3]",
                other
            ))),
        }
    }
}

impl FromStr for OptimizationLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value: i64 = s.trim().parse().map_err(|_| {
            Error::ParseError(format!(
                "'{}' is not a valid 'options.optimized' value. Possible values are [1, 2, 3]",
                s
            ))
        })?;
        Self::try_from(value)
    }
}

impl fmt::Display for OptimizationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

impl Serialize for OptimizationLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.level())
    }
}

impl<'de> Deserialize<'de> for OptimizationLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// Options as supplied by the caller, before defaults and refinement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOptions {
    #[serde(default)]
    pub shared: Option<bool>,

    #[serde(default, rename = "fPIC")]
    pub fpic: Option<bool>,

    #[serde(default)]
    pub optimized: Option<OptimizationLevel>,
}

impl RawOptions {
    /// Set one option from a `name=value` pair
    ///
    /// Option names are the recipe's (`shared`, `fPIC`, `optimized`); values
    /// must be inside the declared domain.
    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "shared" => self.shared = Some(parse_bool_option(name, value)?),
            "fPIC" => self.fpic = Some(parse_bool_option(name, value)?),
            "optimized" => self.optimized = Some(value.parse()?),
            other => {
                return Err(Error::ParseError(format!(
                    "option '{}' doesn't exist. Possible options are [shared, fPIC, optimized]",
                    other
                )));
            }
        }
        Ok(())
    }
}

fn parse_bool_option(name: &str, value: &str) -> Result<bool> {
    match value.trim() {
        "True" | "true" => Ok(true),
        "False" | "false" => Ok(false),
        other => Err(Error::ParseError(format!(
            "'{}' is not a valid 'options.{}' value. Possible values are [True, False]",
            other, name
        ))),
    }
}

/// Refined option values for one cook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OptionSet {
    pub shared: bool,

    /// Position-independent code; `None` when the option does not apply
    #[serde(rename = "fPIC", skip_serializing_if = "Option::is_none")]
    pub fpic: Option<bool>,

    pub optimized: OptimizationLevel,
}

impl Default for OptionSet {
    /// Recipe defaults: static, fPIC on, optimized=1
    fn default() -> Self {
        Self {
            shared: false,
            fpic: Some(true),
            optimized: OptimizationLevel::O1,
        }
    }
}

impl OptionSet {
    /// Fill unset raw options with recipe defaults
    pub fn from_raw(raw: &RawOptions) -> Self {
        let defaults = Self::default();
        Self {
            shared: raw.shared.unwrap_or(defaults.shared),
            fpic: raw.fpic.or(defaults.fpic),
            optimized: raw.optimized.unwrap_or(defaults.optimized),
        }
    }

    /// Platform rule: `fPIC` is not declared on Windows
    pub fn declare(self, settings: &Settings) -> Self {
        if settings.is_windows() && self.fpic.is_some() {
            debug!("Removing fPIC: not applicable on Windows");
            return Self { fpic: None, ..self };
        }
        self
    }

    /// Value rule: shared builds drop `fPIC`
    pub fn configure(self) -> Self {
        if self.shared && self.fpic.is_some() {
            debug!("Removing fPIC: shared build");
            return Self { fpic: None, ..self };
        }
        self
    }

    /// Whether position-independent code is requested
    pub fn position_independent(&self) -> bool {
        self.fpic.unwrap_or(false)
    }
}

/// Apply defaults, then the platform rule, then the value rule
pub fn refine(raw: &RawOptions, settings: &Settings) -> OptionSet {
    let refined = OptionSet::from_raw(raw).declare(settings).configure();

    if raw.fpic.is_some() && refined.fpic.is_none() {
        warn!(
            "Option fPIC was set but does not apply (os={}, shared={}); ignoring it",
            settings.os, refined.shared
        );
    }

    refined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::settings::Compiler;

    fn settings(os: &str) -> Settings {
        Settings::new(os, Compiler::new("gcc").with_cppstd("20"), "x86_64")
    }

    #[test]
    fn test_defaults() {
        let options = refine(&RawOptions::default(), &settings("Linux"));
        assert!(!options.shared);
        assert_eq!(options.fpic, Some(true));
        assert_eq!(options.optimized, OptimizationLevel::O1);
    }

    #[test]
    fn test_windows_removes_fpic() {
        let options = refine(&RawOptions::default(), &settings("Windows"));
        assert_eq!(options.fpic, None);
        assert!(!options.shared);
    }

    #[test]
    fn test_shared_removes_fpic() {
        let raw = RawOptions {
            shared: Some(true),
            fpic: Some(true),
            optimized: None,
        };
        let options = refine(&raw, &settings("Linux"));
        assert!(options.shared);
        assert_eq!(options.fpic, None);
    }

    #[test]
    fn test_static_keeps_explicit_fpic_false() {
        let raw = RawOptions {
            fpic: Some(false),
            ..Default::default()
        };
        let options = refine(&raw, &settings("FreeBSD"));
        assert_eq!(options.fpic, Some(false));
        assert!(!options.position_independent());
    }

    #[test]
    fn test_rules_idempotent() {
        let linux = settings("Linux");
        let windows = settings("Windows");

        for shared in [false, true] {
            for fpic in [None, Some(false), Some(true)] {
                for optimized in OptimizationLevel::all() {
                    let base = OptionSet {
                        shared,
                        fpic,
                        optimized: *optimized,
                    };

                    let once = base.declare(&windows);
                    assert_eq!(once.declare(&windows), once);

                    let once = base.configure();
                    assert_eq!(once.configure(), once);

                    let once = base.declare(&linux).configure();
                    assert_eq!(once.declare(&linux).configure(), once);
                }
            }
        }
    }

    #[test]
    fn test_late_shared_change_still_removes_fpic() {
        // Linux keeps fPIC at declaration time, a later shared=true drops it
        let declared = OptionSet::default().declare(&settings("Linux"));
        assert_eq!(declared.fpic, Some(true));

        let configured = OptionSet {
            shared: true,
            ..declared
        }
        .configure();
        assert_eq!(configured.fpic, None);
    }

    #[test]
    fn test_raw_set() {
        let mut raw = RawOptions::default();
        raw.set("shared", "True").unwrap();
        raw.set("fPIC", "false").unwrap();
        raw.set("optimized", "3").unwrap();
        assert_eq!(raw.shared, Some(true));
        assert_eq!(raw.fpic, Some(false));
        assert_eq!(raw.optimized, Some(OptimizationLevel::O3));
    }

    #[test]
    fn test_raw_set_rejects_out_of_domain() {
        let mut raw = RawOptions::default();
        assert!(raw.set("optimized", "4").is_err());
        assert!(raw.set("optimized", "fast").is_err());
        assert!(raw.set("shared", "yes").is_err());
        assert!(raw.set("lto", "True").is_err());
        assert_eq!(raw, RawOptions::default());
    }

    #[test]
    fn test_option_set_serialization_omits_removed_fpic() {
        let options = OptionSet {
            shared: true,
            fpic: None,
            optimized: OptimizationLevel::O2,
        };
        let json = serde_json::to_value(options).unwrap();
        assert_eq!(json["shared"], true);
        assert_eq!(json["optimized"], 2);
        assert!(json.get("fPIC").is_none());
    }
}
