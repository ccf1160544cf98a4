// src/recipe/settings.rs

//! Target environment description
//!
//! `Settings` is what the caller hands the kitchen: which OS, compiler,
//! architecture and build type to cook for. The OS is kept as the raw name
//! the caller supplied so that unsupported platforms survive until the
//! validator can reject them by name.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating systems the recipe can be cooked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingSystem {
    Windows,
    Linux,
    #[serde(rename = "iOS")]
    Ios,
    #[serde(rename = "watchOS")]
    WatchOs,
    #[serde(rename = "tvOS")]
    TvOs,
    #[serde(rename = "visionOS")]
    VisionOs,
    Macos,
    Android,
    FreeBSD,
    SunOS,
    #[serde(rename = "AIX")]
    Aix,
    Arduino,
    Emscripten,
    Neutrino,
    #[serde(rename = "baremetal")]
    Baremetal,
    VxWorks,
}

impl OperatingSystem {
    /// Every supported operating system
    pub fn all() -> &'static [OperatingSystem] {
        &[
            Self::Windows,
            Self::Linux,
            Self::Ios,
            Self::WatchOs,
            Self::TvOs,
            Self::VisionOs,
            Self::Macos,
            Self::Android,
            Self::FreeBSD,
            Self::SunOS,
            Self::Aix,
            Self::Arduino,
            Self::Emscripten,
            Self::Neutrino,
            Self::Baremetal,
            Self::VxWorks,
        ]
    }

    /// Settings name, spelled the way profiles spell it
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "Windows",
            Self::Linux => "Linux",
            Self::Ios => "iOS",
            Self::WatchOs => "watchOS",
            Self::TvOs => "tvOS",
            Self::VisionOs => "visionOS",
            Self::Macos => "Macos",
            Self::Android => "Android",
            Self::FreeBSD => "FreeBSD",
            Self::SunOS => "SunOS",
            Self::Aix => "AIX",
            Self::Arduino => "Arduino",
            Self::Emscripten => "Emscripten",
            Self::Neutrino => "Neutrino",
            Self::Baremetal => "baremetal",
            Self::VxWorks => "VxWorks",
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OperatingSystem {
    type Err = ConfigError;

    /// Exact, case-sensitive match against the supported names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|os| os.as_str() == s)
            .ok_or_else(|| ConfigError::UnsupportedPlatform(s.to_string()))
    }
}

/// Build configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "Debug",
            Self::Release => "Release",
            Self::RelWithDebInfo => "RelWithDebInfo",
            Self::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Debug" => Ok(Self::Debug),
            "Release" => Ok(Self::Release),
            "RelWithDebInfo" => Ok(Self::RelWithDebInfo),
            "MinSizeRel" => Ok(Self::MinSizeRel),
            other => Err(format!(
                "Unknown build_type '{}'. Expected Debug, Release, RelWithDebInfo or MinSizeRel",
                other
            )),
        }
    }
}

/// A C++ language standard as written in `compiler.cppstd`
///
/// Accepts plain (`20`) and GNU-extension (`gnu20`) spellings. Two-digit
/// years are compared through [`CppStandard::ordinal`]. Only `98` belongs
/// to the 1900s, so it sorts before `11` while `95` sorts after `23`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CppStandard {
    year: u32,
    gnu: bool,
}

impl CppStandard {
    pub const fn new(year: u32) -> Self {
        Self { year, gnu: false }
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn is_gnu(&self) -> bool {
        self.gnu
    }

    /// Four-digit year, used to order standards across the century
    pub fn ordinal(&self) -> u32 {
        if self.year == 98 {
            1900 + self.year
        } else {
            2000 + self.year
        }
    }
}

impl fmt::Display for CppStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.gnu {
            write!(f, "gnu{}", self.year)
        } else {
            write!(f, "{}", self.year)
        }
    }
}

impl FromStr for CppStandard {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (digits, gnu) = match trimmed.strip_prefix("gnu") {
            Some(rest) => (rest, true),
            None => (trimmed, false),
        };

        if digits.is_empty() || digits.len() > 2 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidStandard(s.to_string()));
        }

        let year = digits
            .parse()
            .map_err(|_| ConfigError::InvalidStandard(s.to_string()))?;
        Ok(Self { year, gnu })
    }
}

/// Compiler sub-settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compiler {
    /// Compiler family (gcc, clang, msvc, apple-clang, ...)
    pub name: String,

    /// Compiler version
    #[serde(default)]
    pub version: Option<String>,

    /// Requested C++ standard, unparsed (`20`, `gnu23`)
    #[serde(default)]
    pub cppstd: Option<String>,
}

impl Compiler {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            cppstd: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_cppstd(mut self, cppstd: impl Into<String>) -> Self {
        self.cppstd = Some(cppstd.into());
        self
    }

    /// Parse the requested standard, if any
    pub fn standard(&self) -> Result<Option<CppStandard>, ConfigError> {
        self.cppstd.as_deref().map(str::parse).transpose()
    }
}

/// The target environment for one cook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Operating system name as supplied by the caller
    pub os: String,

    /// Compiler and its sub-settings
    pub compiler: Compiler,

    /// Target architecture (x86_64, armv8, ...)
    pub arch: String,

    /// Build configuration
    #[serde(default)]
    pub build_type: BuildType,
}

impl Settings {
    pub fn new(os: impl Into<String>, compiler: Compiler, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            compiler,
            arch: arch.into(),
            build_type: BuildType::default(),
        }
    }

    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    /// Resolve the OS name to a supported operating system
    pub fn operating_system(&self) -> Result<OperatingSystem, ConfigError> {
        self.os.parse()
    }

    /// True when the OS name is exactly `Windows`
    pub fn is_windows(&self) -> bool {
        self.os == OperatingSystem::Windows.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_roundtrip_names() {
        assert_eq!(OperatingSystem::all().len(), 16);
        for os in OperatingSystem::all() {
            assert_eq!(os.as_str().parse::<OperatingSystem>().unwrap(), *os);
        }
    }

    #[test]
    fn test_os_parse_is_case_sensitive() {
        assert!("linux".parse::<OperatingSystem>().is_err());
        assert!("macOS".parse::<OperatingSystem>().is_err());
        assert_eq!(
            "Haiku".parse::<OperatingSystem>(),
            Err(ConfigError::UnsupportedPlatform("Haiku".to_string()))
        );
    }

    #[test]
    fn test_os_serde_names() {
        let os: OperatingSystem = toml::Value::String("baremetal".into()).try_into().unwrap();
        assert_eq!(os, OperatingSystem::Baremetal);
        let os: OperatingSystem = toml::Value::String("iOS".into()).try_into().unwrap();
        assert_eq!(os, OperatingSystem::Ios);
    }

    #[test]
    fn test_cppstd_parse() {
        let std: CppStandard = "20".parse().unwrap();
        assert_eq!(std.year(), 20);
        assert!(!std.is_gnu());

        let std: CppStandard = "gnu23".parse().unwrap();
        assert_eq!(std.year(), 23);
        assert!(std.is_gnu());
        assert_eq!(std.to_string(), "gnu23");

        assert!("c++20".parse::<CppStandard>().is_err());
        assert!("".parse::<CppStandard>().is_err());
        assert!("2020".parse::<CppStandard>().is_err());
        assert!("gnu".parse::<CppStandard>().is_err());
    }

    #[test]
    fn test_cppstd_ordering() {
        let std98: CppStandard = "98".parse().unwrap();
        let std11: CppStandard = "11".parse().unwrap();
        let std20: CppStandard = "20".parse().unwrap();
        let gnu20: CppStandard = "gnu20".parse().unwrap();

        assert!(std98.ordinal() < std11.ordinal());
        assert!(std11.ordinal() < std20.ordinal());
        assert_eq!(std20.ordinal(), gnu20.ordinal());
        assert_ne!(std20, gnu20);
    }

    #[test]
    fn test_build_type_parse() {
        assert_eq!("Debug".parse::<BuildType>().unwrap(), BuildType::Debug);
        assert_eq!(
            "RelWithDebInfo".parse::<BuildType>().unwrap(),
            BuildType::RelWithDebInfo
        );
        assert!("release".parse::<BuildType>().is_err());
        assert_eq!(BuildType::default(), BuildType::Release);
    }

    #[test]
    fn test_settings_windows() {
        let settings = Settings::new("Windows", Compiler::new("msvc"), "x86_64");
        assert!(settings.is_windows());
        assert_eq!(
            settings.operating_system().unwrap(),
            OperatingSystem::Windows
        );

        let settings = Settings::new("Linux", Compiler::new("gcc"), "x86_64");
        assert!(!settings.is_windows());
    }
}
