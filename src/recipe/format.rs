// src/recipe/format.rs

//! Static recipe data
//!
//! Metadata, declared option domains and the requirement table for the
//! `cnn` package. None of this is computed: requirements are pinned and
//! handed to the external package store as-is.

use crate::recipe::options::OptionSet;
use serde::Serialize;
use std::fmt;

/// Whether a requirement is linked into the package or only runs at build time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequirementKind {
    /// Library the package links against
    Runtime,
    /// Tool executed during the build (never linked)
    BuildTool,
}

impl RequirementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::BuildTool => "build-tool",
        }
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pinned `name/version` requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Requirement {
    pub name: &'static str,
    pub version: &'static str,
    pub kind: RequirementKind,
}

impl Requirement {
    pub const fn runtime(name: &'static str, version: &'static str) -> Self {
        Self {
            name,
            version,
            kind: RequirementKind::Runtime,
        }
    }

    pub const fn build_tool(name: &'static str, version: &'static str) -> Self {
        Self {
            name,
            version,
            kind: RequirementKind::BuildTool,
        }
    }

    /// Reference string, e.g. `boost/1.85.0`
    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// The recipe's requirements, in declaration order
pub const REQUIREMENTS: &[Requirement] = &[
    Requirement::runtime("boost", "1.85.0"),
    Requirement::runtime("eigen", "3.4.0"),
    Requirement::runtime("opencv", "4.9.0"),
    Requirement::build_tool("cmake", "3.30.1"),
];

/// Read-only view over a requirement table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequirementSet {
    entries: &'static [Requirement],
}

impl RequirementSet {
    /// The recipe's fixed requirement set
    pub const fn recipe() -> Self {
        Self {
            entries: REQUIREMENTS,
        }
    }

    pub fn all(&self) -> &'static [Requirement] {
        self.entries
    }

    /// Libraries the package links against
    pub fn runtime(&self) -> impl Iterator<Item = &'static Requirement> {
        self.entries
            .iter()
            .filter(|r| r.kind == RequirementKind::Runtime)
    }

    /// Tools needed while building
    pub fn build_tools(&self) -> impl Iterator<Item = &'static Requirement> {
        self.entries
            .iter()
            .filter(|r| r.kind == RequirementKind::BuildTool)
    }

    pub fn get(&self, name: &str) -> Option<&'static Requirement> {
        self.entries.iter().find(|r| r.name == name)
    }
}

impl Default for RequirementSet {
    fn default() -> Self {
        Self::recipe()
    }
}

/// A declared option and its allowed values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDecl {
    pub name: &'static str,
    pub values: &'static [&'static str],
}

/// Package metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub author: &'static str,
    pub license: Option<&'static str>,
    pub url: Option<&'static str>,
    pub description: Option<&'static str>,
    /// Settings keys that affect the binary
    pub settings: &'static [&'static str],
    pub options: &'static [OptionDecl],
    /// Sources shipped alongside the recipe
    pub exports_sources: &'static [&'static str],
}

impl RecipeInfo {
    /// Package reference, e.g. `cnn/1.0`
    pub fn reference(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }

    /// Default option values
    pub fn default_options(&self) -> OptionSet {
        OptionSet::default()
    }
}

/// The `cnn` recipe
pub const RECIPE: RecipeInfo = RecipeInfo {
    name: "cnn",
    version: "1.0",
    author: "Rajiv Sithiravel rajiv.sithiravel@gmail.com",
    license: None,
    url: None,
    description: None,
    settings: &["os", "compiler", "build_type", "arch"],
    options: &[
        OptionDecl {
            name: "shared",
            values: &["True", "False"],
        },
        OptionDecl {
            name: "fPIC",
            values: &["True", "False"],
        },
        OptionDecl {
            name: "optimized",
            values: &["1", "2", "3"],
        },
    ],
    exports_sources: &["CMakeLists.txt", "cnn/*"],
};
