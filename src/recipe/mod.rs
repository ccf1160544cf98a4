// src/recipe/mod.rs

//! The `cnn` recipe and the kitchen that cooks it
//!
//! A recipe is static data (metadata, option domains, pinned requirements)
//! plus the stages that turn a profile into an installed package:
//! validate, refine, select, generate, build and package.
//!
//! # Culinary Terminology
//!
//! - **Recipe**: the `cnn/1.0` declaration in [`format`]
//! - **Profile**: the settings and options for one cook
//! - **Kitchen**: the pipeline runner
//! - **Cook**: one run of the pipeline
//!
//! # Example Profile
//!
//! ```toml
//! [settings]
//! os = "Linux"
//! arch = "x86_64"
//!
//! [settings.compiler]
//! name = "gcc"
//! cppstd = "20"
//!
//! [options]
//! shared = true
//! ```

pub mod format;
pub mod kitchen;
pub mod options;
pub mod profile;
pub mod settings;
pub mod store;
pub mod toolchain;
pub mod validate;

pub use format::{Requirement, RequirementKind, RequirementSet, RecipeInfo, RECIPE, REQUIREMENTS};
pub use kitchen::{
    package_id, CommandRunner, CookResult, Kitchen, KitchenConfig, PackageManifest, PrepareResult,
    ProcessRunner, Step, StepCommand, StepOutput, MANIFEST_FILE,
};
pub use options::{refine, OptimizationLevel, OptionSet, RawOptions};
pub use profile::{parse_profile, parse_profile_file, Profile};
pub use settings::{BuildType, Compiler, CppStandard, OperatingSystem, Settings};
pub use store::{LocalStore, PackageStore};
pub use toolchain::{
    select, Autotools, BuildContext, CMake, GeneratedArtifacts, Layout, Toolchain, ToolchainFamily,
};
pub use validate::{validate, StandardRange, STANDARD_RANGE};
