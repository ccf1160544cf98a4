// src/lib.rs

//! cnn-recipe
//!
//! Recipe engine for the `cnn` convolutional neural network package.
//! Validates a target configuration, picks a toolchain family from the
//! operating system, generates toolchain and dependency descriptors, and
//! drives the external build, install and packaging steps.
//!
//! # Architecture
//!
//! - Static recipe: metadata, option domains and pinned requirements
//! - Strict pipeline: validate, refine, select, generate, build, package
//! - One toolchain strategy per cook: CMake or Autotools
//! - External processes behind a runner trait

mod error;
pub mod recipe;

pub use error::{
    BuildError, ConfigError, Error, GenerationError, PackageError, Result, Stage,
};
pub use recipe::{CookResult, Kitchen, KitchenConfig, Profile, RECIPE};
