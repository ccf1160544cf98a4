// src/cli/mod.rs
//! CLI definitions for cnn-recipe
//!
//! This module contains the command-line interface definitions using clap.
//! The command implementations are in the `commands` module.
//!
//! - `inspect` - Show recipe metadata, options and requirements
//! - `validate` - Check a profile and show the refined configuration
//! - `generate` - Write toolchain and dependency descriptors
//! - `cook` - Run the full pipeline

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cnn-recipe")]
#[command(author = "Rajiv Sithiravel")]
#[command(version)]
#[command(about = "Recipe engine for the cnn package", long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Profile file plus command-line overrides
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Path to the TOML profile
    #[arg(short, long)]
    pub profile: String,

    /// Setting override, e.g. `-s compiler.cppstd=23` (repeatable)
    #[arg(short = 's', long = "setting", value_name = "KEY=VALUE")]
    pub settings: Vec<String>,

    /// Option override, e.g. `-o shared=True` (repeatable)
    #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
    pub options: Vec<String>,
}

/// Directory layout for generate and cook
#[derive(Args, Debug, Clone)]
pub struct LayoutArgs {
    /// Project source directory
    #[arg(long, default_value = ".")]
    pub source_dir: String,

    /// Build directory (defaults to <source-dir>/build)
    #[arg(long)]
    pub build_dir: Option<String>,

    /// Package directory (defaults to <source-dir>/package)
    #[arg(long)]
    pub package_dir: Option<String>,

    /// Root of the dependency store
    #[arg(long, default_value = "/var/cache/cnn/store")]
    pub store: String,

    /// Remove the build directory before generating
    #[arg(long)]
    pub clean: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show recipe metadata, declared options and requirements
    Inspect,

    /// Validate a profile and show the selected toolchain and options
    Validate {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Validate, refine and generate toolchain descriptors
    Generate {
        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Build and package the recipe
    Cook {
        #[command(flatten)]
        profile: ProfileArgs,

        #[command(flatten)]
        layout: LayoutArgs,

        /// Number of parallel build jobs (default: available CPUs)
        #[arg(short, long)]
        jobs: Option<u32>,
    },
}
