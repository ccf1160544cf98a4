// src/commands/mod.rs
//! Command handlers for the cnn-recipe CLI

mod cook;
mod generate;
mod inspect;
mod validate;

pub use cook::cmd_cook;
pub use generate::cmd_generate;
pub use inspect::cmd_inspect;
pub use validate::cmd_validate;

use crate::cli::{LayoutArgs, ProfileArgs};
use anyhow::{Context, Result};
use cnn_recipe::recipe::{parse_profile_file, KitchenConfig, Profile};
use std::path::Path;

/// Read the profile and apply `-s`/`-o` overrides
fn load_profile(args: &ProfileArgs) -> Result<Profile> {
    let path = Path::new(&args.profile);
    let mut profile = parse_profile_file(path)
        .with_context(|| format!("Failed to load profile: {}", path.display()))?;

    profile
        .apply_overrides(&args.settings, &args.options)
        .with_context(|| "Invalid command-line override")?;

    Ok(profile)
}

/// Kitchen configuration from the layout flags
fn kitchen_config(layout: &LayoutArgs, jobs: Option<u32>) -> KitchenConfig {
    let mut config = KitchenConfig::for_source(Path::new(&layout.source_dir))
        .with_store_root(&layout.store)
        .with_clean_build_dir(layout.clean);

    if let Some(dir) = &layout.build_dir {
        config = config.with_build_dir(dir);
    }
    if let Some(dir) = &layout.package_dir {
        config = config.with_package_dir(dir);
    }
    if let Some(j) = jobs {
        config = config.with_jobs(j);
    }

    config
}
