// src/commands/cook.rs

//! Cook command - build and package the recipe

use super::{kitchen_config, load_profile};
use crate::cli::{LayoutArgs, ProfileArgs};
use anyhow::Result;
use cnn_recipe::recipe::ProcessRunner;
use cnn_recipe::{Kitchen, RECIPE};
use std::sync::Arc;
use tracing::info;

/// Cook the recipe for a profile
///
/// # Arguments
/// * `profile_args` - Profile path and overrides
/// * `layout` - Source, build, package and store directories
/// * `jobs` - Number of parallel build jobs (None = auto)
pub fn cmd_cook(profile_args: &ProfileArgs, layout: &LayoutArgs, jobs: Option<u32>) -> Result<()> {
    let profile = load_profile(profile_args)?;
    let config = kitchen_config(layout, jobs);

    println!("Cooking {} for {} ({})", RECIPE.reference(), profile.settings.os, profile.settings.build_type);
    info!(
        "Source: {}, build: {}, package: {}, jobs: {}",
        config.source_dir.display(),
        config.build_dir.display(),
        config.package_dir.display(),
        config.jobs
    );

    let kitchen = Kitchen::new(config, Arc::new(ProcessRunner));
    let result = kitchen.cook(&profile).map_err(|e| {
        let stage = e.stage();
        anyhow::Error::new(e).context(format!("Cook failed at {} stage", stage))
    })?;

    println!("[OK] Cooked {} with {} toolchain", RECIPE.reference(), result.family);
    println!("Package: {}", result.package_dir.display());
    println!("Package ID: {}", result.package_id);
    println!("Manifest: {}", result.manifest_path.display());

    Ok(())
}
