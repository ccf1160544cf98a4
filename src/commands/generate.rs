// src/commands/generate.rs

//! Generate command - write toolchain descriptors without building

use super::{kitchen_config, load_profile};
use crate::cli::{LayoutArgs, ProfileArgs};
use anyhow::Result;
use cnn_recipe::recipe::ProcessRunner;
use cnn_recipe::Kitchen;
use std::sync::Arc;

pub fn cmd_generate(profile_args: &ProfileArgs, layout: &LayoutArgs) -> Result<()> {
    let profile = load_profile(profile_args)?;
    let kitchen = Kitchen::new(kitchen_config(layout, None), Arc::new(ProcessRunner));

    let prepared = kitchen.prepare(&profile).map_err(|e| {
        let stage = e.stage();
        anyhow::Error::new(e).context(format!("Generation stopped at {} stage", stage))
    })?;

    println!("Toolchain: {}", prepared.family);
    for file in prepared.artifacts.files() {
        println!("  {}", file.display());
    }
    println!("Build directory: {}", kitchen.config().build_dir.display());

    Ok(())
}
