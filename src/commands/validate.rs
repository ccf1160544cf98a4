// src/commands/validate.rs

//! Validate command - check a profile without touching the filesystem

use super::load_profile;
use crate::cli::ProfileArgs;
use anyhow::{Context, Result};
use cnn_recipe::recipe::{refine, select, validate};

pub fn cmd_validate(args: &ProfileArgs) -> Result<()> {
    let profile = load_profile(args)?;
    let settings = &profile.settings;

    validate(settings).with_context(|| "Settings validation failed")?;
    println!(
        "[OK] {} {} {} cppstd={}",
        settings.os,
        settings.arch,
        settings.compiler.name,
        settings.compiler.cppstd.as_deref().unwrap_or("-")
    );

    let options = refine(&profile.options, settings);
    let os = settings.operating_system()?;
    println!("Toolchain: {}", select(os));
    println!("Build type: {}", settings.build_type);
    println!("Options:");
    println!("  shared    = {}", options.shared);
    match options.fpic {
        Some(fpic) => println!("  fPIC      = {}", fpic),
        None => println!("  fPIC      = (removed)"),
    }
    println!("  optimized = {}", options.optimized);

    Ok(())
}
