// src/commands/inspect.rs

//! Inspect command - show what the recipe declares

use anyhow::Result;
use cnn_recipe::recipe::{OperatingSystem, RequirementSet, STANDARD_RANGE};
use cnn_recipe::RECIPE;

pub fn cmd_inspect() -> Result<()> {
    println!("Recipe: {}", RECIPE.reference());
    println!("Author: {}", RECIPE.author);
    println!("License: {}", RECIPE.license.unwrap_or("(none)"));
    println!("URL: {}", RECIPE.url.unwrap_or("(none)"));
    println!("Description: {}", RECIPE.description.unwrap_or("(none)"));
    println!("Settings: {}", RECIPE.settings.join(", "));
    println!("Exports: {}", RECIPE.exports_sources.join(", "));

    let defaults = RECIPE.default_options();
    println!();
    println!("Options:");
    for decl in RECIPE.options {
        let default = match decl.name {
            "shared" => python_bool(defaults.shared),
            "fPIC" => python_bool(defaults.position_independent()),
            "optimized" => defaults.optimized.to_string(),
            _ => String::from("-"),
        };
        println!("  {:<10} [{}] (default: {})", decl.name, decl.values.join(", "), default);
    }

    let requirements = RequirementSet::recipe();
    println!();
    println!("Requirements:");
    for req in requirements.runtime() {
        println!("  {}", req);
    }
    println!("Build tools:");
    for req in requirements.build_tools() {
        println!("  {}", req);
    }

    println!();
    println!("C++ standard: {} to {}", STANDARD_RANGE.min, STANDARD_RANGE.max);
    let names: Vec<&str> = OperatingSystem::all().iter().map(|os| os.as_str()).collect();
    println!("Supported OS: {}", names.join(", "));

    Ok(())
}

/// Option values are spelled `True`/`False` in profiles and overrides
fn python_bool(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}
