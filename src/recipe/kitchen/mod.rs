// src/recipe/kitchen/mod.rs

//! Kitchen: the pipeline that cooks the `cnn` recipe
//!
//! A cook walks one profile through five strictly sequential stages:
//! - Validate the settings against the supported platforms and C++ range
//! - Refine the options (platform rule, then value rule)
//! - Select the toolchain family from the target OS
//! - Generate the family's toolchain and dependency descriptors
//! - Build, install and write the package manifest
//!
//! The first failure stops the pipeline. External steps run through a
//! [`CommandRunner`], so the kitchen itself never spawns processes.

mod config;
mod package;
pub mod runner;

pub use config::{CookResult, KitchenConfig, PrepareResult};
pub use package::{package_id, PackageManifest, MANIFEST_FILE};
pub use runner::{CommandRunner, ProcessRunner, Step, StepCommand, StepOutput};

use crate::error::{ConfigError, GenerationError, Result};
use crate::recipe::format::{RequirementSet, RECIPE};
use crate::recipe::options::{refine, OptionSet};
use crate::recipe::profile::Profile;
use crate::recipe::settings::CppStandard;
use crate::recipe::store::{LocalStore, PackageStore};
use crate::recipe::toolchain::{select, BuildContext, GeneratedArtifacts, Layout, Toolchain};
use crate::recipe::validate::validate;
use std::fs;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The Kitchen: where the recipe is cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
    runner: Arc<dyn CommandRunner>,
    store: Arc<dyn PackageStore>,
}

/// Everything decided before anything is written
struct Plan {
    standard: CppStandard,
    options: OptionSet,
    toolchain: Box<dyn Toolchain>,
}

impl Kitchen {
    /// Create a Kitchen backed by a [`LocalStore`] at `config.store_root`
    ///
    /// A relative store root is resolved against the current directory now,
    /// since store paths end up in descriptors read from other directories.
    pub fn new(config: KitchenConfig, runner: Arc<dyn CommandRunner>) -> Self {
        let store_root = std::path::absolute(&config.store_root).unwrap_or_else(|e| {
            warn!("Could not resolve store root {}: {}", config.store_root.display(), e);
            config.store_root.clone()
        });
        let store = Arc::new(LocalStore::new(store_root));
        Self {
            config,
            runner,
            store,
        }
    }

    /// Create a Kitchen with a custom dependency store
    pub fn with_store(
        config: KitchenConfig,
        runner: Arc<dyn CommandRunner>,
        store: Arc<dyn PackageStore>,
    ) -> Self {
        Self {
            config,
            runner,
            store,
        }
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Validate, refine and select
    fn plan(&self, profile: &Profile) -> Result<Plan> {
        let settings = &profile.settings;

        info!("Validating settings (os={}, compiler={})", settings.os, settings.compiler.name);
        validate(settings)?;
        let standard = settings
            .compiler
            .standard()?
            .ok_or(ConfigError::StandardUndefined)?;

        let options = refine(&profile.options, settings);
        debug!(
            "Refined options: shared={}, fPIC={:?}, optimized={}",
            options.shared, options.fpic, options.optimized
        );

        let os = settings.operating_system()?;
        let family = select(os);
        info!("Selected {} toolchain for {}", family, os);

        Ok(Plan {
            standard,
            options,
            toolchain: family.toolchain(),
        })
    }

    fn context<'a>(&'a self, profile: &'a Profile, plan: &'a Plan, layout: &'a Layout) -> BuildContext<'a> {
        BuildContext {
            settings: &profile.settings,
            standard: plan.standard,
            options: &plan.options,
            requirements: RequirementSet::recipe(),
            store: self.store.as_ref(),
            layout,
            jobs: self.config.jobs,
        }
    }

    fn generate(&self, plan: &Plan, ctx: &BuildContext<'_>) -> Result<GeneratedArtifacts> {
        if self.config.clean_build_dir && ctx.layout.build_dir.exists() {
            info!("Cleaning build directory {}", ctx.layout.build_dir.display());
            fs::remove_dir_all(&ctx.layout.build_dir)
                .map_err(|e| GenerationError::new(&ctx.layout.build_dir, e))?;
        }

        let artifacts = plan.toolchain.generate(ctx)?;
        for file in artifacts.files() {
            debug!("Generated {}", file.display());
        }
        Ok(artifacts)
    }

    /// Run validate, refine, select and generate without building
    pub fn prepare(&self, profile: &Profile) -> Result<PrepareResult> {
        info!("Preparing {}", RECIPE.reference());

        let plan = self.plan(profile)?;
        let layout = self.config.layout()?;
        let ctx = self.context(profile, &plan, &layout);
        let artifacts = self.generate(&plan, &ctx)?;

        Ok(PrepareResult {
            family: plan.toolchain.family(),
            options: plan.options,
            artifacts,
        })
    }

    /// Cook the recipe for a profile
    ///
    /// ## Cooking Process
    /// 1. **Validate**: reject unsupported OS or C++ standard
    /// 2. **Refine**: drop options that do not apply
    /// 3. **Select**: pick one toolchain family for every later stage
    /// 4. **Generate**: write toolchain and dependency descriptors
    /// 5. **Build**: run the family's steps, stopping at the first failure
    /// 6. **Package**: install into the package directory and write the manifest
    pub fn cook(&self, profile: &Profile) -> Result<CookResult> {
        info!("Cooking {}", RECIPE.reference());

        let plan = self.plan(profile)?;
        let layout = self.config.layout()?;
        let ctx = self.context(profile, &plan, &layout);

        let artifacts = self.generate(&plan, &ctx)?;

        info!("Building with {} toolchain", plan.toolchain.family());
        plan.toolchain.build(&ctx, &artifacts, self.runner.as_ref())?;

        info!("Packaging into {}", layout.package_dir.display());
        plan.toolchain.install(&ctx, self.runner.as_ref())?;

        let manifest = PackageManifest::new(
            &profile.settings,
            &plan.options,
            &ctx.requirements,
            plan.toolchain.family(),
        )?;
        let manifest_path = manifest.write(&layout.package_dir)?;

        info!("Cooked {} (package id {})", RECIPE.reference(), manifest.package_id);

        Ok(CookResult {
            family: plan.toolchain.family(),
            options: plan.options,
            artifacts,
            package_dir: layout.package_dir.clone(),
            package_id: manifest.package_id,
            manifest_path,
        })
    }
}
