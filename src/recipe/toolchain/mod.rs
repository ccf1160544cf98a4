// src/recipe/toolchain/mod.rs

//! Toolchain families and the strategies that drive them
//!
//! The target OS picks one of two families:
//!
//! | Family | OS | Generates | Builds with |
//! |--------|----|-----------|-------------|
//! | `ProjectGenerator` | Windows, Linux | CMake toolchain + deps files | `cmake` configure, `cmake --build` |
//! | `ScriptBased` | everything else | shell toolchain + pkg-config files | `autoreconf`, `configure`, `make` |
//!
//! The family is chosen once with [`select`] and turned into a single
//! [`Toolchain`] strategy object that both generates and builds, so the two
//! stages can never disagree about the family.

mod autotools;
mod cmake;

pub use autotools::Autotools;
pub use cmake::CMake;

use crate::error::{BuildError, GenerationError, PackageError};
use crate::recipe::format::RequirementSet;
use crate::recipe::kitchen::runner::{CommandRunner, Step, StepCommand};
use crate::recipe::options::OptionSet;
use crate::recipe::settings::{CppStandard, OperatingSystem, Settings};
use crate::recipe::store::PackageStore;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Build-driver strategy family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ToolchainFamily {
    /// Project-file generator (CMake)
    ProjectGenerator,
    /// Configure script + make (Autotools)
    ScriptBased,
}

impl ToolchainFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectGenerator => "project-generator",
            Self::ScriptBased => "script-based",
        }
    }

    /// Strategy object for this family
    pub fn toolchain(&self) -> Box<dyn Toolchain> {
        match self {
            Self::ProjectGenerator => Box::new(CMake),
            Self::ScriptBased => Box::new(Autotools),
        }
    }
}

impl fmt::Display for ToolchainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pick the toolchain family for an operating system
///
/// Every variant is listed so that a newly supported OS fails to compile
/// until it is assigned a family.
pub fn select(os: OperatingSystem) -> ToolchainFamily {
    use OperatingSystem::*;

    match os {
        Windows | Linux => ToolchainFamily::ProjectGenerator,
        Ios | WatchOs | TvOs | VisionOs | Macos | Android | FreeBSD | SunOS | Aix | Arduino
        | Emscripten | Neutrino | Baremetal | VxWorks => ToolchainFamily::ScriptBased,
    }
}

/// Directory layout of one cook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Project sources (CMakeLists.txt, configure.ac, cnn/)
    pub source_dir: PathBuf,
    /// Root of everything this cook writes except the package
    pub build_dir: PathBuf,
    /// Install destination
    pub package_dir: PathBuf,
}

impl Layout {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        build_dir: impl Into<PathBuf>,
        package_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            build_dir: build_dir.into(),
            package_dir: package_dir.into(),
        }
    }

    /// Where generated descriptors live
    pub fn generators_dir(&self) -> PathBuf {
        self.build_dir.join("generators")
    }

    /// Build tree for one build type, e.g. `build/Release`
    pub fn build_tree(&self, settings: &Settings) -> PathBuf {
        self.build_dir.join("build").join(settings.build_type.as_str())
    }
}

/// Everything a strategy needs to generate and build
pub struct BuildContext<'a> {
    pub settings: &'a Settings,
    /// Validated C++ standard from `settings.compiler.cppstd`
    pub standard: CppStandard,
    pub options: &'a OptionSet,
    pub requirements: RequirementSet,
    pub store: &'a dyn PackageStore,
    pub layout: &'a Layout,
    /// Parallel jobs for the build step
    pub jobs: u32,
}

impl BuildContext<'_> {
    /// Environment for external steps: build tools first on PATH
    pub fn step_env(&self) -> Vec<(String, String)> {
        let mut paths: Vec<PathBuf> = self
            .requirements
            .build_tools()
            .map(|tool| self.store.bin_dir(tool))
            .collect();

        if let Some(existing) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&existing));
        }

        match std::env::join_paths(paths) {
            Ok(path) => vec![("PATH".to_string(), path.to_string_lossy().into_owned())],
            Err(e) => {
                warn!("Could not build PATH for build tools: {}", e);
                Vec::new()
            }
        }
    }
}

/// Files written by a successful generate
///
/// Only [`ArtifactWriter::commit`] creates this, so holding one means the
/// whole set for the family was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifacts {
    family: ToolchainFamily,
    toolchain_file: PathBuf,
    dependency_files: Vec<PathBuf>,
}

impl GeneratedArtifacts {
    pub fn family(&self) -> ToolchainFamily {
        self.family
    }

    /// Toolchain descriptor
    pub fn toolchain_file(&self) -> &Path {
        &self.toolchain_file
    }

    /// Dependency-binding descriptors
    pub fn dependency_files(&self) -> &[PathBuf] {
        &self.dependency_files
    }

    /// All generated files, toolchain first
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.toolchain_file.as_path())
            .chain(self.dependency_files.iter().map(PathBuf::as_path))
    }
}

/// Writes a family's artifacts into a staging directory and swaps it into
/// place only when every file was written
///
/// Dropping an uncommitted writer removes the staging directory.
pub struct ArtifactWriter {
    staging: PathBuf,
    target: PathBuf,
    toolchain: Option<String>,
    dependencies: Vec<String>,
    committed: bool,
}

impl ArtifactWriter {
    pub fn new(target: &Path) -> Result<Self, GenerationError> {
        let staging = target.with_extension("partial");

        if staging.exists() {
            warn!("Removing stale staging directory {}", staging.display());
            fs::remove_dir_all(&staging).map_err(|e| GenerationError::new(&staging, e))?;
        }
        fs::create_dir_all(&staging).map_err(|e| GenerationError::new(&staging, e))?;

        Ok(Self {
            staging,
            target: target.to_path_buf(),
            toolchain: None,
            dependencies: Vec::new(),
            committed: false,
        })
    }

    fn write(&self, name: &str, contents: &str) -> Result<(), GenerationError> {
        let path = self.staging.join(name);
        debug!("Writing {}", self.target.join(name).display());
        fs::write(&path, contents).map_err(|e| GenerationError::new(self.target.join(name), e))
    }

    /// Write the toolchain descriptor
    pub fn toolchain(&mut self, name: &str, contents: &str) -> Result<(), GenerationError> {
        self.write(name, contents)?;
        self.toolchain = Some(name.to_string());
        Ok(())
    }

    /// Write one dependency-binding descriptor
    pub fn dependency(&mut self, name: &str, contents: &str) -> Result<(), GenerationError> {
        self.write(name, contents)?;
        self.dependencies.push(name.to_string());
        Ok(())
    }

    /// Replace the target directory with the staged files
    pub fn commit(mut self, family: ToolchainFamily) -> Result<GeneratedArtifacts, GenerationError> {
        let toolchain = self.toolchain.take().ok_or_else(|| {
            GenerationError::new(
                &self.target,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "no toolchain descriptor written"),
            )
        })?;

        // The previous set is moved aside, not deleted, until the new one is in place
        let previous = self.target.with_extension("old");
        if previous.exists() {
            fs::remove_dir_all(&previous).map_err(|e| GenerationError::new(&previous, e))?;
        }
        let replacing = self.target.exists();
        if replacing {
            fs::rename(&self.target, &previous).map_err(|e| GenerationError::new(&self.target, e))?;
        }

        if let Err(e) = fs::rename(&self.staging, &self.target) {
            if replacing {
                if let Err(restore) = fs::rename(&previous, &self.target) {
                    warn!("Failed to restore {}: {}", self.target.display(), restore);
                }
            }
            return Err(GenerationError::new(&self.target, e));
        }
        self.committed = true;

        if replacing {
            if let Err(e) = fs::remove_dir_all(&previous) {
                warn!("Failed to remove previous descriptors {}: {}", previous.display(), e);
            }
        }

        Ok(GeneratedArtifacts {
            family,
            toolchain_file: self.target.join(toolchain),
            dependency_files: self
                .dependencies
                .iter()
                .map(|name| self.target.join(name))
                .collect(),
        })
    }
}

impl Drop for ArtifactWriter {
    fn drop(&mut self) {
        if !self.committed && self.staging.exists() {
            if let Err(e) = fs::remove_dir_all(&self.staging) {
                warn!("Failed to remove staging directory {}: {}", self.staging.display(), e);
            }
        }
    }
}

/// A build-driver strategy
pub trait Toolchain: Send + Sync {
    fn family(&self) -> ToolchainFamily;

    /// Write the toolchain and dependency-binding descriptors
    fn generate(&self, ctx: &BuildContext<'_>) -> Result<GeneratedArtifacts, GenerationError>;

    /// The family's build steps, in execution order
    fn build_steps(&self, ctx: &BuildContext<'_>, artifacts: &GeneratedArtifacts) -> Vec<StepCommand>;

    /// Run the build steps, stopping at the first failure
    fn build(
        &self,
        ctx: &BuildContext<'_>,
        artifacts: &GeneratedArtifacts,
        runner: &dyn CommandRunner,
    ) -> Result<(), BuildError> {
        for command in self.build_steps(ctx, artifacts) {
            run_step(runner, &command)?;
        }
        Ok(())
    }

    /// Install into the package directory
    ///
    /// Installation goes through the project-file driver for both families.
    fn install(&self, ctx: &BuildContext<'_>, runner: &dyn CommandRunner) -> Result<(), PackageError> {
        let command = install_command(ctx);
        info!("Running {} step", command.step);

        let output = runner.run(&command).map_err(|e| PackageError::InstallFailed {
            exit_code: None,
            output: format!("failed to start {}: {}", command.program, e),
        })?;

        if !output.is_success() {
            return Err(PackageError::InstallFailed {
                exit_code: output.exit_code,
                output: output.combined(),
            });
        }
        Ok(())
    }
}

/// `cmake --install` into the package directory
pub fn install_command(ctx: &BuildContext<'_>) -> StepCommand {
    let build_tree = ctx.layout.build_tree(ctx.settings);
    StepCommand::new(Step::Install, "cmake", &ctx.layout.build_dir)
        .arg("--install")
        .arg(build_tree.display().to_string())
        .args(["--config", ctx.settings.build_type.as_str()])
        .arg("--prefix")
        .arg(ctx.layout.package_dir.display().to_string())
        .envs(&ctx.step_env())
}

/// Run one build step and turn failure into a [`BuildError`]
pub fn run_step(runner: &dyn CommandRunner, command: &StepCommand) -> Result<(), BuildError> {
    info!("Running {} step", command.step);
    debug!("Command: {}", command.display());

    let output = runner.run(command).map_err(|e| BuildError {
        step: command.step.as_str().to_string(),
        exit_code: None,
        output: format!("failed to start {}: {}", command.program, e),
    })?;

    if !output.is_success() {
        return Err(BuildError {
            step: command.step.as_str().to_string(),
            exit_code: output.exit_code,
            output: output.combined(),
        });
    }

    Ok(())
}

/// Create the build tree during generation so steps can `cd` into it
fn prepare_build_tree(ctx: &BuildContext<'_>) -> Result<PathBuf, GenerationError> {
    let tree = ctx.layout.build_tree(ctx.settings);
    fs::create_dir_all(&tree).map_err(|e| GenerationError::new(&tree, e))?;
    Ok(tree)
}

/// Banner line followed by `lines`, newline-terminated
fn render_lines(comment: &str, lines: &[String]) -> String {
    let mut out = format!(
        "{} Generated by cnn-recipe for {}. Do not edit.\n",
        comment,
        crate::recipe::format::RECIPE.reference()
    );
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out
}
