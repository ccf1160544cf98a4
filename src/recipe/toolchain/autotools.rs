// src/recipe/toolchain/autotools.rs

//! Script-based family (Autotools)
//!
//! Generates a shell toolchain that exports compiler and flag variables, and
//! a pkg-config `.pc` file for every runtime requirement. The build runs
//! `autoreconf` in the source tree, then `configure` and `make` out of tree
//! with the toolchain sourced first.

use super::{
    prepare_build_tree, render_lines, ArtifactWriter, BuildContext, GeneratedArtifacts,
    Toolchain, ToolchainFamily,
};
use crate::error::GenerationError;
use crate::recipe::format::Requirement;
use crate::recipe::kitchen::runner::{Step, StepCommand};
use crate::recipe::settings::{BuildType, Compiler};
use std::path::Path;
use tracing::info;

/// Toolchain descriptor file name
pub const TOOLCHAIN_FILE: &str = "cnn_autotools_toolchain.sh";

/// Autotools strategy
#[derive(Debug, Default, Clone, Copy)]
pub struct Autotools;

impl Toolchain for Autotools {
    fn family(&self) -> ToolchainFamily {
        ToolchainFamily::ScriptBased
    }

    fn generate(&self, ctx: &BuildContext<'_>) -> Result<GeneratedArtifacts, GenerationError> {
        let generators = ctx.layout.generators_dir();
        info!("Generating Autotools toolchain in {}", generators.display());

        let mut writer = ArtifactWriter::new(&generators)?;
        writer.toolchain(TOOLCHAIN_FILE, &render_toolchain(ctx, &generators))?;

        for requirement in ctx.requirements.runtime() {
            let prefix = ctx.store.prefix(requirement);
            writer.dependency(&pc_file_name(requirement), &render_pc(requirement, &prefix))?;
        }

        prepare_build_tree(ctx)?;
        writer.commit(self.family())
    }

    fn build_steps(&self, ctx: &BuildContext<'_>, artifacts: &GeneratedArtifacts) -> Vec<StepCommand> {
        let build_tree = ctx.layout.build_tree(ctx.settings);
        let env = ctx.step_env();
        let source = quote_path(&ctx.layout.source_dir);
        let toolchain = sh_quote(&artifacts.toolchain_file().display().to_string());

        let autoreconf = StepCommand::new(Step::Autoreconf, "autoreconf", &ctx.layout.source_dir)
            .args(["--force", "--install"])
            .envs(&env);

        let mut configure_line = format!(
            ". {} && {}/configure --prefix={}",
            toolchain,
            source,
            quote_path(&ctx.layout.package_dir)
        );
        if ctx.options.shared {
            configure_line.push_str(" --enable-shared --disable-static");
        } else {
            configure_line.push_str(" --disable-shared --enable-static");
        }
        if ctx.options.position_independent() {
            configure_line.push_str(" --with-pic");
        }
        let configure = StepCommand::new(Step::Configure, "sh", &build_tree)
            .arg("-c")
            .arg(configure_line)
            .envs(&env);

        let make = StepCommand::new(Step::Make, "sh", &build_tree)
            .arg("-c")
            .arg(format!(". {} && make -j{}", toolchain, ctx.jobs))
            .envs(&env);

        vec![autoreconf, configure, make]
    }
}

/// `opencv` -> `opencv.pc`
pub fn pc_file_name(requirement: &Requirement) -> String {
    format!("{}.pc", requirement.name)
}

/// Single-quote a string for POSIX sh
fn sh_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

fn quote_path(path: &Path) -> String {
    sh_quote(&path.display().to_string())
}

fn compiler_executables(compiler: &Compiler) -> (&str, &str) {
    match compiler.name.as_str() {
        "gcc" => ("gcc", "g++"),
        "clang" | "apple-clang" => ("clang", "clang++"),
        other => (other, other),
    }
}

fn render_toolchain(ctx: &BuildContext<'_>, generators: &Path) -> String {
    let compiler = &ctx.settings.compiler;
    let (cc, cxx) = compiler_executables(compiler);

    let std_flag = if ctx.standard.is_gnu() {
        format!("-std=gnu++{}", ctx.standard.year())
    } else {
        format!("-std=c++{}", ctx.standard.year())
    };

    let mut cflags = vec![ctx.options.optimized.flag().to_string()];
    if ctx.options.position_independent() {
        cflags.push("-fPIC".to_string());
    }
    match ctx.settings.build_type {
        BuildType::Debug => cflags.push("-g".to_string()),
        BuildType::RelWithDebInfo => {
            cflags.push("-g".to_string());
            cflags.push("-DNDEBUG".to_string());
        }
        BuildType::Release | BuildType::MinSizeRel => cflags.push("-DNDEBUG".to_string()),
    }
    let cflags = cflags.join(" ");

    let lines = [
        format!("# arch: {}", ctx.settings.arch),
        format!("export CC={}", sh_quote(cc)),
        format!("export CXX={}", sh_quote(cxx)),
        format!("export CFLAGS=\"$CFLAGS {}\"", cflags),
        format!("export CXXFLAGS=\"$CXXFLAGS {} {}\"", std_flag, cflags),
        format!(
            "export PKG_CONFIG_PATH={}${{PKG_CONFIG_PATH:+:$PKG_CONFIG_PATH}}",
            quote_path(generators)
        ),
    ];
    render_lines("#", &lines)
}

fn render_pc(requirement: &Requirement, prefix: &Path) -> String {
    let lines = [
        format!("prefix={}", prefix.display()),
        "libdir=${prefix}/lib".to_string(),
        "includedir=${prefix}/include".to_string(),
        String::new(),
        format!("Name: {}", requirement.name),
        format!("Description: {} for {}", requirement.name, crate::recipe::format::RECIPE.name),
        format!("Version: {}", requirement.version),
        "Libs: -L${libdir}".to_string(),
        "Cflags: -I${includedir}".to_string(),
    ];
    render_lines("#", &lines)
}
