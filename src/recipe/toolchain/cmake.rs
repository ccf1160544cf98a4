// src/recipe/toolchain/cmake.rs

//! Project-file generator family (CMake)
//!
//! Generates `cnn_toolchain.cmake` plus one `<name>-config.cmake` per runtime
//! requirement so the project's `find_package()` calls resolve against the
//! store. Builds with `cmake -S/-B` followed by `cmake --build`.

use super::{
    prepare_build_tree, render_lines, ArtifactWriter, BuildContext, GeneratedArtifacts,
    Toolchain, ToolchainFamily,
};
use crate::error::GenerationError;
use crate::recipe::format::Requirement;
use crate::recipe::kitchen::runner::{Step, StepCommand};
use crate::recipe::options::OptimizationLevel;
use crate::recipe::settings::Compiler;
use std::path::Path;
use tracing::info;

/// Toolchain descriptor file name
pub const TOOLCHAIN_FILE: &str = "cnn_toolchain.cmake";

/// CMake strategy
#[derive(Debug, Default, Clone, Copy)]
pub struct CMake;

impl Toolchain for CMake {
    fn family(&self) -> ToolchainFamily {
        ToolchainFamily::ProjectGenerator
    }

    fn generate(&self, ctx: &BuildContext<'_>) -> Result<GeneratedArtifacts, GenerationError> {
        let generators = ctx.layout.generators_dir();
        info!("Generating CMake toolchain in {}", generators.display());

        let mut writer = ArtifactWriter::new(&generators)?;
        writer.toolchain(TOOLCHAIN_FILE, &render_toolchain(ctx, &generators))?;

        for requirement in ctx.requirements.runtime() {
            let prefix = ctx.store.prefix(requirement);
            writer.dependency(&config_file_name(requirement), &render_config(requirement, &prefix))?;
        }

        prepare_build_tree(ctx)?;
        writer.commit(self.family())
    }

    fn build_steps(&self, ctx: &BuildContext<'_>, artifacts: &GeneratedArtifacts) -> Vec<StepCommand> {
        let build_tree = ctx.layout.build_tree(ctx.settings);
        let env = ctx.step_env();
        let build_type = ctx.settings.build_type.as_str();

        let configure = StepCommand::new(Step::Configure, "cmake", &build_tree)
            .arg("-S")
            .arg(ctx.layout.source_dir.display().to_string())
            .arg("-B")
            .arg(build_tree.display().to_string())
            .arg(format!("-DCMAKE_TOOLCHAIN_FILE={}", cmake_path(artifacts.toolchain_file())))
            .arg(format!("-DCMAKE_BUILD_TYPE={}", build_type))
            .arg(format!("-DCMAKE_INSTALL_PREFIX={}", cmake_path(&ctx.layout.package_dir)))
            .envs(&env);

        let build = StepCommand::new(Step::Build, "cmake", &build_tree)
            .arg("--build")
            .arg(build_tree.display().to_string())
            .args(["--config", build_type])
            .args(["--parallel".to_string(), ctx.jobs.to_string()])
            .envs(&env);

        vec![configure, build]
    }
}

/// `boost` -> `boost-config.cmake`
pub fn config_file_name(requirement: &Requirement) -> String {
    format!("{}-config.cmake", requirement.name)
}

/// CMake wants forward slashes even on Windows
fn cmake_path(path: &Path) -> String {
    path.display().to_string().replace('\\', "/")
}

/// C and C++ compiler executables for a compiler family
fn compiler_executables(compiler: &Compiler) -> Option<(&'static str, &'static str)> {
    match compiler.name.as_str() {
        "gcc" => Some(("gcc", "g++")),
        "clang" | "apple-clang" => Some(("clang", "clang++")),
        "msvc" => Some(("cl", "cl")),
        _ => None,
    }
}

fn optimization_flag(compiler: &Compiler, level: OptimizationLevel) -> &'static str {
    if compiler.name == "msvc" {
        match level {
            OptimizationLevel::O1 => "/O1",
            OptimizationLevel::O2 => "/O2",
            OptimizationLevel::O3 => "/Ox",
        }
    } else {
        level.flag()
    }
}

fn on_off(value: bool) -> &'static str {
    if value { "ON" } else { "OFF" }
}

fn render_toolchain(ctx: &BuildContext<'_>, generators: &Path) -> String {
    let settings = ctx.settings;
    let compiler = &settings.compiler;

    let mut lines = vec![format!("set(CMAKE_SYSTEM_PROCESSOR {})", settings.arch)];
    if let Some((cc, cxx)) = compiler_executables(compiler) {
        lines.push(format!("set(CMAKE_C_COMPILER {})", cc));
        lines.push(format!("set(CMAKE_CXX_COMPILER {})", cxx));
    }
    if let Some(version) = &compiler.version {
        lines.push(format!("# compiler: {} {}", compiler.name, version));
    }

    lines.push(String::new());
    lines.push(format!("set(CMAKE_CXX_STANDARD {})", ctx.standard.year()));
    lines.push(format!("set(CMAKE_CXX_EXTENSIONS {})", on_off(ctx.standard.is_gnu())));
    lines.push("set(CMAKE_CXX_STANDARD_REQUIRED ON)".to_string());

    lines.push(String::new());
    lines.push(format!(
        "set(BUILD_SHARED_LIBS {} CACHE BOOL \"Build shared libraries\")",
        on_off(ctx.options.shared)
    ));
    if let Some(fpic) = ctx.options.fpic {
        lines.push(format!("set(CMAKE_POSITION_INDEPENDENT_CODE {})", on_off(fpic)));
    }
    lines.push(format!(
        "string(APPEND CMAKE_CXX_FLAGS_INIT \" {}\")",
        optimization_flag(compiler, ctx.options.optimized)
    ));

    lines.push(String::new());
    lines.push(format!("list(PREPEND CMAKE_PREFIX_PATH \"{}\")", cmake_path(generators)));
    for requirement in ctx.requirements.runtime() {
        lines.push(format!(
            "list(APPEND CMAKE_PREFIX_PATH \"{}\")",
            cmake_path(&ctx.store.prefix(requirement))
        ));
    }

    render_lines("#", &lines)
}

fn render_config(requirement: &Requirement, prefix: &Path) -> String {
    let name = requirement.name;
    let prefix = cmake_path(prefix);

    let lines = [
        format!("set({}_FOUND TRUE)", name),
        format!("set({}_VERSION {})", name, requirement.version),
        format!("set({}_ROOT \"{}\")", name, prefix),
        format!("set({}_INCLUDE_DIRS \"{}/include\")", name, prefix),
        format!("set({}_LIBRARY_DIRS \"{}/lib\")", name, prefix),
    ];
    render_lines("#", &lines)
}
