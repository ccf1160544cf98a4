// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Profile file plus overrides, shared by validate, generate and cook
fn profile_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("profile")
            .short('p')
            .long("profile")
            .required(true)
            .help("Path to the TOML profile"),
    )
    .arg(
        Arg::new("setting")
            .short('s')
            .long("setting")
            .value_name("KEY=VALUE")
            .action(ArgAction::Append)
            .help("Setting override, e.g. -s compiler.cppstd=23"),
    )
    .arg(
        Arg::new("option")
            .short('o')
            .long("option")
            .value_name("KEY=VALUE")
            .action(ArgAction::Append)
            .help("Option override, e.g. -o shared=True"),
    )
}

/// Directory layout, shared by generate and cook
fn layout_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("source_dir")
            .long("source-dir")
            .default_value(".")
            .help("Project source directory"),
    )
    .arg(
        Arg::new("build_dir")
            .long("build-dir")
            .help("Build directory (defaults to <source-dir>/build)"),
    )
    .arg(
        Arg::new("package_dir")
            .long("package-dir")
            .help("Package directory (defaults to <source-dir>/package)"),
    )
    .arg(
        Arg::new("store")
            .long("store")
            .default_value("/var/cache/cnn/store")
            .help("Root of the dependency store"),
    )
    .arg(
        Arg::new("clean")
            .long("clean")
            .action(ArgAction::SetTrue)
            .help("Remove the build directory before generating"),
    )
}

fn build_cli() -> Command {
    Command::new("cnn-recipe")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Rajiv Sithiravel")
        .about("Recipe engine for the cnn package")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging (RUST_LOG overrides)"),
        )
        .subcommand_required(true)
        .subcommand(Command::new("inspect").about("Show recipe metadata, declared options and requirements"))
        .subcommand(profile_args(
            Command::new("validate").about("Validate a profile and show the selected toolchain and options"),
        ))
        .subcommand(layout_args(profile_args(
            Command::new("generate").about("Validate, refine and generate toolchain descriptors"),
        )))
        .subcommand(
            layout_args(profile_args(Command::new("cook").about("Build and package the recipe"))).arg(
                Arg::new("jobs")
                    .short('j')
                    .long("jobs")
                    .help("Number of parallel build jobs (default: available CPUs)"),
            ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("cnn-recipe.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
