// tests/pipeline.rs

//! End-to-end pipeline tests: validate through package with a recording runner.

mod common;

use cnn_recipe::recipe::{
    refine, select, validate, OperatingSystem, RawOptions, Step, ToolchainFamily, MANIFEST_FILE,
};
use cnn_recipe::{ConfigError, Error, Kitchen, PackageError, Stage};
use common::{profile, scratch_config, setup_kitchen, ConfigureRunner, RecordingRunner};
use std::fs;

#[test]
fn test_scenario_linux_reaches_package() {
    let runner = RecordingRunner::new();
    let (_temp, kitchen) = setup_kitchen(runner.clone());

    let result = kitchen.cook(&profile("Linux", "20")).unwrap();

    assert_eq!(result.family, ToolchainFamily::ProjectGenerator);
    assert_eq!(runner.steps(), vec![Step::Configure, Step::Build, Step::Install]);
    assert!(runner.commands().iter().all(|c| c.program == "cmake"));

    assert!(result.artifacts.toolchain_file().ends_with("cnn_toolchain.cmake"));
    for file in result.artifacts.files() {
        assert!(file.exists(), "{} missing", file.display());
    }

    let manifest = fs::read_to_string(result.package_dir.join(MANIFEST_FILE)).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    assert_eq!(manifest["package_id"], result.package_id.as_str());
}

#[test]
fn test_scenario_freebsd_script_based() {
    let runner = RecordingRunner::new();
    let (_temp, kitchen) = setup_kitchen(runner.clone());

    let result = kitchen.cook(&profile("FreeBSD", "20")).unwrap();

    assert_eq!(result.family, ToolchainFamily::ScriptBased);
    assert_eq!(
        runner.steps(),
        vec![Step::Autoreconf, Step::Configure, Step::Make, Step::Install]
    );

    let mut pc_files: Vec<String> = result
        .artifacts
        .dependency_files()
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    pc_files.sort();
    assert_eq!(pc_files, vec!["boost.pc", "eigen.pc", "opencv.pc"]);

    // No CMake descriptors for the script-based family
    let generators = kitchen.config().layout().unwrap().generators_dir();
    assert!(!generators.join("cnn_toolchain.cmake").exists());
}

#[test]
fn test_scenario_unsupported_os_runs_nothing() {
    let runner = RecordingRunner::new();
    let (_temp, kitchen) = setup_kitchen(runner.clone());

    let err = kitchen.cook(&profile("Haiku", "20")).unwrap_err();

    assert_eq!(err.stage(), Stage::Validate);
    assert!(matches!(
        err,
        Error::Config(ConfigError::UnsupportedPlatform(ref os)) if os == "Haiku"
    ));
    assert_eq!(err.to_string(), "No support for the operating system: Haiku");
    assert!(runner.steps().is_empty());
    assert!(!kitchen.config().build_dir.exists());
}

#[test]
fn test_scenario_shared_drops_fpic() {
    let runner = RecordingRunner::new();
    let (_temp, kitchen) = setup_kitchen(runner);

    let mut p = profile("Linux", "20");
    p.options = RawOptions {
        shared: Some(true),
        fpic: Some(true),
        optimized: None,
    };

    let result = kitchen.cook(&p).unwrap();
    assert!(result.options.shared);
    assert_eq!(result.options.fpic, None);

    let toolchain = fs::read_to_string(result.artifacts.toolchain_file()).unwrap();
    assert!(!toolchain.contains("CMAKE_POSITION_INDEPENDENT_CODE"));
}

#[test]
fn test_standard_out_of_range_runs_nothing() {
    for cppstd in ["17", "26", "98"] {
        let runner = RecordingRunner::new();
        let (_temp, kitchen) = setup_kitchen(runner.clone());

        let err = kitchen.cook(&profile("Linux", cppstd)).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::StandardOutOfRange { .. })), "{}", cppstd);
        assert!(runner.steps().is_empty());
    }
}

#[test]
fn test_generate_failure_prevents_build() {
    let runner = RecordingRunner::new();
    let temp = tempfile::tempdir().unwrap();
    let config = scratch_config(temp.path());

    // A regular file where the build directory should be
    fs::create_dir_all(config.build_dir.parent().unwrap()).unwrap();
    fs::write(&config.build_dir, "in the way").unwrap();

    let kitchen = Kitchen::new(config, runner.clone());
    let err = kitchen.cook(&profile("Linux", "20")).unwrap_err();

    assert_eq!(err.stage(), Stage::Generate);
    assert!(runner.steps().is_empty());
}

#[test]
fn test_first_build_step_failure_stops_second() {
    let runner = RecordingRunner::failing_on(Step::Configure);
    let (_temp, kitchen) = setup_kitchen(runner.clone());

    let err = kitchen.cook(&profile("Windows", "23")).unwrap_err();

    match err {
        Error::Build(e) => {
            assert_eq!(e.step, "configure");
            assert_eq!(e.exit_code, Some(2));
            assert!(e.output.contains("configure exploded"));
        }
        other => panic!("expected build error, got {:?}", other),
    }
    assert_eq!(runner.steps(), vec![Step::Configure]);
}

#[test]
fn test_script_build_failure_skips_make_and_package() {
    let runner = RecordingRunner::failing_on(Step::Configure);
    let (_temp, kitchen) = setup_kitchen(runner.clone());

    let err = kitchen.cook(&profile("Macos", "gnu20")).unwrap_err();

    assert_eq!(err.stage(), Stage::Build);
    assert_eq!(runner.steps(), vec![Step::Autoreconf, Step::Configure]);
    assert!(!kitchen.config().package_dir.join(MANIFEST_FILE).exists());
}

#[test]
fn test_install_failure_is_package_error() {
    let runner = RecordingRunner::failing_on(Step::Install);
    let (_temp, kitchen) = setup_kitchen(runner.clone());

    let err = kitchen.cook(&profile("Linux", "21")).unwrap_err();

    assert_eq!(err.stage(), Stage::Package);
    assert!(matches!(
        err,
        Error::Package(PackageError::InstallFailed { exit_code: Some(2), .. })
    ));
    assert_eq!(runner.steps(), vec![Step::Configure, Step::Build, Step::Install]);
}

#[test]
fn test_package_step_is_cmake_install_for_both_families() {
    for os in ["Linux", "Android"] {
        let runner = RecordingRunner::new();
        let (_temp, kitchen) = setup_kitchen(runner.clone());
        kitchen.cook(&profile(os, "22")).unwrap();

        let commands = runner.commands();
        let install = commands.last().unwrap();
        assert_eq!(install.step, Step::Install);
        assert_eq!(install.program, "cmake");
        assert_eq!(install.args[0], "--install");
    }
}

#[test]
fn test_generation_and_build_agree_on_family() {
    for os in OperatingSystem::all() {
        let runner = RecordingRunner::new();
        let (_temp, kitchen) = setup_kitchen(runner.clone());
        let result = kitchen.cook(&profile(os.as_str(), "20")).unwrap();

        assert_eq!(result.family, select(*os));
        assert_eq!(result.artifacts.family(), result.family);

        let uses_make = runner.steps().contains(&Step::Make);
        assert_eq!(uses_make, result.family == ToolchainFamily::ScriptBased, "{}", os);
    }
}

#[test]
fn test_regenerate_replaces_artifacts() {
    let runner = RecordingRunner::new();
    let (_temp, kitchen) = setup_kitchen(runner);

    kitchen.prepare(&profile("Linux", "20")).unwrap();
    let prepared = kitchen.prepare(&profile("FreeBSD", "20")).unwrap();

    let generators = kitchen.config().layout().unwrap().generators_dir();
    assert!(generators.join("cnn_autotools_toolchain.sh").exists());
    assert!(!generators.join("cnn_toolchain.cmake").exists());
    assert_eq!(prepared.artifacts.files().count(), 4);
}

#[test]
fn test_package_id_tracks_inputs() {
    let runner = RecordingRunner::new();
    let (_temp, kitchen) = setup_kitchen(runner);

    let a = kitchen.cook(&profile("Linux", "20")).unwrap();
    let b = kitchen.cook(&profile("Linux", "20")).unwrap();
    let c = kitchen.cook(&profile("Linux", "23")).unwrap();

    assert_eq!(a.package_id, b.package_id);
    assert_ne!(a.package_id, c.package_id);
}

#[test]
fn test_free_functions_compose() {
    let p = profile("Windows", "20");
    validate(&p.settings).unwrap();

    let options = refine(&p.options, &p.settings);
    assert_eq!(options.fpic, None);

    let os = p.settings.operating_system().unwrap();
    assert_eq!(select(os), ToolchainFamily::ProjectGenerator);
}

#[cfg(unix)]
#[test]
fn test_script_configure_runs_from_build_tree() {
    let temp = tempfile::tempdir().unwrap();
    let config = scratch_config(temp.path());
    common::write_configure_stub(&config.source_dir);

    let runner = ConfigureRunner::new();
    let kitchen = Kitchen::new(config, runner.clone());
    let p = profile("FreeBSD", "20");
    let result = kitchen.cook(&p).unwrap();

    assert_eq!(
        runner.steps(),
        vec![Step::Autoreconf, Step::Configure, Step::Make, Step::Install]
    );

    // The stub writes into its working directory, the build tree
    let layout = kitchen.config().layout().unwrap();
    let tree = layout.build_tree(&p.settings);
    let args = fs::read_to_string(tree.join("configure.args")).unwrap();
    let prefix = format!("--prefix={}", result.package_dir.display());
    assert!(args.lines().any(|l| l == prefix), "{}", args);
    assert!(args.lines().any(|l| l == "--with-pic"));

    let flags = fs::read_to_string(tree.join("configure.flags")).unwrap();
    assert!(flags.contains("-std=c++20 -O2 -fPIC -DNDEBUG"), "{}", flags);

    let pkg_config = fs::read_to_string(tree.join("configure.pkgconfig")).unwrap();
    assert!(pkg_config.starts_with(&layout.generators_dir().display().to_string()));
}

#[cfg(unix)]
#[test]
fn test_script_configure_failure_is_reported() {
    let temp = tempfile::tempdir().unwrap();
    let config = scratch_config(temp.path());
    // No configure script in the source dir
    fs::create_dir_all(&config.source_dir).unwrap();

    let runner = ConfigureRunner::new();
    let kitchen = Kitchen::new(config, runner.clone());
    let err = kitchen.cook(&profile("FreeBSD", "20")).unwrap_err();

    assert_eq!(err.stage(), Stage::Build);
    assert!(matches!(err, Error::Build(ref e) if e.step == "configure"));
    assert_eq!(runner.steps(), vec![Step::Autoreconf, Step::Configure]);
}
