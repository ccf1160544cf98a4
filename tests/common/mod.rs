// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use cnn_recipe::recipe::{
    CommandRunner, Compiler, KitchenConfig, ProcessRunner, Profile, Settings, Step, StepCommand,
    StepOutput,
};
use cnn_recipe::Kitchen;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Runner that records every command and never spawns a process
///
/// A step listed in `fail_on` exits with status 2; everything else succeeds.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<StepCommand>>,
    fail_on: Option<Step>,
}

impl RecordingRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing_on(step: Step) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_on: Some(step),
        })
    }

    /// Commands run so far, in order
    pub fn commands(&self) -> Vec<StepCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Step names run so far, in order
    pub fn steps(&self) -> Vec<Step> {
        self.commands().iter().map(|c| c.step).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &StepCommand) -> io::Result<StepOutput> {
        self.calls.lock().unwrap().push(command.clone());
        if self.fail_on == Some(command.step) {
            return Ok(StepOutput::failure(2, format!("{} exploded", command.step)));
        }
        Ok(StepOutput::success())
    }
}

/// Runner that spawns the configure step for real and succeeds everything else
#[derive(Default)]
pub struct ConfigureRunner {
    steps: Mutex<Vec<Step>>,
}

impl ConfigureRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn steps(&self) -> Vec<Step> {
        self.steps.lock().unwrap().clone()
    }
}

impl CommandRunner for ConfigureRunner {
    fn run(&self, command: &StepCommand) -> io::Result<StepOutput> {
        self.steps.lock().unwrap().push(command.step);
        if command.step == Step::Configure {
            ProcessRunner.run(command)
        } else {
            Ok(StepOutput::success())
        }
    }
}

/// Executable `configure` that dumps its arguments and the sourced
/// toolchain variables into the directory it runs from
#[cfg(unix)]
pub fn write_configure_stub(source_dir: &Path) {
    use std::os::unix::fs::PermissionsExt;

    fs::create_dir_all(source_dir).unwrap();
    let path = source_dir.join("configure");
    fs::write(
        &path,
        "#!/bin/sh\n\
         printf '%s\\n' \"$@\" > configure.args\n\
         printf '%s\\n' \"$CXXFLAGS\" > configure.flags\n\
         printf '%s\\n' \"$PKG_CONFIG_PATH\" > configure.pkgconfig\n",
    )
    .unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Value following `flag` in a command's arguments, as a path
pub fn arg_after(command: &StepCommand, flag: &str) -> PathBuf {
    let index = command
        .args
        .iter()
        .position(|a| a == flag)
        .unwrap_or_else(|| panic!("{} missing from {}", flag, command.display()));
    PathBuf::from(&command.args[index + 1])
}

/// Value of a `-D<name>=<value>` cache definition, as a path
pub fn cmake_define(command: &StepCommand, name: &str) -> PathBuf {
    let prefix = format!("-D{}=", name);
    command
        .args
        .iter()
        .find_map(|a| a.strip_prefix(&prefix))
        .map(PathBuf::from)
        .unwrap_or_else(|| panic!("{} missing from {}", name, command.display()))
}

/// Profile with gcc and the given OS and C++ standard
pub fn profile(os: &str, cppstd: &str) -> Profile {
    Profile::new(Settings::new(
        os,
        Compiler::new("gcc").with_version("13").with_cppstd(cppstd),
        "x86_64",
    ))
}

/// Kitchen config rooted in a scratch directory
pub fn scratch_config(root: &Path) -> KitchenConfig {
    KitchenConfig::for_source(&root.join("src"))
        .with_store_root(root.join("store"))
        .with_jobs(2)
}

/// Kitchen over a fresh temp dir with a recording runner
///
/// Returns (TempDir, Kitchen) - keep the TempDir alive to prevent cleanup.
pub fn setup_kitchen(runner: Arc<RecordingRunner>) -> (TempDir, Kitchen) {
    let temp_dir = tempfile::tempdir().unwrap();
    let kitchen = Kitchen::new(scratch_config(temp_dir.path()), runner);
    (temp_dir, kitchen)
}
