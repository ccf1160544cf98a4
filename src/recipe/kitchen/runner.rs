// src/recipe/kitchen/runner.rs

//! External process execution for build steps
//!
//! Every configure/build/install invocation goes through a [`CommandRunner`],
//! which keeps the kitchen decoupled from process spawning and lets tests
//! substitute a recording runner.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// A named external step of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Regenerate the configure script (script-based family only)
    Autoreconf,
    /// Configure the build tree
    Configure,
    /// Build with the project-file driver
    Build,
    /// Build with make (script-based family only)
    Make,
    /// Copy build outputs into the package directory
    Install,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Autoreconf => "autoreconf",
            Self::Configure => "configure",
            Self::Build => "build",
            Self::Make => "make",
            Self::Install => "install",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully specified process invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCommand {
    pub step: Step,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    /// Extra environment, layered over the inherited one
    pub env: Vec<(String, String)>,
}

impl StepCommand {
    pub fn new(step: Step, program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            step,
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn envs(mut self, env: &[(String, String)]) -> Self {
        self.env.extend_from_slice(env);
        self
    }

    /// Command line for logs
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Exit status and captured output of a step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutput {
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl StepOutput {
    pub fn success() -> Self {
        Self {
            exit_code: Some(0),
            ..Default::default()
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Combined diagnostic output, stderr last
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (true, _) => self.stderr.clone(),
            (false, true) => self.stdout.clone(),
            (false, false) => format!("{}\n{}", self.stdout, self.stderr),
        }
    }
}

/// Runs external build steps
///
/// Implementations block until the process exits. An `Err` means the process
/// could not be started at all; a started process that fails is reported
/// through [`StepOutput::exit_code`].
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &StepCommand) -> io::Result<StepOutput>;
}

/// Runs steps as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &StepCommand) -> io::Result<StepOutput> {
        // Build-tool requirements are prepended to PATH in the step env
        let search_path = command
            .env
            .iter()
            .find(|(key, _)| key == "PATH")
            .map(|(_, value)| value.clone());
        let resolved = match search_path {
            Some(path) => which::which_in(&command.program, Some(path), &command.cwd),
            None => which::which(&command.program),
        };
        let program = resolved.map_err(|e| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found in PATH: {}", command.program, e),
            )
        })?;

        debug!("Running {}: {}", command.step, command.display());

        let output = Command::new(&program)
            .args(&command.args)
            .current_dir(&command.cwd)
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()?;

        Ok(StepOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
