//! Command execution for helper processes
//!
//! Everything that shells out (`uname`, the target-triple probe, toolchain
//! installs) goes through a `CommandRunner`, so tests can supply canned output.

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            code: Some(0),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            code: Some(code),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human readable exit status, e.g. `exit status 1`
    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Runs external programs and captures their output
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and extra environment variables.
    ///
    /// A non-zero exit is not an error here; callers inspect `CommandOutput`.
    /// Errors mean the program could not be started at all.
    async fn run(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<CommandOutput>;
}

/// Runs programs found on `PATH`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

#[async_trait]
impl CommandRunner for SystemCommandRunner {
    async fn run(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<CommandOutput> {
        let command_line = display_command(program, args);
        let path = which::which(program).map_err(|e| {
            Error::command_failed(&command_line, format!("cannot find '{}' command: {}", program, e))
        })?;

        debug!(command = %command_line, "running command");

        // Dropping the future kills the child.
        let output = Command::new(path)
            .args(args)
            .envs(env.iter().copied())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| Error::command_failed(&command_line, e.to_string()))?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        })
    }
}

/// Render a command line for messages
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
