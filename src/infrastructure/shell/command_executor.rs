//! Command executor for running external programs
//!
//! Remote template sources are fetched through `git`. The resolver never
//! spawns processes itself; it is handed a [`CommandExecutor`] so tests can
//! substitute canned results.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::core::error::Error;

/// Trait for executing external commands
pub trait CommandExecutor: Send + Sync {
    /// Run `program` with `args`, optionally inside `working_dir`, and wait for it
    fn execute(
        &self,
        program: &str,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<CommandResult, Error>;
}

/// Result of command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Check if the command was successful
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// Turn a non-zero exit into an [`Error::Command`]
    pub fn into_success(self, command: &str) -> Result<Self, Error> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::Command {
                command: command.to_string(),
                status: format!("exit status: {}", self.exit_code),
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Render a program and its arguments as a single command line
pub fn command_line(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Default command executor using std::process
#[derive(Debug)]
pub struct ProcessCommandExecutor;

impl ProcessCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProcessCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for ProcessCommandExecutor {
    fn execute(
        &self,
        program: &str,
        args: &[&str],
        working_dir: Option<&Path>,
    ) -> Result<CommandResult, Error> {
        debug!(command = %command_line(program, args), "Running external command");

        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = working_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| Error::CommandSpawn {
            command: command_line(program, args),
            source,
        })?;

        Ok(CommandResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Mock command executor for testing
///
/// Results are keyed by the full command line. Every invocation is recorded,
/// including ones with no canned result.
#[cfg(test)]
pub struct MockCommandExecutor {
    pub results: std::collections::HashMap<String, CommandResult>,
    calls: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockCommandExecutor {
    pub fn new() -> Self {
        Self {
            results: std::collections::HashMap::new(),
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_result(
        mut self,
        command: &str,
        exit_code: i32,
        stdout: &str,
        stderr: &str,
    ) -> Self {
        self.results.insert(
            command.to_string(),
            CommandResult {
                exit_code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        );
        self
    }

    /// All command lines executed so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of executed command lines starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }
}

#[cfg(test)]
impl CommandExecutor for MockCommandExecutor {
    fn execute(
        &self,
        program: &str,
        args: &[&str],
        _working_dir: Option<&Path>,
    ) -> Result<CommandResult, Error> {
        let line = command_line(program, args);
        self.calls.lock().unwrap().push(line.clone());
        self.results.get(&line).cloned().ok_or_else(|| Error::Command {
            command: line.clone(),
            status: "exit status: 1".to_string(),
            stderr: format!("Mock executor has no result for command: {line}"),
        })
    }
}
