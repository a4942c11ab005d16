//! Process execution behind an injectable [`Executor`] trait.
use anyhow::{Context, Result, bail};
use std::process::{Command, Output};

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Runs external programs.
///
/// [`SystemExecutor`] spawns real processes; tests substitute a recorder.
pub trait Executor: Send + Sync + std::fmt::Debug {
    /// Run a command, failing if it exits non-zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command with extra environment variables, allowing failure.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process cannot be spawned.
    fn run_unchecked_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult>;

    /// Run a command, allowing failure.
    ///
    /// # Errors
    ///
    /// Returns an error only if the process cannot be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.run_unchecked_with_env(program, args, &[])
    }

    /// Check if a program is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] that spawns real processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        let result = ExecResult::from(output);
        if !result.success {
            bail!(
                "{program} failed (exit {}): {}",
                result.code.unwrap_or(-1),
                result.stderr.trim()
            );
        }
        Ok(result)
    }

    fn run_unchecked_with_env(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        for (k, v) in env {
            cmd.env(k, v);
        }
        let output = cmd
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;
        Ok(ExecResult::from(output))
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Render a command line for log output.
#[must_use]
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn run_echo() {
        let result = SystemExecutor.run("echo", &["hello"]).unwrap();
        assert!(result.success);
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[test]
    #[cfg(unix)]
    fn run_failure() {
        let result = SystemExecutor.run("false", &[]);
        assert!(result.is_err(), "non-zero exit should produce an error");
    }

    #[test]
    #[cfg(unix)]
    fn run_unchecked_failure_is_not_an_error() {
        let result = SystemExecutor.run_unchecked("false", &[]).unwrap();
        assert!(!result.success);
        assert_eq!(result.code, Some(1));
    }

    #[test]
    #[cfg(unix)]
    fn run_unchecked_with_env_passes_variables() {
        let result = SystemExecutor
            .run_unchecked_with_env("sh", &["-c", "echo $GENES_TEST_VAR"], &[("GENES_TEST_VAR", "set")])
            .unwrap();
        assert_eq!(result.stdout.trim(), "set");
    }

    #[test]
    fn spawn_failure_propagates() {
        let result = SystemExecutor.run_unchecked("this-program-does-not-exist-12345", &[]);
        assert!(result.is_err());
    }

    #[test]
    fn which_missing_program() {
        assert!(!SystemExecutor.which("this-program-does-not-exist-12345"));
    }

    #[test]
    fn display_command_joins_with_spaces() {
        assert_eq!(
            display_command("sudo", &["-E", "apt-get", "update"]),
            "sudo -E apt-get update"
        );
        assert_eq!(display_command("brew", &[]), "brew");
    }
}
