//! Package installation through `apt-get`, `brew` and `brew cask`.
//!
//! Every run is a cache refresh followed by one batch install.  The exit
//! status of either command is not interpreted: a non-zero exit is logged at
//! debug level and the install counts as applied.  Only a failure to start
//! the program is an error.
use std::fmt;

use anyhow::Result;

use super::{Applicable, ResourceChange};
use crate::config::packages::dedup;
use crate::error::ResourceError;
use crate::exec::{ExecResult, Executor, display_command};

/// Supported package managers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Debian/Ubuntu packages (`sudo -E apt-get`).
    Apt,
    /// Homebrew formulae.
    Brew,
    /// Homebrew casks.
    BrewCask,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apt => write!(f, "apt"),
            Self::Brew => write!(f, "brew"),
            Self::BrewCask => write!(f, "brew-cask"),
        }
    }
}

impl Backend {
    /// The package manager program itself.
    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Brew | Self::BrewCask => "brew",
        }
    }

    /// Every program a command for this backend spawns.  Apt commands go
    /// through `sudo`.
    #[must_use]
    pub const fn required_programs(self) -> &'static [&'static str] {
        match self {
            Self::Apt => &["sudo", "apt-get"],
            Self::Brew | Self::BrewCask => &["brew"],
        }
    }

    /// Command that refreshes the package cache.
    #[must_use]
    pub fn refresh_command(self) -> PackageCommand {
        match self {
            Self::Apt => PackageCommand::apt(vec!["update".to_string()]),
            Self::Brew | Self::BrewCask => PackageCommand::brew(vec!["update".to_string()]),
        }
    }

    /// Command that installs `names` in one batch.
    #[must_use]
    pub fn install_command(self, names: &[String]) -> PackageCommand {
        let prefix: &[&str] = match self {
            Self::Apt => &["-y", "install"],
            Self::Brew => &["install"],
            Self::BrewCask => &["cask", "install"],
        };
        let args = prefix
            .iter()
            .map(ToString::to_string)
            .chain(names.iter().cloned())
            .collect();
        match self {
            Self::Apt => PackageCommand::apt(args),
            Self::Brew | Self::BrewCask => PackageCommand::brew(args),
        }
    }
}

/// A single package manager invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageCommand {
    /// Program to start.
    pub program: &'static str,
    /// Arguments, in order.
    pub args: Vec<String>,
    /// Extra environment for the child process.
    pub env: Vec<(&'static str, &'static str)>,
}

impl PackageCommand {
    fn apt(rest: Vec<String>) -> Self {
        let mut args = vec!["-E".to_string(), "apt-get".to_string()];
        args.extend(rest);
        Self {
            program: "sudo",
            args,
            env: vec![("DEBIAN_FRONTEND", "noninteractive")],
        }
    }

    const fn brew(args: Vec<String>) -> Self {
        Self {
            program: "brew",
            args,
            env: Vec::new(),
        }
    }

    /// The command line as it would be typed, environment first.
    #[must_use]
    pub fn display(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let line = display_command(self.program, &args);
        if self.env.is_empty() {
            line
        } else {
            let env: Vec<String> = self.env.iter().map(|(k, v)| format!("{k}={v}")).collect();
            format!("{} {line}", env.join(" "))
        }
    }

    fn run(&self, executor: &dyn Executor) -> Result<ExecResult, ResourceError> {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        let result = executor
            .run_unchecked_with_env(self.program, &args, &self.env)
            .map_err(|e| ResourceError::PackageManager {
                program: self.program.to_string(),
                source: e.into(),
            })?;
        if !result.success {
            tracing::debug!(
                "{} exited with {}: {}",
                self.display(),
                result
                    .code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string()),
                result.stderr.trim()
            );
        }
        Ok(result)
    }
}

/// A batch of packages bound to one backend.
#[derive(Debug)]
pub struct PackageInstaller<'a> {
    backend: Backend,
    names: Vec<String>,
    executor: &'a dyn Executor,
}

impl<'a> PackageInstaller<'a> {
    /// Create an installer for `names`.  Blank and repeated names are
    /// dropped.
    #[must_use]
    pub fn new(backend: Backend, names: &[String], executor: &'a dyn Executor) -> Self {
        Self {
            backend,
            names: dedup(names.iter().map(String::as_str)),
            executor,
        }
    }

    /// Backend used for every command.
    #[must_use]
    pub const fn backend(&self) -> Backend {
        self.backend
    }

    /// Package names that will be installed.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// The commands [`apply`](Applicable::apply) issues, in order.  Empty
    /// when there is nothing to install.
    #[must_use]
    pub fn commands(&self) -> Vec<PackageCommand> {
        if self.names.is_empty() {
            return Vec::new();
        }
        vec![
            self.backend.refresh_command(),
            self.backend.install_command(&self.names),
        ]
    }

    /// Refresh the package cache.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::PackageManager`] if the program cannot be
    /// started.
    pub fn refresh(&self) -> Result<ExecResult, ResourceError> {
        self.backend.refresh_command().run(self.executor)
    }

    /// Install every package in one command.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::PackageManager`] if the program cannot be
    /// started.
    pub fn install(&self) -> Result<ExecResult, ResourceError> {
        self.backend.install_command(&self.names).run(self.executor)
    }
}

impl Applicable for PackageInstaller<'_> {
    fn description(&self) -> String {
        format!("{} packages ({})", self.names.len(), self.backend)
    }

    fn apply(&self) -> Result<ResourceChange> {
        if self.names.is_empty() {
            return Ok(ResourceChange::skipped("no packages to install"));
        }
        self.refresh()?;
        self.install()?;
        Ok(ResourceChange::Applied)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::RecordingExecutor;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[derive(Debug)]
    struct UnstartableExecutor;

    impl Executor for UnstartableExecutor {
        fn run(&self, program: &str, _: &[&str]) -> anyhow::Result<ExecResult> {
            anyhow::bail!("failed to execute: {program}")
        }

        fn run_unchecked_with_env(
            &self,
            program: &str,
            _: &[&str],
            _: &[(&str, &str)],
        ) -> anyhow::Result<ExecResult> {
            anyhow::bail!("failed to execute: {program}")
        }

        fn which(&self, _: &str) -> bool {
            false
        }
    }

    #[test]
    fn apt_commands_are_elevated_and_noninteractive() {
        let exec = RecordingExecutor::default();
        let installer = PackageInstaller::new(Backend::Apt, &names(&["curl", "tmux"]), &exec);
        assert_eq!(installer.apply().unwrap(), ResourceChange::Applied);

        let calls = exec.calls();
        assert_eq!(
            exec.lines(),
            vec![
                "sudo -E apt-get update",
                "sudo -E apt-get -y install curl tmux"
            ]
        );
        for call in &calls {
            assert_eq!(
                call.env,
                vec![("DEBIAN_FRONTEND".to_string(), "noninteractive".to_string())]
            );
        }
    }

    #[test]
    fn brew_commands() {
        let exec = RecordingExecutor::default();
        PackageInstaller::new(Backend::Brew, &names(&["jq"]), &exec)
            .apply()
            .unwrap();
        assert_eq!(exec.lines(), vec!["brew update", "brew install jq"]);
        assert!(exec.calls().iter().all(|c| c.env.is_empty()));
    }

    #[test]
    fn brew_cask_commands() {
        let exec = RecordingExecutor::default();
        PackageInstaller::new(Backend::BrewCask, &names(&["iterm2", "firefox"]), &exec)
            .apply()
            .unwrap();
        assert_eq!(
            exec.lines(),
            vec!["brew update", "brew cask install iterm2 firefox"]
        );
    }

    #[test]
    fn non_zero_exit_is_not_an_error() {
        let exec = RecordingExecutor::failing();
        let change = PackageInstaller::new(Backend::Apt, &names(&["nmap"]), &exec)
            .apply()
            .unwrap();
        assert_eq!(change, ResourceChange::Applied);
        assert_eq!(exec.calls().len(), 2, "install still runs after failed update");
    }

    #[test]
    fn spawn_failure_propagates() {
        let installer = PackageInstaller::new(Backend::Brew, &names(&["jq"]), &UnstartableExecutor);
        let err = installer.refresh().unwrap_err();
        assert!(matches!(err, ResourceError::PackageManager { ref program, .. } if program == "brew"));
        assert!(installer.apply().is_err());
    }

    #[test]
    fn empty_list_issues_no_commands() {
        let exec = RecordingExecutor::default();
        let installer = PackageInstaller::new(Backend::Apt, &names(&["", "  "]), &exec);
        assert!(installer.commands().is_empty());
        assert!(matches!(
            installer.apply().unwrap(),
            ResourceChange::Skipped { .. }
        ));
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn names_are_deduplicated_in_order() {
        let exec = RecordingExecutor::default();
        let installer =
            PackageInstaller::new(Backend::Brew, &names(&["vim", "jq", "vim", " jq "]), &exec);
        assert_eq!(installer.names(), &["vim", "jq"]);
    }

    #[test]
    fn commands_display_with_environment() {
        let exec = RecordingExecutor::default();
        let installer = PackageInstaller::new(Backend::Apt, &names(&["jq"]), &exec);
        let shown: Vec<String> = installer.commands().iter().map(PackageCommand::display).collect();
        insta::assert_snapshot!(shown.join("\n"), @r"
        DEBIAN_FRONTEND=noninteractive sudo -E apt-get update
        DEBIAN_FRONTEND=noninteractive sudo -E apt-get -y install jq
        ");
        assert!(exec.calls().is_empty(), "commands() must not run anything");
    }

    #[test]
    fn description_names_backend() {
        let exec = RecordingExecutor::default();
        let installer = PackageInstaller::new(Backend::BrewCask, &names(&["a", "b"]), &exec);
        assert_eq!(installer.description(), "2 packages (brew-cask)");
        assert_eq!(installer.backend().program(), "brew");
        assert_eq!(Backend::Apt.program(), "apt-get");
        assert_eq!(Backend::Apt.required_programs(), ["sudo", "apt-get"]);
        assert_eq!(Backend::BrewCask.required_programs(), ["brew"]);
    }
}
