//! Command-line interface definition.
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI entry point for the provisioning toolkit.
#[derive(Parser, Debug)]
#[command(
    name = "genes",
    about = "Provision a personal machine: packages and user accounts",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Configuration file (defaults to $GENES_CONFIG)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install packages and create the configured user account
    Install(InstallOpts),
    /// Show the detected platform
    Platform(PlatformOpts),
    /// Manage the local user account
    User(UserOpts),
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: clap_complete::Shell,
    },
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the persistent log file.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Install(_) => "install",
            Self::Platform(_) => "platform",
            Self::User(_) => "user",
            Self::Completions { .. } => "completions",
            Self::Version => "version",
        }
    }
}

/// Options for the `install` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct InstallOpts {
    /// Skip specific tasks
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Run only specific tasks
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,
}

/// Options for the `platform` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct PlatformOpts {
    /// Print as JSON
    #[arg(long)]
    pub json: bool,
}

/// Account operation.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    /// Create the account
    Install,
    /// Remove the account
    Uninstall,
    /// Apply account settings
    Configure,
    /// Report whether the account is configured and installed
    Status,
}

/// Options for the `user` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct UserOpts {
    /// Operation to perform
    #[arg(value_enum)]
    pub action: UserAction,

    /// Account name (defaults to [user].name from the config file)
    #[arg(long)]
    pub name: Option<String>,

    /// Group membership, repeatable (defaults to [user].groups)
    #[arg(long = "group", value_name = "GROUP")]
    pub groups: Vec<String>,
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_install_dry_run() {
        let cli = Cli::parse_from(["genes", "--dry-run", "install"]);
        assert!(cli.global.dry_run);
        assert!(matches!(cli.command, Command::Install(_)));
    }

    #[test]
    fn parse_install_dry_run_short() {
        let cli = Cli::parse_from(["genes", "-d", "install"]);
        assert!(cli.global.dry_run);
    }

    #[test]
    fn parse_global_after_subcommand() {
        let cli = Cli::parse_from(["genes", "install", "-d", "-v"]);
        assert!(cli.global.dry_run);
        assert!(cli.verbose);
    }

    #[test]
    fn parse_config_path() {
        let cli = Cli::parse_from(["genes", "-c", "/tmp/genes.toml", "install"]);
        assert_eq!(cli.global.config, Some(PathBuf::from("/tmp/genes.toml")));
    }

    #[test]
    fn parse_install_skip_tasks() {
        let cli = Cli::parse_from(["genes", "install", "--skip", "apt,cask"]);
        assert!(
            matches!(&cli.command, Command::Install(_)),
            "Expected Install command"
        );
        if let Command::Install(opts) = cli.command {
            assert_eq!(opts.skip, vec!["apt", "cask"]);
            assert!(opts.only.is_empty());
        }
    }

    #[test]
    fn parse_install_only_tasks() {
        let cli = Cli::parse_from(["genes", "install", "--only", "brew"]);
        if let Command::Install(opts) = cli.command {
            assert_eq!(opts.only, vec!["brew"]);
        } else {
            panic!("Expected Install command");
        }
    }

    #[test]
    fn parse_platform_json() {
        let cli = Cli::parse_from(["genes", "platform", "--json"]);
        assert!(matches!(cli.command, Command::Platform(PlatformOpts { json: true })));
    }

    #[test]
    fn parse_user_install_with_groups() {
        let cli = Cli::parse_from([
            "genes", "user", "install", "--name", "alice", "--group", "admin", "--group", "staff",
        ]);
        let Command::User(opts) = cli.command else {
            panic!("Expected User command");
        };
        assert_eq!(opts.action, UserAction::Install);
        assert_eq!(opts.name.as_deref(), Some("alice"));
        assert_eq!(opts.groups, vec!["admin", "staff"]);
    }

    #[test]
    fn parse_user_status_without_name() {
        let cli = Cli::parse_from(["genes", "user", "status"]);
        let Command::User(opts) = cli.command else {
            panic!("Expected User command");
        };
        assert_eq!(opts.action, UserAction::Status);
        assert_eq!(opts.name, None);
    }

    #[test]
    fn user_requires_action() {
        assert!(Cli::try_parse_from(["genes", "user"]).is_err());
        assert!(Cli::try_parse_from(["genes", "user", "delete"]).is_err());
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::parse_from(["genes", "completions", "zsh"]);
        assert!(matches!(
            cli.command,
            Command::Completions {
                shell: clap_complete::Shell::Zsh
            }
        ));
    }

    #[test]
    fn parse_version() {
        let cli = Cli::parse_from(["genes", "version"]);
        assert!(matches!(cli.command, Command::Version));
        assert_eq!(cli.command.log_name(), "version");
    }

    #[test]
    fn parse_verbose() {
        let cli = Cli::parse_from(["genes", "-v", "install"]);
        assert!(cli.verbose);
    }
}
