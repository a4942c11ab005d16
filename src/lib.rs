//! Machine provisioning for a personal workstation.
//!
//! `genes` installs the configured package sets through the native package
//! manager (apt on Debian and Ubuntu, Homebrew on macOS) and creates the
//! configured local user account.  Platform checks are expressed with the
//! [`gate`] module, which wraps a function so that it only runs when a set of
//! named conditions hold.
//!
//! The public API is organised into layers:
//!
//! - **[`gate`]**: conditional execution with `if_any_*` / `if_all_*` guards
//! - **[`platform`]**: operating system detection and platform predicates
//! - **[`config`]**: TOML configuration with built-in package defaults
//! - **[`resources`]**: package installers and user accounts
//! - **[`tasks`]**: named units of work wired to resources
//! - **[`commands`]**: top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod gate;
pub mod logging;
pub mod platform;
pub mod resources;
pub mod tasks;
