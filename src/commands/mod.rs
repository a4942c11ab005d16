//! Top-level subcommand orchestration.
pub mod completions;
pub mod install;
pub mod platform;
pub mod user;
pub mod version;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::logging::Logger;
use crate::platform::Platform;
use crate::tasks::{self, Context, Task};

/// Shared state produced by the common command setup sequence.
#[derive(Debug)]
pub struct CommandSetup {
    /// Process-wide detected platform.
    pub platform: &'static Platform,
    /// Loaded configuration.
    pub config: Config,
}

impl CommandSetup {
    /// Read the process-wide platform and load the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or parsed.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let platform = Platform::current();
        log.debug(&format!(
            "platform: {} {}",
            platform.os,
            platform.version.as_deref().unwrap_or("")
        ));

        let config = Config::load(global.config.as_deref())?;
        match &config.source {
            Some(path) => log.debug(&format!("config: {}", path.display())),
            None => log.debug("config: built-in defaults"),
        }
        log.debug(&format!(
            "{} apt, {} brew, {} cask packages",
            config.packages.apt.len(),
            config.packages.brew.len(),
            config.packages.cask.len()
        ));

        let warnings = config.validate();
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.source, warning.item, warning.message
                ));
            }
        }

        Ok(Self { platform, config })
    }
}

/// Execute every task in order, print the summary, and bail if any task failed.
///
/// # Errors
///
/// Returns an error if one or more tasks recorded a failure.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    for task in tasks {
        tasks::execute(task, ctx);
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}
