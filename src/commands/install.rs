//! Command: install packages and the user account.
use std::sync::Arc;

use anyhow::Result;

use super::{CommandSetup, run_tasks_to_completion};
use crate::cli::{GlobalOpts, InstallOpts};
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger};
use crate::tasks::{self, Context};

/// Run the install command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or any task fails.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("genes {}", super::version::version()));

    log.stage("Loading configuration");
    let setup = CommandSetup::init(global, log)?;
    log.info(&format!("platform: {}", setup.platform.os));

    let ctx = Context::new(
        Arc::new(setup.config),
        Arc::new(setup.platform.clone()),
        Arc::clone(log) as Arc<dyn Log>,
        global.dry_run,
        Arc::new(SystemExecutor),
    );

    let all_tasks = tasks::all_install_tasks();
    let selected = tasks::filter_tasks(&all_tasks, &opts.skip, &opts.only);
    if selected.is_empty() {
        log.warn("no tasks match the --skip/--only filters");
    }

    run_tasks_to_completion(selected, &ctx, log)
}
