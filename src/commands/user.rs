//! Command: manage the local user account.
use std::sync::Arc;

use anyhow::{Result, bail};

use super::CommandSetup;
use crate::cli::{GlobalOpts, UserAction, UserOpts};
use crate::exec::SystemExecutor;
use crate::gate::{GatePolicy, Guard};
use crate::logging::{Log, Logger};
use crate::platform::only_osx;
use crate::resources::ResourceChange;
use crate::resources::account::UserAccount;

/// Run the user command.
///
/// # Errors
///
/// Returns an error if configuration loading fails, the directory service
/// rejects the account, or `configure` is run without a user name.
pub fn run(global: &GlobalOpts, opts: &UserOpts, log: &Arc<Logger>) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let name = opts.name.clone().or(setup.config.user.name);
    let groups = if opts.groups.is_empty() {
        setup.config.user.groups
    } else {
        opts.groups.clone()
    };

    let account = UserAccount::for_platform(setup.platform, name, Arc::new(SystemExecutor))
        .with_groups(groups);
    let log: Arc<dyn Log> = Arc::clone(log) as Arc<dyn Log>;
    let guard = only_osx(None, GatePolicy::Warn).with_sink(Arc::clone(&log));

    apply(opts.action, &account, &guard, global.dry_run, log.as_ref())
}

/// Perform `action` on `account`.  Account creation only runs when `guard`
/// admits it.
///
/// # Errors
///
/// Returns an error if the guard raises, the directory service rejects the
/// account, or `configure` is requested without a user name.
pub fn apply(
    action: UserAction,
    account: &UserAccount,
    guard: &Guard,
    dry_run: bool,
    log: &dyn Log,
) -> Result<()> {
    match action {
        UserAction::Status => {
            log.info(&format!(
                "user: {}",
                account.username().unwrap_or("(not set)")
            ));
            log.info(&format!("groups: {}", account.groups().join(", ")));
            log.info(&format!("configured: {}", account.is_configured()));
            log.info(&format!("installed: {}", account.is_installed()));
            Ok(())
        }
        UserAction::Install => {
            if dry_run {
                if !guard.admit("create_user")? {
                    log.debug("account creation not admitted");
                } else if account.would_create() {
                    log.dry_run(&format!(
                        "create user account {}",
                        account.username().unwrap_or("(not set)")
                    ));
                } else {
                    report(log, &account.install()?);
                }
                return Ok(());
            }
            let create = guard
                .clone()
                .wrap("create_user", |a: &UserAccount| a.install())
                .with_doc("Create the account through the directory service.");
            match create.call(account)? {
                Some(change) => report(log, &change?),
                None => log.debug("account creation not admitted"),
            }
            Ok(())
        }
        UserAction::Uninstall => {
            report(log, &account.uninstall()?);
            Ok(())
        }
        UserAction::Configure => {
            let Some(name) = account.username() else {
                bail!("a user name is required: pass --name or set [user].name");
            };
            report(log, &account.configure(name, account.groups())?);
            Ok(())
        }
    }
}

fn report(log: &dyn Log, change: &ResourceChange) {
    match change {
        ResourceChange::Applied => log.info("applied"),
        ResourceChange::AlreadyCorrect => log.info("already up to date"),
        ResourceChange::Skipped { reason } => log.info(&format!("skipped: {reason}")),
    }
}
