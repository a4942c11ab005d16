//! User account task.
use std::sync::Arc;

use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::gate::{Flag, GatePolicy, Guard, if_all_conds};
use crate::resources::ResourceChange;
use crate::resources::account::UserAccount;

/// Create the configured local user account.
#[derive(Debug)]
pub struct CreateUserAccount;

impl Task for CreateUserAccount {
    fn name(&self) -> &'static str {
        "Create user account"
    }

    fn guard(&self, ctx: &Context) -> Guard {
        if_all_conds(
            vec![Flag::new(
                "user_name_configured",
                ctx.config.user.name.is_some(),
            )],
            GatePolicy::Silent,
        )
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let user = &ctx.config.user;
        let account = UserAccount::for_platform(
            &ctx.platform,
            user.name.clone(),
            Arc::clone(&ctx.executor),
        )
        .with_groups(user.groups.clone());

        let Some(name) = account.username() else {
            return Ok(TaskResult::Skipped("no user name configured".to_string()));
        };

        // Outside `would_create`, `install` only reports why it skips.
        if ctx.dry_run && account.would_create() {
            ctx.log
                .dry_run(&format!("create user account {name} on {}", ctx.platform.os));
            return Ok(TaskResult::DryRun);
        }

        match account.install()? {
            ResourceChange::Applied => ctx.log.info(&format!("created user {name}")),
            ResourceChange::AlreadyCorrect => ctx.log.debug(&format!("user {name} exists")),
            ResourceChange::Skipped { reason } => return Ok(TaskResult::Skipped(reason)),
        }

        if !account.groups().is_empty()
            && let ResourceChange::Skipped { reason } =
                account.configure(name, account.groups())?
        {
            ctx.log.debug(&format!("groups not applied: {reason}"));
        }

        Ok(TaskResult::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::{Config, UserConfig};
    use crate::exec::test_helpers::RecordingExecutor;
    use crate::logging::TaskStatus;
    use crate::platform::Os;
    use crate::tasks::execute;
    use crate::tasks::test_helpers::{test_context, test_context_with};

    fn with_user(name: Option<&str>) -> Config {
        Config {
            user: UserConfig {
                name: name.map(String::from),
                groups: vec!["admin".to_string()],
            },
            ..Config::default()
        }
    }

    #[test]
    fn not_applicable_without_user_name() {
        let t = test_context(Os::Osx, with_user(None), false);
        assert!(!CreateUserAccount.should_run(&t.ctx));
        execute(&CreateUserAccount, &t.ctx);
        assert_eq!(t.log.tasks()[0].status, TaskStatus::NotApplicable);
    }

    #[test]
    fn creates_record_on_osx() {
        let t = test_context(Os::Osx, with_user(Some("alice")), false);
        let result = CreateUserAccount.run(&t.ctx).unwrap();
        assert_eq!(result, TaskResult::Ok);
        assert_eq!(t.executor.lines(), vec!["dscl . -create /Users/alice"]);
        assert_eq!(t.log.infos(), vec!["created user alice"]);
    }

    #[test]
    fn skipped_on_debian() {
        let t = test_context(Os::Debian, with_user(Some("alice")), false);
        let result = CreateUserAccount.run(&t.ctx).unwrap();
        assert!(matches!(result, TaskResult::Skipped(_)));
        assert!(t.executor.calls().is_empty());
    }

    #[test]
    fn dry_run_does_not_call_dscl() {
        let t = test_context(Os::Osx, with_user(Some("alice")), true);
        assert_eq!(CreateUserAccount.run(&t.ctx).unwrap(), TaskResult::DryRun);
        assert!(t.executor.calls().is_empty());
        assert_eq!(t.log.dry_runs(), vec!["create user account alice on osx"]);
    }

    #[test]
    fn dry_run_on_debian_matches_real_run() {
        let real = test_context(Os::Debian, with_user(Some("alice")), false);
        let dry = test_context(Os::Debian, with_user(Some("alice")), true);
        let expected =
            TaskResult::Skipped("account creation is not implemented on debian".to_string());
        assert_eq!(CreateUserAccount.run(&real.ctx).unwrap(), expected);
        assert_eq!(CreateUserAccount.run(&dry.ctx).unwrap(), expected);
        assert!(dry.log.dry_runs().is_empty());
        assert!(dry.executor.calls().is_empty());
    }

    #[test]
    fn dscl_failure_fails_the_task() {
        let t = test_context_with(
            Os::Osx,
            with_user(Some("alice")),
            false,
            RecordingExecutor::failing(),
        );
        execute(&CreateUserAccount, &t.ctx);
        let entry = &t.log.tasks()[0];
        assert_eq!(entry.status, TaskStatus::Failed);
        assert!(entry.message.as_deref().unwrap().contains("alice"));
    }
}
