//! Named units of work run by the install command.
//!
//! Each task owns a [`Guard`] deciding whether it applies to the current
//! platform and configuration; [`execute`] consults the guard, runs the task
//! and records the outcome for the summary.
pub mod account;
mod context;
pub mod packages;

pub use context::Context;

use std::sync::Arc;

use anyhow::Result;

use crate::gate::{GatePolicy, Guard, if_all_conds};
use crate::logging::TaskStatus;

/// Outcome of a task that ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task decided there was nothing to do.
    Skipped(String),
    /// Task only reported what it would do.
    DryRun,
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Gate deciding whether this task applies.
    ///
    /// The default has no conditions and always admits.
    fn guard(&self, _ctx: &Context) -> Guard {
        if_all_conds(Vec::new(), GatePolicy::Silent)
    }

    /// Whether this task should run on the current platform and
    /// configuration.
    fn should_run(&self, ctx: &Context) -> bool {
        self.guard(ctx).is_satisfied()
    }

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if an external program cannot be started or a
    /// resource rejects the change.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete set of tasks run by the install command, in execution
/// order.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(packages::InstallAptPackages),
        Box::new(packages::InstallBrewPackages),
        Box::new(packages::InstallBrewCasks),
        Box::new(account::CreateUserAccount),
    ]
}

/// Select tasks by case-insensitive name substring.
///
/// A non-empty `only` keeps matching tasks; otherwise `skip` drops matching
/// tasks.
#[must_use]
pub fn filter_tasks<'a>(
    tasks: &'a [Box<dyn Task>],
    skip: &[String],
    only: &[String],
) -> Vec<&'a dyn Task> {
    let matches = |name: &str, patterns: &[String]| {
        patterns
            .iter()
            .any(|p| name.contains(&p.to_lowercase()))
    };
    tasks
        .iter()
        .filter(|t| {
            let name = t.name().to_lowercase();
            if !only.is_empty() {
                return matches(&name, only);
            }
            !matches(&name, skip)
        })
        .map(AsRef::as_ref)
        .collect()
}

/// Execute a task, recording the result in the logger.
pub fn execute(task: &dyn Task, ctx: &Context) {
    let guard = task.guard(ctx).with_sink(Arc::clone(&ctx.log));
    match guard.admit(task.name()) {
        Ok(true) => {}
        Ok(false) => {
            ctx.log
                .debug(&format!("skipping task: {} (not applicable)", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::NotApplicable, None);
            return;
        }
        Err(e) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&e.to_string()));
            return;
        }
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
        }
    }
}


#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::test_helpers::test_context;
    use super::*;
    use crate::config::Config;
    use crate::gate::{Flag, if_any_conds};
    use crate::platform::Os;

    struct Fixed {
        name: &'static str,
        admit: bool,
        policy: GatePolicy,
        result: fn() -> Result<TaskResult>,
    }

    impl Task for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn guard(&self, _ctx: &Context) -> Guard {
            if_any_conds(vec![Flag::new("admit", self.admit)], self.policy)
        }

        fn run(&self, _ctx: &Context) -> Result<TaskResult> {
            (self.result)()
        }
    }

    fn fixed(admit: bool, result: fn() -> Result<TaskResult>) -> Fixed {
        Fixed {
            name: "fixed",
            admit,
            policy: GatePolicy::Silent,
            result,
        }
    }

    fn names(tasks: &[&dyn Task]) -> Vec<String> {
        tasks.iter().map(|t| t.name().to_string()).collect()
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn install_tasks_in_order() {
        let tasks = all_install_tasks();
        let names: Vec<&str> = tasks.iter().map(|t| t.name()).collect();
        insta::assert_snapshot!(names.join("\n"), @r"
        Install apt packages
        Install brew packages
        Install brew casks
        Create user account
        ");
    }

    #[test]
    fn filter_only_is_case_insensitive() {
        let tasks = all_install_tasks();
        let selected = filter_tasks(&tasks, &[], &args(&["BREW"]));
        assert_eq!(
            names(&selected),
            vec!["Install brew packages", "Install brew casks"]
        );
    }

    #[test]
    fn filter_skip_drops_matches() {
        let tasks = all_install_tasks();
        let selected = filter_tasks(&tasks, &args(&["user", "cask"]), &[]);
        assert_eq!(
            names(&selected),
            vec!["Install apt packages", "Install brew packages"]
        );
    }

    #[test]
    fn filter_only_wins_over_skip() {
        let tasks = all_install_tasks();
        let selected = filter_tasks(&tasks, &args(&["apt"]), &args(&["apt"]));
        assert_eq!(names(&selected), vec!["Install apt packages"]);
    }

    #[test]
    fn filter_without_patterns_keeps_all() {
        let tasks = all_install_tasks();
        assert_eq!(filter_tasks(&tasks, &[], &[]).len(), tasks.len());
    }

    #[test]
    fn default_guard_always_admits() {
        struct Bare;
        impl Task for Bare {
            fn name(&self) -> &str {
                "bare"
            }
            fn run(&self, _ctx: &Context) -> Result<TaskResult> {
                Ok(TaskResult::Ok)
            }
        }
        let t = test_context(Os::Unknown, Config::default(), false);
        assert!(Bare.should_run(&t.ctx));
    }

    #[test]
    fn execute_records_ok() {
        let t = test_context(Os::Debian, Config::default(), false);
        execute(&fixed(true, || Ok(TaskResult::Ok)), &t.ctx);
        let tasks = t.log.tasks();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, TaskStatus::Ok);
        assert_eq!(t.log.infos(), vec!["fixed"], "stage header is logged");
    }

    #[test]
    fn execute_records_not_applicable_without_running() {
        let t = test_context(Os::Debian, Config::default(), false);
        execute(&fixed(false, || panic!("must not run")), &t.ctx);
        assert_eq!(t.log.tasks()[0].status, TaskStatus::NotApplicable);
        assert!(t.log.infos().is_empty());
    }

    #[test]
    fn execute_records_skip_reason() {
        let t = test_context(Os::Debian, Config::default(), false);
        execute(
            &fixed(true, || Ok(TaskResult::Skipped("nothing to do".to_string()))),
            &t.ctx,
        );
        let entry = &t.log.tasks()[0];
        assert_eq!(entry.status, TaskStatus::Skipped);
        assert_eq!(entry.message.as_deref(), Some("nothing to do"));
    }

    #[test]
    fn execute_records_failure_and_logs_error() {
        let t = test_context(Os::Debian, Config::default(), false);
        execute(&fixed(true, || Err(anyhow::anyhow!("boom"))), &t.ctx);
        assert_eq!(t.log.tasks()[0].status, TaskStatus::Failed);
        assert_eq!(t.log.errors(), vec!["fixed: boom"]);
    }

    #[test]
    fn execute_records_dry_run() {
        let t = test_context(Os::Debian, Config::default(), true);
        execute(&fixed(true, || Ok(TaskResult::DryRun)), &t.ctx);
        assert_eq!(t.log.tasks()[0].status, TaskStatus::DryRun);
    }

    #[test]
    fn warn_policy_logs_refusal() {
        let t = test_context(Os::Debian, Config::default(), false);
        let task = Fixed {
            policy: GatePolicy::Warn,
            ..fixed(false, || Ok(TaskResult::Ok))
        };
        execute(&task, &t.ctx);
        assert_eq!(t.log.tasks()[0].status, TaskStatus::NotApplicable);
        assert_eq!(
            t.log.warnings(),
            vec!["This function: fixed was not run because none of the following condtions were True: admit"]
        );
    }

    #[test]
    fn raise_policy_fails_the_task() {
        let t = test_context(Os::Debian, Config::default(), false);
        let task = Fixed {
            policy: GatePolicy::Raise,
            ..fixed(false, || Ok(TaskResult::Ok))
        };
        execute(&task, &t.ctx);
        let entry = &t.log.tasks()[0];
        assert_eq!(entry.status, TaskStatus::Failed);
        assert!(entry.message.as_deref().unwrap().starts_with("This function: fixed"));
        assert_eq!(t.log.errors().len(), 1);
    }
}
