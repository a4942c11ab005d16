//! The production [`Log`]: `tracing` events plus the task summary.
use std::path::PathBuf;
use std::sync::Mutex;

use super::types::{DRY_RUN_TARGET, Log, STAGE_TARGET, TaskEntry, TaskStatus};
use super::utils::{log_file_path, paint};

/// Emits every message as a `tracing` event and remembers task outcomes
/// for [`print_summary`](Self::print_summary).
///
/// Rendering is left to the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber).
#[derive(Debug)]
pub struct Logger {
    tasks: Mutex<Vec<TaskEntry>>,
    log_file: Option<PathBuf>,
}

#[allow(clippy::unused_self)]
impl Logger {
    /// Create a logger for `command`.  The log file path is only used in the
    /// summary; the subscriber owns the file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Log file shown in the summary.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Snapshot of the recorded task outcomes.
    #[must_use]
    pub fn task_entries(&self) -> Vec<TaskEntry> {
        self.tasks.lock().map_or_else(|_| Vec::new(), |t| t.clone())
    }

    /// Log an error.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header.
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message.  Shown on the console only with `-v`.
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a command skipped because of `--dry-run`.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Remember a task outcome for the summary.
    pub fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        if let Ok(mut tasks) = self.tasks.lock() {
            tasks.push(TaskEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Number of tasks recorded as [`TaskStatus::Failed`].
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.tasks.lock().map_or(0, |tasks| {
            tasks
                .iter()
                .filter(|t| t.status == TaskStatus::Failed)
                .count()
        })
    }

    /// Log one line per task, a totals line and the log file location.
    /// Does nothing when no task was recorded.
    pub fn print_summary(&self) {
        let tasks = self.task_entries();
        if tasks.is_empty() {
            return;
        }
        self.stage("Summary");
        for line in summary_lines(&tasks) {
            self.info(&line);
        }
        if let Some(path) = &self.log_file {
            self.info(&paint("2", &format!("log: {}", path.display())));
        }
    }
}

/// Coloured summary: one line per task followed by the per-status totals.
fn summary_lines(tasks: &[TaskEntry]) -> Vec<String> {
    let mut lines: Vec<String> = tasks
        .iter()
        .map(|t| {
            let detail = t
                .message
                .as_deref()
                .map_or_else(String::new, |m| format!(" ({m})"));
            paint(
                t.status.sgr(),
                &format!("{} {}{detail}", t.status.marker(), t.name),
            )
        })
        .collect();

    let totals: Vec<String> = TaskStatus::ALL
        .iter()
        .map(|status| {
            let n = tasks.iter().filter(|t| t.status == *status).count();
            paint(status.sgr(), &format!("{n} {}", status.label()))
        })
        .collect();
    lines.push(format!("{} tasks: {}", tasks.len(), totals.join(", ")));
    lines
}

impl Log for Logger {
    fn stage(&self, msg: &str) {
        self.stage(msg);
    }

    fn info(&self, msg: &str) {
        self.info(msg);
    }

    fn debug(&self, msg: &str) {
        self.debug(msg);
    }

    fn warn(&self, msg: &str) {
        self.warn(msg);
    }

    fn error(&self, msg: &str) {
        self.error(msg);
    }

    fn dry_run(&self, msg: &str) {
        self.dry_run(msg);
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.record_task(name, status, message);
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use crate::logging::utils::strip_ansi;
    use std::fs;

    fn entry(name: &str, status: TaskStatus, message: Option<&str>) -> TaskEntry {
        TaskEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        }
    }

    #[test]
    fn summary_lists_each_task_then_totals() {
        let tasks = [
            entry("Install apt packages", TaskStatus::Ok, None),
            entry("Install brew packages", TaskStatus::NotApplicable, None),
            entry("Install brew casks", TaskStatus::NotApplicable, None),
            entry(
                "Create user account",
                TaskStatus::Skipped,
                Some("account creation is not implemented on debian"),
            ),
        ];
        let plain: Vec<String> = summary_lines(&tasks).iter().map(|l| strip_ansi(l)).collect();
        insta::assert_snapshot!(plain.join("\n"), @r"
        ✓ Install apt packages
        · Install brew packages
        · Install brew casks
        ○ Create user account (account creation is not implemented on debian)
        4 tasks: 1 ok, 2 n/a, 1 skipped, 0 dry-run, 0 failed
        ");
    }

    #[test]
    fn failure_count_only_counts_failed() {
        let (log, _tmp, _guard) = isolated_logger();
        assert_eq!(log.failure_count(), 0);
        log.record_task("a", TaskStatus::Ok, None);
        log.record_task("b", TaskStatus::Failed, Some("apt-get not found"));
        log.record_task("c", TaskStatus::Failed, Some("dscl refused"));
        log.record_task("d", TaskStatus::DryRun, None);
        assert_eq!(log.failure_count(), 2);
        assert_eq!(log.task_entries()[1].message.as_deref(), Some("apt-get not found"));
    }

    #[test]
    fn records_through_trait_object() {
        let (log, _tmp, _guard) = isolated_logger();
        let sink: &dyn Log = &log;
        sink.record_task("Create user account", TaskStatus::Ok, None);
        assert_eq!(log.task_entries().len(), 1);
    }

    #[test]
    fn file_receives_every_level() {
        let (log, _tmp, _guard) = isolated_logger();
        let pid = std::process::id();
        log.debug(&format!("debug-{pid}"));
        log.warn(&format!("warn-{pid}"));
        log.error(&format!("error-{pid}"));
        log.stage(&format!("stage-{pid}"));
        log.dry_run(&format!("dryrun-{pid}"));
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains(&format!("[debug] debug-{pid}")));
        assert!(contents.contains(&format!("[warn] warn-{pid}")));
        assert!(contents.contains(&format!("[error] error-{pid}")));
        assert!(contents.contains(&format!("==> stage-{pid}")));
        assert!(contents.contains(&format!("[dry run] dryrun-{pid}")));
    }

    #[test]
    fn summary_in_file_has_no_escapes() {
        let (log, _tmp, _guard) = isolated_logger();
        log.record_task("Install brew packages", TaskStatus::NotApplicable, None);
        log.print_summary();
        let contents = fs::read_to_string(log.log_path().expect("log path")).unwrap();
        assert!(contents.contains("· Install brew packages"));
        assert!(!contents.contains('\x1b'));
    }
}
