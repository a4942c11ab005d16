//! Core logging types: task entries, status, and the [`Log`] trait.

/// `tracing` target for stage headers.
pub const STAGE_TARGET: &str = "genes::stage";

/// `tracing` target for commands that a dry run would have issued.
pub const DRY_RUN_TARGET: &str = "genes::dry_run";

/// Outcome of one task, kept for the end-of-run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskEntry {
    /// Task name as returned by `Task::name`.
    pub name: String,
    /// Final status of the task.
    pub status: TaskStatus,
    /// Skip reason or error description.
    pub message: Option<String>,
}

/// Status of a completed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Task completed successfully.
    Ok,
    /// The task's gate refused it on this platform or configuration.
    NotApplicable,
    /// Task ran but found nothing to do.
    Skipped,
    /// Task only reported the commands it would run.
    DryRun,
    /// Task encountered an error and could not complete.
    Failed,
}

impl TaskStatus {
    /// All statuses in summary order.
    pub const ALL: [Self; 5] = [
        Self::Ok,
        Self::NotApplicable,
        Self::Skipped,
        Self::DryRun,
        Self::Failed,
    ];

    /// One-character marker printed before the task name.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Ok => '✓',
            Self::NotApplicable => '·',
            Self::Skipped => '○',
            Self::DryRun => '~',
            Self::Failed => '✗',
        }
    }

    /// SGR parameters used on the console.
    #[must_use]
    pub const fn sgr(self) -> &'static str {
        match self {
            Self::Ok => "32",
            Self::NotApplicable => "2",
            Self::Skipped => "33",
            Self::DryRun => "37",
            Self::Failed => "31",
        }
    }

    /// Label used in the totals line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NotApplicable => "n/a",
            Self::Skipped => "skipped",
            Self::DryRun => "dry-run",
            Self::Failed => "failed",
        }
    }
}

/// Sink for everything the gate, tasks and commands report.
///
/// [`Logger`](super::logger::Logger) forwards to `tracing`; tests substitute
/// an in-memory recorder.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a command that was not run because of `--dry-run`.
    fn dry_run(&self, msg: &str);
    /// Record a task result for the summary.
    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn markers_and_labels_are_distinct() {
        let markers: HashSet<char> = TaskStatus::ALL.iter().map(|s| s.marker()).collect();
        let labels: HashSet<&str> = TaskStatus::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(markers.len(), TaskStatus::ALL.len());
        assert_eq!(labels.len(), TaskStatus::ALL.len());
    }

    #[test]
    fn failed_is_red() {
        assert_eq!(TaskStatus::Failed.sgr(), "31");
    }
}
