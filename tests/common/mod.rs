// Shared helpers for integration tests.
//
// Provides a temporary config file builder plus in-memory `Log` and
// `Executor` doubles, so each integration test can drive tasks without
// touching the real system.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use genes_cli::config::Config;
use genes_cli::exec::{ExecResult, Executor};
use genes_cli::logging::{Log, TaskEntry, TaskStatus};
use genes_cli::platform::{Os, Platform};
use genes_cli::tasks::Context;

/// A config file inside a [`tempfile::TempDir`].
///
/// The directory is deleted when dropped.
pub struct ConfigFixture {
    dir: tempfile::TempDir,
    path: PathBuf,
}

impl ConfigFixture {
    /// Write `content` to `genes.toml` in a fresh temporary directory.
    pub fn new(content: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("genes.toml");
        std::fs::write(&path, content).expect("write config file");
        Self { dir, path }
    }

    /// Path of a file in the fixture directory that was never written.
    pub fn missing(&self) -> PathBuf {
        self.dir.path().join("absent.toml")
    }

    /// Path to the config file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the file through [`Config::load`].
    pub fn load(&self) -> Config {
        Config::load(Some(&self.path)).expect("load config")
    }
}

/// A [`Log`] that keeps messages in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    pub infos: Mutex<Vec<String>>,
    pub warnings: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
    pub dry_runs: Mutex<Vec<String>>,
    pub tasks: Mutex<Vec<TaskEntry>>,
}

impl MemoryLog {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub fn dry_runs(&self) -> Vec<String> {
        self.dry_runs.lock().unwrap().clone()
    }

    pub fn statuses(&self) -> Vec<(String, TaskStatus)> {
        self.tasks
            .lock()
            .unwrap()
            .iter()
            .map(|t| (t.name.clone(), t.status))
            .collect()
    }
}

impl Log for MemoryLog {
    fn stage(&self, _msg: &str) {}

    fn info(&self, msg: &str) {
        self.infos.lock().unwrap().push(msg.to_string());
    }

    fn debug(&self, _msg: &str) {}

    fn warn(&self, msg: &str) {
        self.warnings.lock().unwrap().push(msg.to_string());
    }

    fn error(&self, msg: &str) {
        self.errors.lock().unwrap().push(msg.to_string());
    }

    fn dry_run(&self, msg: &str) {
        self.dry_runs.lock().unwrap().push(msg.to_string());
    }

    fn record_task(&self, name: &str, status: TaskStatus, message: Option<&str>) {
        self.tasks.lock().unwrap().push(TaskEntry {
            name: name.to_string(),
            status,
            message: message.map(String::from),
        });
    }
}

/// An [`Executor`] that succeeds without running anything and records each
/// command line.
#[derive(Debug, Default)]
pub struct FakeExecutor {
    pub lines: Mutex<Vec<String>>,
}

impl FakeExecutor {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl Executor for FakeExecutor {
    fn run(&self, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
        self.run_unchecked_with_env(program, args, &[])
    }

    fn run_unchecked_with_env(
        &self,
        program: &str,
        args: &[&str],
        _env: &[(&str, &str)],
    ) -> anyhow::Result<ExecResult> {
        let mut line = vec![program];
        line.extend_from_slice(args);
        self.lines.lock().unwrap().push(line.join(" "));
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        })
    }

    fn which(&self, _program: &str) -> bool {
        true
    }
}

/// A task context for `os` backed by the in-memory doubles.
pub fn context(
    os: Os,
    config: Config,
    dry_run: bool,
) -> (Context, Arc<MemoryLog>, Arc<FakeExecutor>) {
    let log = Arc::new(MemoryLog::default());
    let executor = Arc::new(FakeExecutor::default());
    let version = (os == Os::Osx).then(|| "14.1".to_string());
    let ctx = Context::new(
        Arc::new(config),
        Arc::new(Platform::new(os, version)),
        Arc::clone(&log) as Arc<dyn Log>,
        dry_run,
        Arc::clone(&executor) as Arc<dyn Executor>,
    );
    (ctx, log, executor)
}
