use std::sync::Arc;

use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::Platform;

/// Shared context for task execution.
#[derive(Clone)]
pub struct Context {
    /// Loaded configuration.
    pub config: Arc<Config>,
    /// Detected platform information.
    pub platform: Arc<Platform>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("platform", &self.platform)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("executor", &self.executor)
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        platform: Arc<Platform>,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
    ) -> Self {
        Self {
            config,
            platform,
            log,
            dry_run,
            executor,
        }
    }
}
