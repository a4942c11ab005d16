//! Domain-specific error types for the provisioning toolkit.
//!
//! Internal modules return typed errors (e.g., [`GateError`], [`ConfigError`])
//! while command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! GenesError
//! ├── Gate(GateError)         : a guarded call whose preconditions failed
//! ├── Config(ConfigError)     : TOML parsing, config file I/O
//! ├── Resource(ResourceError) : packages, user accounts
//! └── Platform(PlatformError) : OS detection and unsupported operations
//! ```

use thiserror::Error;

/// Top-level error type for the toolkit.
#[derive(Error, Debug)]
pub enum GenesError {
    /// A gate refused to run its wrapped function.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Configuration-related error (parsing, I/O).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Resource operation error (package install, user account).
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// Platform-specific operation error.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Errors produced by [`crate::gate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    /// The gate's combinator evaluated false under the `Raise` policy.
    ///
    /// Carries the same formatted message that was logged at error level.
    #[error("{0}")]
    PreconditionNotMet(String),
}

/// Errors that arise from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML file could not be parsed.
    #[error("Invalid TOML in {file}: {message}")]
    InvalidSyntax {
        /// Path of the offending file.
        file: String,
        /// Parser diagnostic.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from resource operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A directory-service call failed.
    #[error("Directory service error for user '{user}': {reason}")]
    DirectoryService {
        /// Account name the operation targeted.
        user: String,
        /// Human-readable reason.
        reason: String,
    },

    /// A package manager could not be started.
    #[error("Package manager '{program}' could not be started")]
    PackageManager {
        /// Program that failed to spawn.
        program: String,
        /// Underlying error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors that arise from platform-specific operations.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The requested operation is not supported on the current platform.
    #[error("Operation not supported on {platform}")]
    Unsupported {
        /// Platform tag (e.g., `"debian"`).
        platform: String,
    },

    /// Platform detection failed.
    #[error("Platform detection failed: {0}")]
    DetectionFailed(String),
}
