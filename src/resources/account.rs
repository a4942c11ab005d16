//! Local user accounts.
//!
//! Only account creation on Apple systems is wired up, through the `dscl`
//! directory service client.  Debian and Ubuntu have no backend yet and
//! report every operation as skipped.
use std::fmt;
use std::sync::Arc;

use super::ResourceChange;
use crate::error::{GenesError, PlatformError, ResourceError};
use crate::exec::Executor;
use crate::platform::{Os, Platform};

/// Client for the OS directory service that owns user records.
#[cfg_attr(test, mockall::automock)]
pub trait DirectoryService: Send + Sync {
    /// Create a user record named `username`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::DirectoryService`] if the record cannot be
    /// created.
    fn create(&self, username: &str) -> Result<(), ResourceError>;
}

/// [`DirectoryService`] backed by macOS `dscl`.
#[derive(Debug, Clone)]
pub struct Dscl {
    executor: Arc<dyn Executor>,
}

impl Dscl {
    /// Client issuing `dscl` commands through `executor`.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }
}

impl DirectoryService for Dscl {
    fn create(&self, username: &str) -> Result<(), ResourceError> {
        let record = format!("/Users/{username}");
        self.executor
            .run("dscl", &[".", "-create", &record])
            .map(|_| ())
            .map_err(|e| ResourceError::DirectoryService {
                user: username.to_string(),
                reason: format!("{e:#}"),
            })
    }
}

/// A user account on the local machine.
pub struct UserAccount {
    os: Os,
    username: Option<String>,
    groups: Vec<String>,
    directory: Option<Box<dyn DirectoryService>>,
}

impl fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserAccount")
            .field("os", &self.os)
            .field("username", &self.username)
            .field("groups", &self.groups)
            .field(
                "directory",
                &self.directory.as_ref().map(|_| "<dyn DirectoryService>"),
            )
            .finish()
    }
}

impl UserAccount {
    /// Create an account description for `os` with no directory service
    /// bound.
    #[must_use]
    pub const fn new(os: Os, username: Option<String>) -> Self {
        Self {
            os,
            username,
            groups: Vec::new(),
            directory: None,
        }
    }

    /// Create an account for `platform`, binding `dscl` on Apple systems.
    #[must_use]
    pub fn for_platform(
        platform: &Platform,
        username: Option<String>,
        executor: Arc<dyn Executor>,
    ) -> Self {
        let account = Self::new(platform.os, username);
        if platform.os == Os::Osx {
            account.with_directory(Box::new(Dscl::new(executor)))
        } else {
            account
        }
    }

    /// Use `directory` for account creation.
    #[must_use]
    pub fn with_directory(mut self, directory: Box<dyn DirectoryService>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Groups the account should join.
    #[must_use]
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    /// Account name, if set.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Requested group memberships.
    #[must_use]
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Whether the account already exists.
    ///
    /// No backend answers this yet, so it is always `false` and
    /// [`install`](Self::install) always asks the directory service to
    /// create the record.
    #[must_use]
    pub const fn is_installed(&self) -> bool {
        false
    }

    /// Whether a user name has been set.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.username.is_some()
    }

    /// Whether [`install`](Self::install) would ask the directory service to
    /// create a record.  Dry runs use this to preview only real actions.
    #[must_use]
    pub fn would_create(&self) -> bool {
        self.os == Os::Osx && self.username.is_some() && !self.is_installed()
    }

    /// Create the account.
    ///
    /// # Errors
    ///
    /// Returns [`GenesError::Resource`] if the directory service rejects the
    /// record, or [`GenesError::Platform`] on an Apple system with no
    /// directory service bound.
    pub fn install(&self) -> Result<ResourceChange, GenesError> {
        let Some(username) = self.username.as_deref() else {
            return Ok(ResourceChange::skipped("no user name configured"));
        };

        match self.os {
            Os::Osx => {
                // Unreachable until a backend answers `is_installed`.
                if self.is_installed() {
                    return Ok(ResourceChange::AlreadyCorrect);
                }
                let directory = self.directory.as_ref().ok_or_else(|| {
                    PlatformError::Unsupported {
                        platform: self.os.to_string(),
                    }
                })?;
                directory.create(username)?;
                Ok(ResourceChange::Applied)
            }
            Os::Debian | Os::Ubuntu => Ok(ResourceChange::skipped(format!(
                "account creation is not implemented on {}",
                self.os
            ))),
            Os::Linux | Os::Windows | Os::Unknown => Ok(ResourceChange::skipped(format!(
                "no directory service on {}",
                self.os
            ))),
        }
    }

    /// Remove the account.  Not implemented on any platform.
    ///
    /// # Errors
    ///
    /// Never fails today; returns a [`Result`] so that backends can.
    pub fn uninstall(&self) -> Result<ResourceChange, GenesError> {
        Ok(ResourceChange::skipped("account removal is not implemented"))
    }

    /// Apply account settings such as group membership.  Not implemented
    /// on any platform.
    ///
    /// # Errors
    ///
    /// Never fails today; returns a [`Result`] so that backends can.
    pub fn configure(&self, username: &str, groups: &[String]) -> Result<ResourceChange, GenesError> {
        tracing::debug!("configure {username} (groups: {})", groups.join(","));
        Ok(ResourceChange::skipped(
            "account configuration is not implemented",
        ))
    }
}
