//! Resource primitives driven by the install tasks.
pub mod account;
pub mod package;

use anyhow::Result;

/// A resource that can be described and applied.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied, for example when
    /// an external program cannot be started.
    fn apply(&self) -> Result<ResourceChange>;
}

/// Result of applying a resource change.
///
/// # Examples
///
/// ```
/// use genes_cli::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let skipped = ResourceChange::Skipped { reason: "no packages".into() };
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, skipped);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was skipped (e.g., nothing to do on this platform).
    Skipped {
        /// Reason why the resource was skipped.
        reason: String,
    },
}

impl ResourceChange {
    /// Build a [`ResourceChange::Skipped`] with `reason`.
    #[must_use]
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }
}
