//! Operating system detection.
//!
//! Detection runs once per process; [`Platform::current`] returns the same
//! value for the rest of the run.
use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use crate::error::PlatformError;
use crate::exec::{Executor, SystemExecutor};
use crate::gate::{GatePolicy, Guard, Predicate, if_any_funcs};

/// Detected operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// Apple macOS / OS X.
    Osx,
    /// Debian.
    Debian,
    /// Ubuntu.
    Ubuntu,
    /// Any other Linux distribution.
    Linux,
    /// Microsoft Windows.
    Windows,
    /// Anything else.
    Unknown,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Osx => write!(f, "osx"),
            Self::Debian => write!(f, "debian"),
            Self::Ubuntu => write!(f, "ubuntu"),
            Self::Linux => write!(f, "linux"),
            Self::Windows => write!(f, "windows"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Platform {
    /// Operating system family.
    pub os: Os,
    /// Apple OS version (e.g. `"10.15.7"`); `None` on other systems.
    pub version: Option<String>,
}

static CURRENT: OnceLock<Platform> = OnceLock::new();

impl Platform {
    /// Create a platform with explicit values.
    #[must_use]
    pub const fn new(os: Os, version: Option<String>) -> Self {
        Self { os, version }
    }

    /// The process-wide platform, detected on first use.
    ///
    /// Call once at startup so that detection happens eagerly.
    #[must_use]
    pub fn current() -> &'static Self {
        CURRENT.get_or_init(|| Self::detect(&SystemExecutor))
    }

    /// Probe the running system.
    #[must_use]
    pub fn detect(executor: &dyn Executor) -> Self {
        if cfg!(target_os = "macos") {
            Self {
                os: Os::Osx,
                version: mac_version(executor),
            }
        } else if cfg!(target_os = "windows") {
            Self::new(Os::Windows, None)
        } else if cfg!(target_os = "linux") {
            let os = read_os_release().map_or_else(
                |e| {
                    tracing::debug!("{e}");
                    Os::Linux
                },
                |content| linux_family(&content),
            );
            Self::new(os, None)
        } else {
            Self::new(Os::Unknown, None)
        }
    }

    /// `true` on Apple systems whose version is in `versions`.
    ///
    /// `None` or an empty list accepts any version.
    #[must_use]
    pub fn is_apple_system(&self, versions: Option<&[&str]>) -> bool {
        let filter = versions.filter(|v| !v.is_empty());
        let version_ok = filter.is_none_or(|allowed| {
            self.version
                .as_deref()
                .is_some_and(|v| allowed.contains(&v))
        });
        self.os == Os::Osx && version_ok
    }

    /// `true` on Debian.
    #[must_use]
    pub fn is_debian(&self) -> bool {
        self.os == Os::Debian
    }

    /// `true` on Ubuntu.
    #[must_use]
    pub fn is_ubuntu(&self) -> bool {
        self.os == Os::Ubuntu
    }

    /// `true` on systems managed by `apt`.
    #[must_use]
    pub fn is_debian_family(&self) -> bool {
        self.is_debian() || self.is_ubuntu()
    }
}

/// OS family tag of the running system (`"osx"`, `"debian"`, ...).
#[must_use]
pub fn get_os() -> String {
    Platform::current().os.to_string()
}

/// `true` when running on an Apple system, optionally restricted to
/// `versions`.
#[must_use]
pub fn is_osx(versions: Option<&[&str]>) -> bool {
    Platform::current().is_apple_system(versions)
}

/// Guard that admits a call only on Apple systems, optionally restricted to
/// the given OS versions.
#[must_use]
pub fn only_osx(versions: Option<Vec<String>>, policy: GatePolicy) -> Guard {
    let check = Predicate::new("is_osx", move || {
        let allowed: Option<Vec<&str>> = versions
            .as_ref()
            .map(|v| v.iter().map(String::as_str).collect());
        is_osx(allowed.as_deref())
    });
    if_any_funcs(vec![check], policy)
}

/// Ask `sw_vers` for the macOS product version.
fn mac_version(executor: &dyn Executor) -> Option<String> {
    executor
        .run("sw_vers", &["-productVersion"])
        .ok()
        .map(|r| r.stdout.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_os_release() -> Result<String, PlatformError> {
    std::fs::read_to_string("/etc/os-release")
        .or_else(|_| std::fs::read_to_string("/usr/lib/os-release"))
        .map_err(|e| PlatformError::DetectionFailed(format!("cannot read os-release: {e}")))
}

/// Map the contents of an `os-release` file to an [`Os`].
///
/// `ID` wins over `ID_LIKE`, so derivatives of Ubuntu (which list
/// `ID_LIKE="ubuntu debian"`) are treated as Ubuntu.
#[must_use]
pub fn linux_family(os_release: &str) -> Os {
    let mut id = None;
    let mut id_like = Vec::new();
    for line in os_release.lines() {
        let Some((key, value)) = line.trim().split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').trim_matches('\'');
        match key.trim() {
            "ID" => id = Some(value.to_lowercase()),
            "ID_LIKE" => id_like = value.split_whitespace().map(str::to_lowercase).collect(),
            _ => {}
        }
    }

    let classify = |name: &str| match name {
        "debian" => Some(Os::Debian),
        "ubuntu" => Some(Os::Ubuntu),
        _ => None,
    };

    id.as_deref()
        .and_then(classify)
        .or_else(|| id_like.iter().find_map(|n| classify(n)))
        .unwrap_or(Os::Linux)
}
