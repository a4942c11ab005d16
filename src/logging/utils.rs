//! Log file location, escape stripping and timestamps.
use std::path::PathBuf;

/// Remove ANSI CSI sequences (`ESC [ ... final`) and lone escapes.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
        } else if chars.next() == Some('[') {
            // Parameters and intermediates run until a byte in `@`..=`~`.
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        }
    }
    out
}

/// Colour `text` with SGR parameters `sgr`.
pub(super) fn paint(sgr: &str, text: &str) -> String {
    format!("\x1b[{sgr}m{text}\x1b[0m")
}

/// `$XDG_CACHE_HOME/genes`, falling back to `$HOME/.cache/genes`.  Created
/// on first use.
fn cache_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".cache")))?;
    let dir = base.join("genes");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Persistent log file for `command`, e.g. `~/.cache/genes/install.log`.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    cache_dir().map(|d| d.join(format!("{command}.log")))
}

/// Current UTC time rendered with a `chrono` format string.
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}
