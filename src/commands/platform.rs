//! Command: show the detected platform.
use anyhow::Result;

use crate::cli::PlatformOpts;
use crate::platform::Platform;

/// Render `platform` as text or pretty JSON.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(platform: &Platform, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(platform)?);
    }
    Ok(format!(
        "os: {}\nversion: {}\napple: {}\ndebian family: {}",
        platform.os,
        platform.version.as_deref().unwrap_or("-"),
        platform.is_apple_system(None),
        platform.is_debian_family()
    ))
}

/// Print the process-wide platform to stdout.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(opts: &PlatformOpts) -> Result<()> {
    println!("{}", render(Platform::current(), opts.json)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::platform::Os;

    #[test]
    fn text_output() {
        let p = Platform::new(Os::Osx, Some("10.15.7".to_string()));
        insta::assert_snapshot!(render(&p, false).unwrap(), @r"
        os: osx
        version: 10.15.7
        apple: true
        debian family: false
        ");
    }

    #[test]
    fn text_output_without_version() {
        let p = Platform::new(Os::Ubuntu, None);
        let out = render(&p, false).unwrap();
        assert!(out.contains("version: -"));
        assert!(out.contains("debian family: true"));
    }

    #[test]
    fn json_output() {
        let p = Platform::new(Os::Debian, None);
        let value: serde_json::Value = serde_json::from_str(&render(&p, true).unwrap()).unwrap();
        assert_eq!(value["os"], "debian");
        assert!(value["version"].is_null());
    }
}
