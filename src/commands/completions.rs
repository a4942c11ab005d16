//! Command: generate shell completions.
use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;

/// Write the completion script for `shell` to `out`.
pub fn write(shell: Shell, out: &mut dyn Write) {
    clap_complete::generate(shell, &mut Cli::command(), "genes", out);
}

/// Print the completion script for `shell` to stdout.
pub fn run(shell: Shell) {
    write(shell, &mut std::io::stdout());
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_mentions_subcommands() {
        let mut buf = Vec::new();
        write(Shell::Bash, &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("genes"));
        assert!(script.contains("install"));
        assert!(script.contains("platform"));
    }
}
