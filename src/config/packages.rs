//! Package lists and the built-in default list.
use std::collections::HashSet;

use serde::Deserialize;

/// Command-line packages installed when no list is configured.
///
/// Kept in its historical order; several names appear twice and are
/// de-duplicated by [`default_packages`].
const DEFAULT_PACKAGES: &[&str] = &[
    "aria2",
    "atop",
    "byobu",
    "curl",
    "elinks",
    "emacs",
    "httpie",
    "iftop",
    "iptraf",
    "iptraf-ng",
    "ipcalc",
    "jq",
    "less",
    "links",
    "links2",
    "lynx",
    "most",
    "netcat",
    "nethogs",
    "netpipes",
    "nmap",
    "rsync",
    "rsyncrypto",
    "rtorrent",
    "screen",
    "siege",
    "socat",
    "squid3",
    "tmux",
    "vim",
    "vim-gtk",
    "wget",
    "ack-grep",
    "ant",
    "atop",
    "bastet",
    "binclock",
    "boxes",
    "bsdgames",
    "build-essential",
    "byobu",
    "bzr",
    "bzr-git",
    "calcurse",
    "cloc",
    "cowsay",
    "dict",
    "dstat",
    "dtach",
    "duplicity",
    "emacs",
    "figlet",
    "findutils",
    "fortune",
    "gcc",
    "gdb",
    "gist",
    "glances",
    "golang",
    "gradle",
    "greed",
    "htop",
    "irssi",
    "jq",
    "ledger",
    "less",
    "lua5.2",
    "maven",
    "maven2",
    "mc",
    "mdm",
    "mercurial",
    "mercurial-git",
    "moon-buggy",
    "mosh",
    "most",
    "mtr",
    "multitail",
    "nethack-console",
    "nethogs",
    "netpipes",
    "ninvaders",
    "octave",
    "parallel",
    "python-software-properties",
    "qemu",
    "qemu-kvm",
    "qalc",
    "r-base",
    "ranger",
    "rbenv",
    "remind",
    "ruby",
    "screen",
    "siege",
    "silversearcher-ag",
    "sl",
    "slashem",
    "socat",
    "squid3",
    "steghide",
    "stegsnow",
    "subversion",
    "sudo",
    "sysstat",
    "task",
    "toilet",
    "tpp",
    "tmux",
    "tsung",
    "ttyrec",
    "vifm",
    "vim",
    "vim-gtk",
    "weechat",
    "wyrd",
    "zsh",
];

/// The default package list, duplicates removed, first occurrence kept.
#[must_use]
pub fn default_packages() -> Vec<String> {
    dedup(DEFAULT_PACKAGES.iter().copied())
}

/// Trim names, drop blanks and repeated entries, keep first-seen order.
#[must_use]
pub fn dedup<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .filter(|n| seen.insert(*n))
        .map(String::from)
        .collect()
}

/// Package names per backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLists {
    /// Installed with `apt-get` on Debian and Ubuntu.
    pub apt: Vec<String>,
    /// Installed with `brew` on Apple systems.
    pub brew: Vec<String>,
    /// Installed with `brew cask` on Apple systems.
    pub cask: Vec<String>,
}

impl Default for PackageLists {
    fn default() -> Self {
        Self {
            apt: default_packages(),
            brew: default_packages(),
            cask: Vec::new(),
        }
    }
}

/// The `[packages]` table as written in the file.  Absent keys keep the
/// defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(super) struct PackagesSection {
    apt: Option<Vec<String>>,
    brew: Option<Vec<String>>,
    cask: Option<Vec<String>>,
}

impl PackagesSection {
    pub(super) fn resolve(self) -> PackageLists {
        let defaults = PackageLists::default();
        let pick = |given: Option<Vec<String>>, fallback: Vec<String>| {
            given.map_or(fallback, |names| dedup(names.iter().map(String::as_str)))
        };
        PackageLists {
            apt: pick(self.apt, defaults.apt),
            brew: pick(self.brew, defaults.brew),
            cask: pick(self.cask, defaults.cask),
        }
    }
}
