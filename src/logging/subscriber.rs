//! Tracing subscriber: console formatter, persistent file layer and
//! initialisation.
use std::fmt::Debug;
use std::fs::{self, File};
use std::io::Write as _;
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::types::{DRY_RUN_TARGET, STAGE_TARGET};
use super::utils::{log_file_path, paint, strip_ansi, utc_now};

/// How an event is rendered, derived from its level and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    DryRun,
    Error,
    Warn,
    Info,
    Debug,
}

impl Kind {
    fn of(metadata: &Metadata<'_>) -> Self {
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, STAGE_TARGET) => Self::Stage,
            (Level::INFO, DRY_RUN_TARGET) => Self::DryRun,
            (Level::INFO, _) => Self::Info,
            _ => Self::Debug,
        }
    }

    fn console(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("{} {}", paint("1;34", "==>"), paint("1", msg)),
            Self::DryRun => format!("  {} {msg}", paint("33", "[DRY RUN]")),
            Self::Error => format!("{} {msg}", paint("31", "ERROR")),
            Self::Warn => format!("{}  {msg}", paint("33", "WARN")),
            Self::Info => format!("  {msg}"),
            Self::Debug => format!("  {}", paint("2", msg)),
        }
    }

    fn file(self, msg: &str) -> String {
        let tag = match self {
            Self::Stage => return format!("==> {msg}"),
            Self::Info => return format!("    {msg}"),
            Self::DryRun => "dry run",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Debug => "debug",
        };
        format!("    [{tag}] {msg}")
    }
}

/// Pulls the `message` field out of an event.
#[derive(Default)]
struct Message(String);

impl Message {
    fn of(event: &Event<'_>) -> String {
        let mut visitor = Self::default();
        event.record(&mut visitor);
        visitor.0
    }
}

impl Visit for Message {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.0);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// Appends every event at `DEBUG` and above to the per-command log file,
/// timestamped and without colour.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<File>,
}

impl FileLayer {
    /// Truncate the log file for `command`, write a run header and open it
    /// for appending.  `None` if the cache directory is unusable.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let rule = "=".repeat(42);
        let header = format!(
            "{rule}\ngenes {} {command} {}\n{rule}\n",
            crate::commands::version::version(),
            utc_now("%Y-%m-%d %H:%M:%S"),
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: Subscriber> Layer<S> for FileLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let kind = Kind::of(event.metadata());
        let line = kind.file(&strip_ansi(&Message::of(event)));
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "[{}] {line}", utc_now("%H:%M:%S")).ok();
        }
    }
}

/// Console event format: coloured level prefixes, no timestamps.
struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let kind = Kind::of(event.metadata());
        writeln!(writer, "{}", kind.console(&Message::of(event)))
    }
}

/// Install the global subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout.  All events,
/// including `debug`, are also written to
/// `$XDG_CACHE_HOME/genes/<command>.log`.  `RUST_LOG` overrides the console
/// level when set.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let console_filter = EnvFilter::builder()
        .with_default_directive(console_level.into())
        .from_env_lossy();

    let console = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(
            std::io::stderr
                .with_max_level(Level::WARN)
                .or_else(std::io::stdout),
        )
        .with_filter(console_filter);

    let file = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();
}
