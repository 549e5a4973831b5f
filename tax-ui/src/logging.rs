//! Process-wide `tracing` setup for the calculator binary.
//!
//! Records go to stderr, so stdout carries only results, and optionally to a
//! log file opened after startup. The level filter can be swapped at runtime
//! through [`set_log_level`].

use std::fmt;
use std::fs::File;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::{FmtContext, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, reload};

const DIM: &str = "2";
const CYAN: &str = "36";

static LEVEL_HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();
static LOG_FILE: OnceLock<LogFile> = OnceLock::new();

/// `<local time> <LEVEL> <target> <fields>`, colored when the writer allows.
struct LocalTimeFormat;

fn level_color(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "1;31",
        Level::WARN => "1;33",
        Level::INFO => "1;32",
        Level::DEBUG => "1;34",
        Level::TRACE => "1;35",
    }
}

fn paint(
    writer: &mut Writer<'_>,
    color: &str,
    text: impl fmt::Display,
) -> fmt::Result {
    if writer.has_ansi_escapes() {
        write!(writer, "\x1b[{color}m{text}\x1b[0m ")
    } else {
        write!(writer, "{text} ")
    }
}

impl<S, N> FormatEvent<S, N> for LocalTimeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        let now = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");

        paint(&mut writer, DIM, now)?;
        paint(&mut writer, level_color(meta.level()), format_args!("{:>5}", meta.level()))?;
        paint(&mut writer, CYAN, meta.target())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Log file that can be opened after the subscriber is installed.
/// Writes are dropped while it is empty.
#[derive(Clone, Default)]
struct LogFile(Arc<Mutex<Option<File>>>);

impl LogFile {
    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct LogFileWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for LogFileWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        self.0.as_mut().map_or(Ok(buf.len()), |file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.as_mut().map_or(Ok(()), File::flush)
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFileWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LogFileWriter(self.lock())
    }
}

/// `RUST_LOG` wins; then `default_level`; then plain `info`.
fn initial_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Replaces the active filter. Takes a bare level such as `debug` or a full
/// `EnvFilter` directive.
pub fn set_log_level(level: &str) -> Result<()> {
    let handle = LEVEL_HANDLE
        .get()
        .ok_or_else(|| anyhow!("logging not yet initialized"))?;
    let filter =
        EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))?;
    handle.reload(filter).context("filter reload failed")
}

/// Appends log output to `path` in addition to stderr, replacing any file
/// opened earlier. The parent directory must exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let Some(log_file) = LOG_FILE.get() else {
        bail!("logging not yet initialized");
    };
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;
    *log_file.lock() = Some(file);
    Ok(())
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init_logging(default_level: &str) {
    let log_file = LOG_FILE.get_or_init(LogFile::default).clone();
    let (filter, handle) = reload::Layer::new(initial_filter(default_level));

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LocalTimeFormat)
                .with_ansi(io::stderr().is_terminal())
                .with_writer(io::stderr),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(LocalTimeFormat)
                .with_ansi(false)
                .with_writer(log_file),
        )
        .try_init();

    if installed.is_ok() {
        let _ = LEVEL_HANDLE.set(handle);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn level_change_before_init_is_an_error() {
        if LEVEL_HANDLE.get().is_none() {
            assert!(set_log_level("debug").is_err());
        }
    }

    #[test]
    fn empty_log_file_discards_writes() {
        let log_file = LogFile::default();
        let mut writer = log_file.make_writer();

        assert_eq!(writer.write(b"dropped").unwrap(), 7);
        writer.flush().unwrap();
    }

    #[test]
    fn open_log_file_receives_writes() {
        let path = std::env::temp_dir().join(format!("tax-ui-log-{}.log", std::process::id()));
        let log_file = LogFile::default();
        *log_file.lock() = Some(File::create(&path).unwrap());

        log_file.make_writer().write_all(b"kept\n").unwrap();
        *log_file.lock() = None;

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "kept\n");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn each_level_has_its_own_color() {
        let colors = [
            Level::ERROR,
            Level::WARN,
            Level::INFO,
            Level::DEBUG,
            Level::TRACE,
        ]
        .map(|level| level_color(&level));

        assert_eq!(colors, ["1;31", "1;33", "1;32", "1;34", "1;35"]);
    }

    #[test]
    fn bad_default_level_still_builds_a_filter() {
        // RUST_LOG may be set in the environment, so only construction is checked.
        let _ = initial_filter("not a [valid directive");
    }
}
