use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::Path,
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::config::LoggingSettings;

// --- Formatter ---

/// Event layout for the two outputs.
///
/// Stderr gets `<LEVEL> <fields>`, colored on a terminal, so warnings sit
/// cleanly next to command output. The log file also carries a local
/// timestamp and the `file:line` of the event.
#[derive(Clone, Copy)]
struct LocalFmt {
    detailed: bool,
}

impl LocalFmt {
    const CONSOLE: Self = Self { detailed: false };
    const FILE: Self = Self { detailed: true };
}

fn level_color(level: Level) -> &'static str {
    match level {
        Level::ERROR => "\x1b[1;31m",
        Level::WARN => "\x1b[1;33m",
        Level::INFO => "\x1b[1;32m",
        Level::DEBUG => "\x1b[1;34m",
        Level::TRACE => "\x1b[1;35m",
    }
}

impl<S, N> FormatEvent<S, N> for LocalFmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let level = *meta.level();

        if self.detailed {
            write!(writer, "{} ", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))?;
        }

        if writer.has_ansi_escapes() {
            write!(writer, "{}{level:>5}\x1b[0m ", level_color(level))?;
        } else {
            write!(writer, "{level:>5} ")?;
        }

        if self.detailed {
            if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
                write!(writer, "{file}:{line} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

// --- Late-bound file writer ---

/// A MakeWriter that can be pointed at a file after initialization.
/// While no file is set, all writes are silently discarded.
#[derive(Clone, Default)]
struct FileSlot(Arc<Mutex<Option<File>>>);

impl FileSlot {
    fn lock(&self) -> MutexGuard<'_, Option<File>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct SlotWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for SlotWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match &mut *self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }
    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter(self.lock())
    }
}

static FILE_SLOT: OnceLock<FileSlot> = OnceLock::new();

/// `RUST_LOG` when set, otherwise `level`.
fn make_filter(level: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow::anyhow!("invalid log level '{level}': {e}")),
    }
}

// --- Public API ---

/// Starts appending log output to `path`, replacing any open log file.
/// The directory must already exist.
pub fn enable_file_logging(path: &Path) -> Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file '{}'", path.display()))?;

    match FILE_SLOT.get() {
        Some(slot) => {
            *slot.lock() = Some(file);
            Ok(())
        }
        None => anyhow::bail!("logging not yet initialized"),
    }
}

/// Installs the global subscriber. Call once at startup.
///
/// - Stderr: level and message, colored when attached to a terminal, off when
///   `settings.stdout` is false. Stdout is left to command output.
/// - File: adds timestamps and source locations; opened when
///   `settings.file` is set.
/// - Level: `RUST_LOG` if set, else `settings.level`.
pub fn init_logging(settings: &LoggingSettings) -> Result<()> {
    let filter = make_filter(&settings.level)?;
    let file_slot = FILE_SLOT.get_or_init(FileSlot::default).clone();

    let stderr_layer = settings.stdout.then(|| {
        tracing_subscriber::fmt::layer()
            .event_format(LocalFmt::CONSOLE)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalFmt::FILE)
        .with_ansi(false)
        .with_writer(file_slot);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")?;

    if let Some(path) = &settings.file {
        enable_file_logging(path)?;
    }
    Ok(())
}
