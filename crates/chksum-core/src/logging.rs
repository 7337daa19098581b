//! Logging init: file under XDG state dir, or graceful fallback to stderr.
//! Stdout is left alone; it carries the command output.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Filter for the log file when `RUST_LOG` is unset.
const FILE_FILTER: &str = "info,chksum_core=debug";
/// Filter for the stderr fallback; stderr is shared with error lines.
const STDERR_FILTER: &str = "warn";

/// Where one log event ends up. A handle that cannot be cloned degrades to stderr.
enum LogSink {
    File(File),
    Stderr,
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::File(f) => f.write(buf),
            LogSink::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::File(f) => f.flush(),
            LogSink::Stderr => io::stderr().lock().flush(),
        }
    }
}

/// The open log file, handing out one cloned handle per event.
struct LogFile(File);

impl LogFile {
    fn open(path: &Path) -> Result<Self> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("create log dir {}", dir.display()))?;
        }
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open log file {}", path.display()))?;
        Ok(LogFile(file))
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        match self.0.try_clone() {
            Ok(f) => LogSink::File(f),
            Err(_) => LogSink::Stderr,
        }
    }
}

/// Path of the log file, `~/.local/state/chksum/chksum.log`.
pub fn log_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("chksum")?;
    Ok(xdg_dirs.get_state_home().join("chksum.log"))
}

/// Initialize structured logging to the XDG state log file.
/// Returns Err when the log file cannot be opened so the caller can use [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let path = log_file_path()?;
    let sink = LogFile::open(&path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(FILE_FILTER))
        .with_writer(sink)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("init tracing subscriber: {}", e))?;

    tracing::info!(log = %path.display(), "chksum logging initialized");
    Ok(())
}

/// Log to stderr only. Warnings and errors are shown unless `RUST_LOG` says otherwise.
pub fn init_logging_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(STDERR_FILTER))
        .with_writer(io::stderr)
        .with_ansi(false)
        .try_init();
}

/// `RUST_LOG` when set and valid, `default` otherwise.
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}
