//! File-based logging bootstrap.
//!
//! The TUI owns the terminal for the whole session, so diagnostics must never
//! reach stdout or stderr. Everything goes to rolling log files inside the
//! application data directory instead.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};

const LOG_FILE_BASENAME: &str = "bookshelf";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Start the file logger under `log_dir`, honoring `RUST_LOG` when set and
/// defaulting to `info` otherwise. The returned handle flushes buffered
/// records when dropped, so the caller must keep it alive for the lifetime of
/// the process.
pub fn init(log_dir: &Path) -> Result<LoggerHandle> {
    fs::create_dir_all(log_dir).context("failed to create log directory")?;

    let handle = Logger::try_with_env_or_str("info")
        .context("invalid log level")?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .start()
        .context("failed to start logger")?;
    Ok(handle)
}
