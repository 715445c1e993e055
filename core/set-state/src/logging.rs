//! File logging for set-state.
//!
//! Stdout carries the confirmation line and stderr the usage errors, so
//! diagnostics go to `<root>/logs/set-state.log.<date>` instead.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE_PREFIX: &str = "set-state.log";

/// Installs the file subscriber. Returns `None` (and logs nowhere) if the log
/// directory is unusable; the guard must be held until exit to flush.
pub fn init(logs_dir: &Path) -> Option<WorkerGuard> {
    if fs_err::create_dir_all(logs_dir).is_err() {
        return None;
    }

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(office_core::logging::env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}
