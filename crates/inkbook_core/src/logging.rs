//! Logging bootstrap for the notebook core.
//!
//! # Responsibility
//! - Start the rolling file logger exactly once per process.
//! - Emit the startup event the diagnostics overlay keys on.
//!
//! # Invariants
//! - Re-initialization with the same directory is a no-op; a different
//!   directory is rejected instead of silently rebinding the log target.
//! - Initialization never panics; failures come back as readable strings.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};

const LOG_BASENAME: &str = "inkbook";
const ROTATE_AT_BYTES: u64 = 5 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 3;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

/// Default level spec by build mode: `debug` for debug builds, `info`
/// otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Starts file logging under `log_dir` at `level`.
///
/// Idempotent for the same directory; calling again with a different one is
/// an error so log output cannot silently move mid-session.
///
/// # Errors
/// - The directory cannot be created.
/// - The level spec is not understood by the logger backend.
/// - Logging is already active in a different directory.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), String> {
    let wanted = log_dir.to_path_buf();

    let active = ACTIVE.get_or_try_init(|| -> Result<ActiveLogger, String> {
        std::fs::create_dir_all(&wanted)
            .map_err(|err| format!("cannot create log directory `{}`: {err}", wanted.display()))?;

        let handle = Logger::try_with_str(level)
            .map_err(|err| format!("bad log level `{level}`: {err}"))?
            .log_to_file(
                FileSpec::default()
                    .directory(wanted.as_path())
                    .basename(LOG_BASENAME),
            )
            .rotate(
                Criterion::Size(ROTATE_AT_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(KEEP_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .map_err(|err| format!("logger start failed: {err}"))?;

        info!(
            "event=app_start module=core status=ok version={} level={level}",
            env!("CARGO_PKG_VERSION")
        );

        Ok(ActiveLogger {
            log_dir: wanted.clone(),
            _handle: handle,
        })
    })?;

    if active.log_dir != wanted {
        return Err(format!(
            "logging already writes to `{}`; refusing `{}`",
            active.log_dir.display(),
            wanted.display()
        ));
    }
    Ok(())
}

/// Directory the active logger writes to, if logging was initialized.
pub fn active_log_dir() -> Option<PathBuf> {
    ACTIVE.get().map(|active| active.log_dir.clone())
}
