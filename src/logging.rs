use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use time::macros::format_description;
use time::UtcOffset;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{self, fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

const LOG_RETENTION_DAYS: u64 = 7;

/// Get the log directory: the configured one, or the user-specific OS cache directory
/// - Linux: ~/.cache/phel-language-tools/
/// - macOS: ~/Library/Caches/phel-language-tools/
/// - Windows: %LOCALAPPDATA%\phel-language-tools\
fn get_log_dir(config: &LoggingConfig) -> io::Result<PathBuf> {
    let log_dir = match config.log_dir {
        Some(ref dir) => dir.clone(),
        None => {
            let cache_dir = dirs::cache_dir().ok_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "Unable to determine user cache directory")
            })?;
            cache_dir.join("phel-language-tools")
        }
    };

    if !log_dir.exists() {
        fs::create_dir_all(&log_dir)?;
    }

    Ok(log_dir)
}

fn is_session_log(name: &str) -> bool {
    name.starts_with("session-") && name.ends_with(".log")
}

/// Remove session logs older than `retention`; returns how many were removed
fn cleanup_old_logs(log_dir: &Path, retention: Duration) -> io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(log_dir)?.flatten() {
        let Ok(metadata) = entry.metadata() else {
            continue;
        };
        if !metadata.is_file() || !entry.file_name().to_str().is_some_and(is_session_log) {
            continue;
        }
        let expired = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age > retention);
        if !expired {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => eprintln!("Failed to remove old log file {:?}: {}", entry.path(), e),
        }
    }

    Ok(removed)
}

fn session_log_name() -> io::Result<String> {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(format_description!("[year][month][day]-[hour][minute][second]"))
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    Ok(format!("session-{}-{}.log", timestamp, std::process::id()))
}

fn stderr_filter(config: &LoggingConfig) -> EnvFilter {
    match config.level {
        Some(ref level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    }
}

/// Initialize logger with stderr and optional file output
///
/// Returns a WorkerGuard that must be kept alive for the duration of the
/// program so buffered file logs are flushed.
///
/// # Logging Behavior
/// - **Stderr**: configured level, else `RUST_LOG`, else "info"
/// - **Session File**: if enabled, DEBUG level, one file per process with
///   files older than seven days removed on startup
///
/// A subscriber that is already installed (tests, embedding hosts) is not an
/// error.
pub fn init_logger(config: &LoggingConfig) -> io::Result<WorkerGuard> {
    let timer = fmt::time::OffsetTime::new(
        UtcOffset::UTC,
        format_description!("[[[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z]"),
    );

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(timer.clone())
        .with_ansi(!config.no_color)
        .with_filter(stderr_filter(config));

    let (result, guard) = if config.file_logging {
        let log_dir = get_log_dir(config)?;
        cleanup_old_logs(&log_dir, Duration::from_secs(LOG_RETENTION_DAYS * 24 * 60 * 60))?;

        let log_path = log_dir.join(session_log_name()?);
        let file = fs::OpenOptions::new().create(true).append(true).open(&log_path)?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let file_layer = fmt::layer()
            .with_writer(non_blocking)
            .with_timer(timer)
            .with_ansi(false)
            .with_filter(EnvFilter::new("debug"));

        eprintln!("Logging to file: {:?}", log_path);
        let result = tracing_subscriber::registry()
            .with(stderr_layer)
            .with(file_layer)
            .try_init();
        (result, guard)
    } else {
        let (_, guard) = tracing_appender::non_blocking(io::sink());
        let result = tracing_subscriber::registry().with(stderr_layer).try_init();
        (result, guard)
    };

    match result {
        Ok(()) => Ok(guard),
        Err(e) if e.to_string().contains("already been set") || e.to_string().contains("SetLoggerError") => {
            Ok(guard)
        }
        Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
    }
}
