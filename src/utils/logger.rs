//! Logging initialization.
//!
//! Logs go to a file in `logs/` next to the executable so they don't draw
//! over the TUI. Every run gets its own file, e.g.
//! `logs/pack3r-tui.2024-12-06-14-30-25.log`.
//!
//! The level is taken from `RUST_LOG` and defaults to `info`; `RUST_LOG=debug`
//! also logs every stale process event and unterminated output line.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn log_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("logs")))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Installs the file logger.
///
/// Returns the writer guard, which must be held until exit so buffered
/// lines get flushed. `None` if the log file could not be created; the app
/// then runs without logging.
pub fn init_logging() -> Option<WorkerGuard> {
    let log_dir = log_dir();
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Failed to create logs directory: {}", e);
        return None;
    }

    let timestamp = Local::now().format("%Y-%m-%d-%H-%M-%S");
    let log_path = log_dir.join(format!("pack3r-tui.{}.log", timestamp));

    let log_file = match fs::File::create(&log_path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Warning: Failed to create log file: {}", e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized - writing to {}", log_path.display());
    Some(guard)
}
