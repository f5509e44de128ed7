//! Tracing setup.
//!
//! stderr always receives events filtered by `RUST_LOG` (default `warn`).
//! With `CHARON_LOG=1` a second, non-blocking layer also appends to
//! `charon.log` in the user log directory and the default level rises to
//! `info`.

use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "CHARON_LOG";
const LOG_FILE: &str = "charon.log";

/// Keeps the file writer's worker alive. Hold it until `main` returns.
pub struct LogGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

pub fn init() -> LogGuard {
    let to_file = file_logging_requested(std::env::var(LOG_ENV).ok().as_deref());
    let default_level = if to_file { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (file_layer, guard) = if to_file {
        let dir = log_dir().unwrap_or_else(std::env::temp_dir);
        let _ = std::fs::create_dir_all(&dir);
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE));
        (
            Some(fmt::layer().with_writer(writer).with_ansi(false)),
            Some(guard),
        )
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    LogGuard { _file_guard: guard }
}

fn file_logging_requested(value: Option<&str>) -> bool {
    value.map(str::trim) == Some("1")
}

fn log_dir() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_DATA_HOME") {
        Some(xdg) => PathBuf::from(xdg),
        None => {
            let home = PathBuf::from(std::env::var_os("HOME")?);
            if cfg!(target_os = "macos") {
                home.join("Library").join("Logs")
            } else {
                home.join(".local").join("share")
            }
        }
    };
    Some(base.join("charon"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_enables_file_logging() {
        assert!(file_logging_requested(Some("1")));
        assert!(file_logging_requested(Some(" 1\n")));
        assert!(!file_logging_requested(Some("0")));
        assert!(!file_logging_requested(Some("true")));
        assert!(!file_logging_requested(None));
    }

    #[test]
    fn log_dir_ends_in_app_name() {
        if let Some(dir) = log_dir() {
            assert!(dir.ends_with("charon"));
        }
    }
}
