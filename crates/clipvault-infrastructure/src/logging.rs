//! Tracing subscriber setup shared by the clipvault binaries.

use std::path::Path;

use clipvault_core::config::LogConfig;
use clipvault_core::error::{ClipvaultError, Result};
pub use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const LOG_FILE_PREFIX: &str = "clipvault.log";

/// Builds the filter: `RUST_LOG` when set, otherwise `default_level`.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Installs the global subscriber.
///
/// Logs go to stderr and, when `config.file` is set and `log_dir` is given,
/// to a daily rolling file `clipvault.log.YYYY-MM-DD`. The returned guard
/// must be kept alive for the file writer to flush. Calling this twice keeps
/// the first subscriber.
pub fn init_tracing(config: &LogConfig, log_dir: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let (file_layer, guard) = match log_dir {
        Some(dir) if config.file => {
            std::fs::create_dir_all(dir).map_err(|e| {
                ClipvaultError::io(format!("Failed to create log dir {}: {}", dir.display(), e))
            })?;
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        _ => (None, None),
    };

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let installed = tracing_subscriber::registry()
        .with(env_filter(&config.level))
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    if installed.is_err() {
        tracing::debug!("global tracing subscriber already installed");
    }

    Ok(guard)
}
