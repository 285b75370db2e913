//! Logging initialization using the `tracing` ecosystem.
//!
//! Provides:
//! - Console output on stderr (colored, human-readable), keeping stdout free
//!   for command output
//! - Optional file output at a fixed path via `tracing-appender`
//! - Configurable log level via env var `RUST_LOG` or explicit parameter

use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// Should be called once at program start. Calling it again is harmless: the
/// second registration is ignored.
///
/// # Parameters
///
/// - `log_level`: default level if `RUST_LOG` env var is not set (e.g. `"info"`)
/// - `log_file`: optional file path, e.g. `"bingx_api.log"` or `"/var/log/bx/api.log"`
/// - `module_name`: file name used when `log_file` names a directory
pub fn init_logging(log_level: &str, log_file: Option<&str>, module_name: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(true)
        .with_ansi(true);

    if let Some(path) = log_file {
        let (dir, file_name) = split_log_path(Path::new(path), module_name);
        let file_appender = tracing_appender::rolling::never(dir, file_name);
        let file_layer = fmt::layer()
            .with_writer(file_appender)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true);

        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init();
    } else {
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .try_init();
    }
}

/// Split a log path into `(directory, file name)` for the appender.
///
/// A path ending in a separator, or naming an existing directory, gets
/// `<module_name>.log` inside it.
fn split_log_path(path: &Path, module_name: &str) -> (String, String) {
    let is_dir = path.as_os_str().to_string_lossy().ends_with(std::path::MAIN_SEPARATOR) || path.is_dir();
    if is_dir {
        return (path.to_string_lossy().into_owned(), format!("{module_name}.log"));
    }
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_string_lossy().into_owned(),
        _ => ".".to_string(),
    };
    let file = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{module_name}.log"));
    (dir, file)
}
