use std::fs;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::Error;

/// Send tracing output to `path`; the terminal belongs to the TUI.
///
/// `RUST_LOG` wins over `default_filter`. Keep the returned guard alive until
/// exit or buffered lines are lost.
pub fn init(path: &Path, default_filter: &str) -> Result<WorkerGuard, Error> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)
        .map_err(|e| Error::Logging(format!("cannot create {}: {}", dir.display(), e)))?;

    let file_name = path
        .file_name()
        .ok_or_else(|| Error::Logging(format!("{} is not a file path", path.display())))?;
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    Ok(guard)
}
