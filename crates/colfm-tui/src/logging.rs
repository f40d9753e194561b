//! Logging to a file under the state directory.
//!
//! The terminal belongs to the UI while it runs, so nothing is written to
//! stdout or stderr.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{WrapErr, eyre};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::AppResult;

/// Environment variable read for the log filter.
pub const LOG_ENV: &str = "COLFM_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Filter from `level` if given, else from `COLFM_LOG`, else `warn`.
pub fn filter(level: Option<&str>) -> EnvFilter {
    let parsed = match level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_env(LOG_ENV).ok(),
    };
    parsed.unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to `path`.
///
/// Keep the returned guard alive until exit; dropping it flushes the log.
pub fn init(path: &Path, level: Option<&str>) -> AppResult<WorkerGuard> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre!("log path {} has no parent", path.display()))?;
    let file = path
        .file_name()
        .ok_or_else(|| eyre!("log path {} has no file name", path.display()))?;
    fs::create_dir_all(dir)
        .wrap_err_with(|| format!("cannot create log directory {}", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, file);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter(level)),
        )
        .try_init()
        .wrap_err("logging already initialised")?;
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_level_wins() {
        assert_eq!(filter(Some("debug")).to_string(), "debug");
        assert_eq!(
            filter(Some("colfm_core=trace")).to_string(),
            "colfm_core=trace"
        );
    }
}
