use std::path::Path;

use anyhow::Context;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::JsonFields;
use tracing_subscriber::prelude::*;

use crate::config;

/// Installs the global subscriber: JSON lines into the log file, filtered by `RUST_LOG`.
///
/// stdout carries the protocol, so nothing is ever written there.
pub fn init() -> anyhow::Result<()> {
    let log_path = config::log_path();
    let appender = file_appender(&log_path).inspect_err(|e| {
        eprintln!("Failed to open log file {:?}: {:#}", log_path, e);
    })?;

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(appender)
        .fmt_fields(JsonFields::default());

    // Use RUST_LOG if set, otherwise default to INFO
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    Ok(())
}

/// Opens a non-rotating appender for `log_path`, creating its directory first.
fn file_appender(log_path: &Path) -> anyhow::Result<RollingFileAppender> {
    let dir = log_path
        .parent()
        .context("log path has no parent directory")?;
    let file_name = log_path
        .file_name()
        .context("log path has no file name")?;

    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {:?}", dir))?;

    Ok(tracing_appender::rolling::never(dir, file_name))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn file_appender_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("nested/dir/server.log");

        let mut appender = file_appender(&log_path).unwrap();
        appender.write_all(b"hello\n").unwrap();
        appender.flush().unwrap();

        assert_eq!(std::fs::read_to_string(&log_path).unwrap(), "hello\n");
    }

    #[test]
    fn file_appender_rejects_path_without_file_name() {
        assert!(file_appender(Path::new("/")).is_err());
    }
}
