// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "HEATCHECK_LOG";
const DEFAULT_FILTER: &str = "info";
const LOG_FILE_PREFIX: &str = "heatcheck.log";

pub enum LogTarget<'a> {
    /// Daily-rotated files. The terminal belongs to the TUI.
    Directory(&'a Path),
    Stderr,
}

/// Installs the global subscriber. Keep the guard alive until exit or
/// buffered lines are lost.
pub fn init(target: LogTarget<'_>) -> Result<WorkerGuard> {
    let filter = env_filter();
    let (writer, guard) = match target {
        LogTarget::Directory(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            tracing_appender::non_blocking(appender)
        }
        LogTarget::Stderr => tracing_appender::non_blocking(std::io::stderr()),
    };

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;
    Ok(guard)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::{LogTarget, init};
    use anyhow::Result;

    #[test]
    fn file_logging_writes_under_directory() -> Result<()> {
        let temp = tempfile::tempdir()?;
        {
            let _guard = init(LogTarget::Directory(temp.path()))?;
            tracing::info!("log line from test");
        }

        let entries: Vec<_> = std::fs::read_dir(temp.path())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        assert!(
            entries.iter().any(|name| name.starts_with("heatcheck.log")),
            "got {entries:?}"
        );

        let error = init(LogTarget::Stderr).expect_err("subscriber is already set");
        assert!(error.to_string().contains("install log subscriber"));
        Ok(())
    }
}
