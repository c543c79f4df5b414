use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

const LOG_FILE_PREFIX: &str = "classroom.log";

pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Installs the global subscriber: stdout always, plus a daily rolling file
/// when `config.log_dir` is set. Keep the guard alive to flush file logs.
/// A second call leaves the first subscriber in place.
pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let env_filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_target(true);

    let Some(log_dir) = config.log_dir.as_deref().filter(|dir| prepare_dir(dir)) else {
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(stdout_layer)
            .try_init();
        return None;
    };

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .ok()
        .map(|_| FileLogGuard { _guard: guard })
}

fn prepare_dir(dir: &Path) -> bool {
    match std::fs::create_dir_all(dir) {
        Ok(()) => true,
        Err(err) => {
            eprintln!("failed to create log directory {}: {err}", dir.display());
            false
        }
    }
}
