use std::path::Path;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggerConfig;

/// Owns the background writer threads of the file layers.
/// Dropping it flushes and stops file logging.
pub struct Logger {
    pub guards: Vec<WorkerGuard>,
}

impl Logger {
    pub fn new(config: &LoggerConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let guards = Self::setup_logging(config)?;
        Ok(Logger { guards })
    }

    /// Console output plus daily rolling text and JSON files, each split
    /// into a general log and an error log.
    pub fn setup_logging(config: &LoggerConfig) -> Result<Vec<WorkerGuard>, Box<dyn std::error::Error>> {
        let root = Path::new(&config.log_dir);
        let error_dir = root.join("error");
        let json_dir = root.join("json");
        let error_json_dir = error_dir.join("json");
        for dir in [root, error_dir.as_path(), json_dir.as_path(), error_json_dir.as_path()] {
            std::fs::create_dir_all(dir)?;
        }

        let console_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,users_backend=debug"));
        let file_filter = || EnvFilter::new(&config.file_log_level);
        let error_filter = || EnvFilter::new(&config.error_file_log_level);

        let mut guards = Vec::with_capacity(4);
        let mut appender = |dir: &Path, suffix: &str| -> NonBlocking {
            let file = rolling::daily(dir, format!("{}.{}", config.file_prefix, suffix));
            let (writer, guard) = non_blocking(file);
            guards.push(guard);
            writer
        };
        let general = appender(root, "log");
        let errors = appender(&error_dir, "error.log");
        let general_json = appender(&json_dir, "json");
        let errors_json = appender(&error_json_dir, "error.json");

        tracing_subscriber::registry()
            .with(
                // Console output - pretty format for development
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_ansi(true)
                    .with_filter(console_filter),
            )
            .with(
                fmt::layer()
                    .with_writer(general)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(file_filter()),
            )
            .with(
                fmt::layer()
                    .with_writer(errors)
                    .with_ansi(false)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(error_filter()),
            )
            .with(
                fmt::layer()
                    .json()
                    .with_writer(general_json)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(file_filter()),
            )
            .with(
                fmt::layer()
                    .json()
                    .with_writer(errors_json)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(error_filter()),
            )
            .try_init()?;

        Ok(guards)
    }
}
