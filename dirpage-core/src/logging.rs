//! src/logging.rs
//! ============================================================================
//! # Logging: tracing subscriber with a rolling file sink
//!
//! Log output goes to a non-blocking rolling file so stdout stays free for
//! the interactive listing. The returned `WorkerGuard` must be held for the
//! lifetime of the program or buffered lines are lost on exit.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs as TokioFs;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    EnvFilter, fmt::time::ChronoUtc, layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Never,

    #[default]
    Daily,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub file_prefix: String,
    pub level: String,

    /// Emit one JSON object per line instead of plain text
    pub json: bool,

    pub max_log_files: usize,
    pub rotation: LogRotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
            file_prefix: "dirpage".to_string(),
            level: "info".to_string(),
            json: true,
            max_log_files: 10,
            rotation: LogRotation::Daily,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Logger already initialized")]
    AlreadyInitialized,

    #[error("Invalid log directory: {0}")]
    InvalidLogDirectory(String),

    #[error("Failed to create log directory: {0}")]
    DirectoryCreationFailed(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub struct LoggerBuilder {
    config: LoggingConfig,
}

impl LoggerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: LoggingConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: LoggingConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_level(mut self, level: &str) -> Self {
        self.config.level = level.to_string();
        self
    }

    /// Installs the global subscriber. A set `RUST_LOG` takes precedence over
    /// the configured level.
    pub async fn build(self) -> Result<WorkerGuard, LoggingError> {
        validate_config(&self.config)?;
        setup_log_directory(&self.config.log_dir).await?;

        let rotation = match self.config.rotation {
            LogRotation::Never => Rotation::NEVER,
            LogRotation::Daily => Rotation::DAILY,
        };

        let suffix = if self.config.json { "jsonl" } else { "log" };

        let file_appender = RollingFileAppender::builder()
            .rotation(rotation)
            .filename_prefix(self.config.file_prefix.as_str())
            .filename_suffix(suffix)
            .max_log_files(self.config.max_log_files)
            .build(&self.config.log_dir)
            .map_err(|e| LoggingError::ConfigError(e.to_string()))?;

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let filter = build_filter(&self.config.level, env_directives.as_deref())?;

        let json_layer = self.config.json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_timer(ChronoUtc::rfc_3339())
                .with_current_span(true)
                .with_writer(non_blocking.clone())
        });

        let text_layer = (!self.config.json).then(|| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(non_blocking.clone())
        });

        tracing_subscriber::registry()
            .with(filter)
            .with(json_layer)
            .with(text_layer)
            .try_init()
            .map_err(|_| LoggingError::AlreadyInitialized)?;

        Ok(guard)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Env directives win when present and non-empty; otherwise the configured
/// level applies.
fn build_filter(level: &str, env_directives: Option<&str>) -> Result<EnvFilter, LoggingError> {
    match env_directives.map(str::trim).filter(|d| !d.is_empty()) {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| LoggingError::ConfigError(format!("Invalid RUST_LOG: {e}"))),

        None => EnvFilter::try_new(level)
            .map_err(|e| LoggingError::ConfigError(format!("Invalid log level: {e}"))),
    }
}

pub async fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard, LoggingError> {
    LoggerBuilder::new().with_config(config.clone()).build().await
}

fn validate_config(config: &LoggingConfig) -> Result<(), LoggingError> {
    if config.file_prefix.is_empty() {
        return Err(LoggingError::ConfigError(
            "File prefix must not be empty".to_string(),
        ));
    }

    if config.max_log_files == 0 {
        return Err(LoggingError::ConfigError(
            "Max log files must be greater than 0".to_string(),
        ));
    }

    validate_log_directory(&config.log_dir)
}

fn validate_log_directory(path: &Path) -> Result<(), LoggingError> {
    if path.components().count() == 0 {
        return Err(LoggingError::InvalidLogDirectory("Empty path".to_string()));
    }

    if path.components().any(|c| c == Component::ParentDir) {
        return Err(LoggingError::InvalidLogDirectory(
            "Path contains parent directory references".to_string(),
        ));
    }

    Ok(())
}

async fn setup_log_directory(log_dir: &Path) -> Result<(), LoggingError> {
    if !TokioFs::try_exists(log_dir).await? {
        TokioFs::create_dir_all(log_dir).await?;
    }
    Ok(())
}
