//! # Logger
//!
//! One builder for the workspace's tracing setup: a compact console layer,
//! an optional rotating file layer with non-blocking I/O (plain or JSON
//! lines), and level filtering that respects `RUST_LOG`.
//!
//! ## Example
//!
//! ```rust
//! # use shub_logger::{Logger, LevelFilter};
//!
//! let _logger = Logger::builder()
//!     .name("my-app")
//!     .console(true)
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use std::fs;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const DEFAULT_MAX_FILES: usize = 10;
const LOG_FILE_SUFFIX: &str = "log";

/// Configures the global tracing subscriber. Console output is on by
/// default; file output is enabled by setting a [`LoggerBuilder::path`].
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug)]
pub struct LoggerBuilder {
    name: String,
    console: bool,
    path: Option<PathBuf>,
    level: LevelFilter,
    rotation: Rotation,
    max_files: usize,
    json: bool,
    env_filter: Option<String>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            name: String::new(),
            console: true,
            path: None,
            level: LevelFilter::INFO,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
            env_filter: None,
        }
    }
}

impl LoggerBuilder {
    /// Log identity; doubles as the rolling file prefix
    /// (`name.2026-08-26.log`).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub const fn console(mut self, enabled: bool) -> Self {
        self.console = enabled;
        self
    }

    /// Minimum level when no `RUST_LOG` or explicit filter is given.
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Directory for rolling log files; enables the file layer.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// How many rotated files to keep before pruning.
    pub const fn max_files(mut self, max: usize) -> Self {
        self.max_files = max;
        self
    }

    /// Switches the file output to JSON lines.
    pub const fn json(mut self) -> Self {
        self.json = true;
        self
    }

    /// Programmatic filter default (e.g., `shub=debug,hyper=info`).
    /// `RUST_LOG` still wins when set; a malformed filter fails `init`.
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Installs the global subscriber and returns the [`Logger`] handle.
    ///
    /// The handle owns the non-blocking [`WorkerGuard`]; keep it alive for
    /// the program's lifetime or buffered file logs are lost.
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] for an empty name, zero
    /// `max_files`, a malformed filter, or no enabled output;
    /// [`LoggerError::Subscriber`] if a global subscriber already exists.
    pub fn init(self) -> Result<Logger, LoggerError> {
        self.validate()?;

        let env_filter = self.build_env_filter()?;

        let mut layers = Vec::new();
        if self.console {
            layers.push(layer().compact().with_ansi(true).boxed());
        }

        let guard = match self.path {
            Some(ref path) => {
                let (file_layer, guard) = self.build_file_layer(path)?;
                layers.push(file_layer);
                Some(guard)
            },
            None => None,
        };

        tracing_subscriber::registry().with(env_filter).with(layers).try_init()?;

        Ok(Logger { guard })
    }

    fn validate(&self) -> Result<(), LoggerError> {
        let problem = if self.name.trim().is_empty() {
            "Logger name cannot be empty"
        } else if self.max_files == 0 {
            "max_files must be greater than zero"
        } else if !self.console && self.path.is_none() {
            "No logging layers enabled. Enable console or file output."
        } else {
            return Ok(());
        };

        Err(LoggerError::InvalidConfiguration { message: problem.into(), context: None })
    }

    fn build_env_filter(&self) -> Result<EnvFilter, LoggerError> {
        match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).map_err(|e| LoggerError::InvalidConfiguration {
                    message: e.to_string().into(),
                    context: Some("Parsing env filter".into()),
                })
            },
            None => Ok(EnvFilter::builder()
                .with_default_directive(self.level.into())
                .from_env_lossy()),
        }
    }

    fn build_file_layer<S>(
        &self,
        path: &PathBuf,
    ) -> Result<(Box<dyn Layer<S> + Send + Sync>, WorkerGuard), LoggerError>
    where
        S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    {
        fs::create_dir_all(path).map_err(|e| LoggerError::Internal {
            message: e.to_string().into(),
            context: Some(format!("Failed to create path: {}", path.display()).into()),
        })?;

        let appender = RollingFileAppender::builder()
            .rotation(self.rotation.clone())
            .filename_prefix(&self.name)
            .filename_suffix(LOG_FILE_SUFFIX)
            .max_log_files(self.max_files)
            .build(path)?;

        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let file_layer = layer().with_writer(non_blocking).with_ansi(false);

        let boxed =
            if self.json { file_layer.json().boxed() } else { file_layer.boxed() };

        Ok((boxed, guard))
    }
}

/// Handle to the initialized logging system; owns the background flush
/// worker for file output.
#[must_use = "Dropping this handle will stop background logging threads."]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use = "The builder must be configured before it can be used to initialize the logger."]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// The worker guard, when a file layer is active.
    #[must_use]
    pub const fn guard(&self) -> Option<&WorkerGuard> {
        self.guard.as_ref()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Logging system shutting down, flushing buffers...");
        }
    }
}
