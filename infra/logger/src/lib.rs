//! # Logger
//!
//! Installs the process-wide `tracing` subscriber for fstore binaries: a stderr
//! layer, an optional rolling file layer written through a non-blocking worker,
//! and an [`EnvFilter`](tracing_subscriber::EnvFilter) honoring `RUST_LOG`.
//!
//! ```rust
//! use fstore_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("fstore")
//!     .level(LevelFilter::DEBUG)
//!     .init()
//!     .unwrap();
//! ```

mod builder;
mod error;

pub use crate::builder::{LoggerBuilder, NoFile, NoName, WithFile, WithName};
pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use fstore_config::LogSettings;
use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;

/// Handle to the installed subscriber.
///
/// Dropping it stops the file worker after flushing buffered lines.
#[must_use = "Dropping this handle stops background file logging."]
#[derive(Debug)]
pub struct Logger {
    name: String,
    guard: Option<WorkerGuard>,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Installs the subscriber described by the `[logging]` settings section.
    ///
    /// # Errors
    /// [`LoggerError::InvalidConfiguration`] if `settings.level` is not a level name,
    /// plus everything [`LoggerBuilder::init`] can return.
    pub fn from_settings(name: &str, settings: &LogSettings) -> Result<Self, LoggerError> {
        let level = parse_level(&settings.level)?;
        let builder =
            Self::builder().name(name).level(level).console(settings.console).json(settings.json);

        match &settings.path {
            Some(path) => builder.path(path).init(),
            None => builder.init(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether a file worker is attached.
    #[must_use]
    pub const fn writes_files(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::debug!(logger = %self.name, "Flushing log files");
        }
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, LoggerError> {
    LevelFilter::from_str(level.trim()).map_err(|_| {
        LoggerError::invalid(format!("Unknown log level '{level}'"))
    })
}
