//! Logging and tracing setup
//!
//! Diagnostics go to stderr, and optionally to a rolling JSON file, so that
//! the live stats panel and JSON Lines output on stdout stay clean. With tick
//! timings enabled every closed `tick` span reports how long the tick took.

use std::io;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Error returned when the global subscriber cannot be installed
pub type LoggingInitError = Box<dyn std::error::Error + Send + Sync>;

/// File name prefix of rolling log files
pub const DEFAULT_LOG_PREFIX: &str = "forest-installation-simulator";

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Single-line human readable events
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// How often the log file rolls over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogRotation {
    /// A new file every hour
    Hourly,
    /// A new file every day
    #[default]
    Daily,
    /// A single file
    Never,
}

impl LogRotation {
    fn rotation(self) -> Rotation {
        match self {
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

/// Rolling log file; always written as JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// Directory the files are created in
    pub directory: PathBuf,
    /// File name prefix
    pub prefix: String,
    /// Rollover cadence
    pub rotation: LogRotation,
}

impl LogFile {
    /// Daily files under `directory`
    pub fn daily(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            prefix: DEFAULT_LOG_PREFIX.to_string(),
            rotation: LogRotation::Daily,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Most verbose level emitted by the crate
    pub level: Level,
    /// Console format
    pub format: LogFormat,
    /// Optional log file next to the console output
    pub file: Option<LogFile>,
    /// Report the duration of every tick span when it closes
    pub tick_timings: bool,
    /// ANSI colors on the compact console format
    pub ansi: bool,
    /// Filter directives replacing both `level` and `RUST_LOG`
    pub directives: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::Compact,
            file: None,
            tick_timings: false,
            ansi: true,
            directives: None,
        }
    }
}

impl LoggingConfig {
    /// Quiet configuration: warnings and errors only
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for the `--verbose` and `--debug` flags
    ///
    /// `--debug` wins over `--verbose`; both turn on tick timings.
    pub fn for_verbosity(verbose: bool, debug: bool) -> Self {
        if debug {
            Self::new().with_level(Level::DEBUG).with_tick_timings()
        } else if verbose {
            Self::new().with_level(Level::INFO).with_tick_timings()
        } else {
            Self::new()
        }
    }

    /// Set the crate log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the console format
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Also write events to a rolling file
    pub fn with_file(mut self, file: LogFile) -> Self {
        self.file = Some(file);
        self
    }

    /// Report tick durations
    pub fn with_tick_timings(mut self) -> Self {
        self.tick_timings = true;
        self
    }

    /// Plain console output
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    /// Use explicit filter directives, e.g. `forest_installation_simulator=trace`
    pub fn with_directives(mut self, directives: impl Into<String>) -> Self {
        self.directives = Some(directives.into());
        self
    }

    fn span_events(&self) -> FmtSpan {
        if self.tick_timings {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        }
    }

    fn filter(&self) -> Result<EnvFilter, LoggingInitError> {
        if let Some(directives) = &self.directives {
            return Ok(EnvFilter::try_new(directives)?);
        }
        let crate_level = format!("{}={}", env!("CARGO_CRATE_NAME"), self.level);
        Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(crate_level)))
    }

    /// Install the global subscriber
    ///
    /// The returned guard flushes the log file when dropped; keep it alive for
    /// the lifetime of the process.
    pub fn init(self) -> Result<Option<WorkerGuard>, LoggingInitError> {
        let console = match self.format {
            LogFormat::Compact => fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_ansi(self.ansi)
                .with_span_events(self.span_events())
                .boxed(),
            LogFormat::Json => fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_span_events(self.span_events())
                .boxed(),
        };

        let (file_layer, guard) = match &self.file {
            Some(file) => {
                let appender = RollingFileAppender::new(
                    file.rotation.rotation(),
                    &file.directory,
                    &file.prefix,
                );
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_span_events(self.span_events())
                    .boxed();
                (Some(layer), Some(guard))
            }
            None => (None, None),
        };

        Registry::default().with(self.filter()?).with(console).with(file_layer).try_init()?;

        info!(
            level = %self.level,
            format = ?self.format,
            log_file = ?self.file.as_ref().map(|file| &file.directory),
            "logging initialized"
        );
        Ok(guard)
    }
}

/// Structured event tagged with the scheduler component
///
/// Takes the field syntax of the `tracing` event macros, message last.
#[macro_export]
macro_rules! sim_event {
    ($level:ident, $($fields:tt)+) => {
        tracing::$level!(component = "scheduler", $($fields)+)
    };
}

/// Span timing one unit of work, reported on close when tick timings are on
#[macro_export]
macro_rules! perf_span {
    ($name:expr) => {
        tracing::info_span!($name, component = "performance")
    };
    ($name:expr, $($fields:tt)+) => {
        tracing::info_span!($name, component = "performance", $($fields)+)
    };
}
