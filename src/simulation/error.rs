//! Error types and handling
//!
//! Fatal errors surface at construction: a malformed zone registry or an
//! out-of-range configuration. Everything downstream of a tick (sinks,
//! snapshot files) fails recoverably and is routed through [`ErrorHandler`].

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::types::ConfigValidationError;

/// Errors that can occur during simulation
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ConfigurationError(String),

    /// Zone registry is malformed
    #[error("Zone registry error: {0}")]
    ZoneRegistryError(String),

    /// Snapshot file could not be written
    #[error("Snapshot error: {0}")]
    SnapshotError(String),

    /// Dataset sink rejected a dataset
    #[error("Sink error: {0}")]
    SinkError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl From<ConfigValidationError> for SimulationError {
    fn from(error: ConfigValidationError) -> Self {
        SimulationError::ConfigurationError(error.to_string())
    }
}

impl SimulationError {
    /// Create a configuration error
    pub fn configuration_error(msg: impl Into<String>) -> Self {
        Self::ConfigurationError(msg.into())
    }

    /// Create a zone registry error
    pub fn zone_registry_error(msg: impl Into<String>) -> Self {
        Self::ZoneRegistryError(msg.into())
    }

    /// Create a snapshot error
    pub fn snapshot_error(msg: impl Into<String>) -> Self {
        Self::SnapshotError(msg.into())
    }

    /// Create a sink error
    pub fn sink_error(msg: impl Into<String>) -> Self {
        Self::SinkError(msg.into())
    }

    /// Check if this is a recoverable error
    pub fn is_recoverable(&self) -> bool {
        match self {
            SimulationError::ConfigurationError(_) => false,
            SimulationError::ZoneRegistryError(_) => false,
            SimulationError::SnapshotError(_) => true,
            SimulationError::SinkError(_) => true,
            SimulationError::IoError(_) => true,
            SimulationError::SerializationError(_) => true,
        }
    }

    /// Get the error category
    pub fn category(&self) -> &'static str {
        match self {
            SimulationError::ConfigurationError(_) => "Configuration",
            SimulationError::ZoneRegistryError(_) => "Zone Registry",
            SimulationError::SnapshotError(_) => "Snapshot",
            SimulationError::SinkError(_) => "Sink",
            SimulationError::IoError(_) => "IO",
            SimulationError::SerializationError(_) => "Serialization",
        }
    }
}

/// Result type for simulation operations
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Error recovery strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryStrategy {
    /// Drop the failed operation and keep ticking
    Skip,
    /// Stop the simulation
    Abort,
}

/// Error handler for graceful error recovery
#[derive(Debug)]
pub struct ErrorHandler {
    /// Whether to continue on recoverable errors
    pub continue_on_recoverable: bool,
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self { continue_on_recoverable: true }
    }
}

impl ErrorHandler {
    /// Create a new error handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Log `error` and pick a recovery strategy for it
    pub fn handle_error(&self, error: &SimulationError, context: &str) -> RecoveryStrategy {
        match error.category() {
            "Configuration" | "Zone Registry" => {
                error!("Critical error in {}: {}", error.category(), error);
            }
            _ => {
                warn!("Recoverable error in {}: {}", error.category(), error);
            }
        }

        if !context.is_empty() {
            debug!("Error context: {}", context);
        }

        if !error.is_recoverable() || !self.continue_on_recoverable {
            return RecoveryStrategy::Abort;
        }
        RecoveryStrategy::Skip
    }

    /// Run `operation`, turning recoverable failures into `Ok(None)`
    pub fn execute_with_recovery<T, F>(
        &self,
        operation: F,
        context: &str,
    ) -> SimulationResult<Option<T>>
    where
        F: FnOnce() -> SimulationResult<T>,
    {
        match operation() {
            Ok(result) => Ok(Some(result)),
            Err(error) => match self.handle_error(&error, context) {
                RecoveryStrategy::Skip => Ok(None),
                RecoveryStrategy::Abort => {
                    error!("Aborting due to non-recoverable error: {}", error);
                    Err(error)
                }
            },
        }
    }
}
