//! Error definitions for the mapping module.

use thiserror::Error;

/// Error types for the mapping engine and router.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A mapping configuration failed validation
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Engine setup failed before entering the processing loop
    #[error("Initialization error: {0}")]
    InitializationError(String),

    /// A channel towards the engine or the UI is closed or full
    #[error("Channel error: {0}")]
    ChannelError(String),

    /// The engine task ended abnormally
    #[error("Task error: {0}")]
    TaskError(String),

    /// The strategy rejected or failed to process an event
    #[error("Strategy error: {0}")]
    StrategyError(String),
}
