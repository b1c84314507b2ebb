//! # Error Types
//!
//! Custom error types for Gamepad Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for Gamepad Bridge
#[derive(Debug, Error)]
pub enum GamepadError {
    /// The capture or output collaborator failed to initialize
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// Unexpected failure inside the event monitoring loop
    #[error("Monitoring failure: {0}")]
    Monitoring(String),

    /// A binding referenced an unknown button or an invalid direction
    #[error("Invalid binding: {0}")]
    InvalidBinding(String),

    /// The virtual controller rejected a report
    #[error("Output device error: {0}")]
    Output(String),

    /// A lifecycle call that requires `initialize()` first
    #[error("Orchestrator has not been initialized")]
    NotInitialized,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Gamepad Bridge
pub type Result<T> = std::result::Result<T, GamepadError>;
