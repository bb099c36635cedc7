//! Error types for the driver monitoring library.

use thiserror::Error;

/// Errors raised by the monitor, its configuration and its input sources
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` capture or image operation failed
    #[cfg(feature = "vision")]
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// `ONNX` Runtime session or inference failed
    #[cfg(feature = "vision")]
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::OrtError),

    /// File, camera or video I/O failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Landmark subset too short, or geometry that is not finite
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Landmark model rejected at load or inference time
    #[cfg(feature = "vision")]
    #[error("Model error: {0}")]
    ModelError(String),

    /// Landmark model produced no usable output
    #[cfg(feature = "vision")]
    #[error("Model output error: {0}")]
    ModelOutputError(String),

    /// Unknown smoother or zero window
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Invalid configuration value or unparsable config file
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Malformed line in a landmark replay file
    #[error("Replay error at line {line}: {message}")]
    Replay {
        /// 1-based line number in the replay file
        line: usize,
        /// Parser message
        message: String,
    },
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
