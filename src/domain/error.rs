//! Domain error types

use thiserror::Error;

/// Errors that can occur in the CAT bridge
#[derive(Error, Debug)]
pub enum CatError {
    /// Physical link trouble: open, write, or read failure.
    #[error("Serial port error: {0}")]
    Serial(String),

    /// A channel string that is neither "FA" nor "FB".
    #[error("Unknown VFO channel: '{0}'")]
    UnknownChannel(String),

    /// Frequency outside the 9-digit CAT payload range.
    #[error("Invalid frequency: {0} Hz is outside 0..=999999999")]
    InvalidFrequency(i64),

    /// A response with no 9-digit group anywhere in it.
    #[error("no 9-digit frequency found in response")]
    NoFrequencyFound,

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for CAT bridge operations
pub type CatResult<T> = Result<T, CatError>;
