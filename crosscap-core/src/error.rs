//! Error types for crosscap

use thiserror::Error;

/// Result type alias for crosscap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for crosscap
#[derive(Error, Debug)]
pub enum Error {
    /// Descriptor-level I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Capture open, read, or configuration error
    #[error("Capture error: {0}")]
    Capture(String),

    /// The packet source has been exhausted
    #[error("End of capture")]
    EndOfCapture,

    /// Filter expression could not be compiled
    #[error("Filter error: {0}")]
    Filter(String),

    /// Interface not found
    #[error("Interface '{0}' not found")]
    InterfaceNotFound(String),

    /// The selected platform backend lacks this capability
    #[error("Not supported on this platform: {0}")]
    Unsupported(&'static str),
}

impl Error {
    /// Create a capture error with a custom message
    pub fn capture<S: Into<String>>(msg: S) -> Self {
        Error::Capture(msg.into())
    }

    /// Create a filter error with a custom message
    pub fn filter<S: Into<String>>(msg: S) -> Self {
        Error::Filter(msg.into())
    }
}
