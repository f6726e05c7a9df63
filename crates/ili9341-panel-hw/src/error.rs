//! Error types for the ILI9341 panel hardware library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when driving the panel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The bus transport reported a failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Geometry outside the logical panel bounds (strict clipping only).
    #[error("Coordinates ({x}, {y}) outside {width}x{height} panel")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: u16,
        height: u16,
    },

    /// Invalid orientation name.
    #[error("Invalid orientation: {0}")]
    InvalidOrientation(String),

    /// Invalid color string.
    #[error("Invalid color (expected #RRGGBB): {0}")]
    InvalidColor(String),

    /// Another thread panicked while holding the driver.
    #[error("Display lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Wraps a transport-specific error.
    pub(crate) fn transport<E: std::fmt::Debug>(err: E) -> Self {
        Error::Transport(format!("{:?}", err))
    }
}
