//! Error types.
//!
//! Only startup-time structural problems are errors.  Anomalies found while
//! a tick is running are logged and skipped inside the tick and never come
//! back out as a `GameError`.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum GameError {
    /// The terminal cannot host the play surface at all.
    TerminalTooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },

    /// A configuration value is outside what the simulation can lay out.
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    /// Terminal I/O failed.
    Io(io::Error),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::TerminalTooSmall {
                cols,
                rows,
                min_cols,
                min_rows,
            } => write!(
                f,
                "terminal is {cols}x{rows}, need at least {min_cols}x{min_rows}"
            ),
            GameError::InvalidConfig { field, reason } => {
                write!(f, "invalid configuration for {field}: {reason}")
            }
            GameError::Io(e) => write!(f, "terminal I/O failed: {e}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for GameError {
    fn from(e: io::Error) -> Self {
        GameError::Io(e)
    }
}
