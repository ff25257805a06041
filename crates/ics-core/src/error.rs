//! Error types for iCalendar decoding.

use thiserror::Error;

/// Errors that can occur while decoding iCalendar text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IcsError {
    /// The input was not a well-formed iCalendar stream.
    /// Includes the 1-based (unfolded) line number where the error was detected.
    #[error("iCalendar parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The input contained no component at all.
    #[error("iCalendar input is empty")]
    Empty,
}

/// Convenience alias used throughout ics-core.
pub type Result<T> = std::result::Result<T, IcsError>;

impl IcsError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        IcsError::Parse {
            line,
            message: message.into(),
        }
    }
}
