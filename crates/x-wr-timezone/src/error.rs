//! Error types for calendar conversion.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// The zone named by `X-WR-TIMEZONE` or by the caller is not in the
    /// IANA database.
    #[error("Unknown timezone: {0}")]
    UnknownTimeZone(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
