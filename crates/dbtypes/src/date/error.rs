//! Error type shared by every `Date` boundary.
//!
//! # Invariants
//! - Every decode/scan/parse failure maps to exactly one variant.
//! - JSON `null` and empty form input are skips, never errors.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DateResult<T> = Result<T, DateError>;

/// Failure raised while building, converting or decoding a [`Date`](super::Date).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateError {
    /// Input was not a string where a string was required.
    Type(String),
    /// String present but not `YYYY-MM-DD`.
    Format { input: String },
    /// Explicit parse call received empty text.
    EmptyInput,
    /// Database value cannot be interpreted as a timestamp.
    Conversion(String),
    /// Instant-to-text step failed.
    Serialization(String),
    /// Binary envelope is malformed or cannot be produced.
    Binary(String),
    /// Calendar normalization left the supported year range.
    OutOfRange,
    /// Caller-supplied format pattern is not a valid strftime pattern.
    InvalidLayout(String),
}

impl Display for DateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Type(message) => write!(f, "{message}"),
            Self::Format { .. } => write!(f, "date should be of the format: yyyy-mm-dd"),
            Self::EmptyInput => write!(f, "date string is empty"),
            Self::Conversion(message) => write!(f, "cannot convert database value to date: {message}"),
            Self::Serialization(message) => write!(f, "cannot serialize date: {message}"),
            Self::Binary(message) => write!(f, "invalid binary date: {message}"),
            Self::OutOfRange => write!(f, "date is out of the supported range"),
            Self::InvalidLayout(layout) => write!(f, "invalid date layout `{layout}`"),
        }
    }
}

impl Error for DateError {}
