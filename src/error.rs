//! Error types for parsing and decoding dates.

use std::fmt;
use thiserror::Error;

/// A numeric field of the `yyyy-mm-dd` layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Year,
    Month,
    Day,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Year => write!(f, "year"),
            Field::Month => write!(f, "month"),
            Field::Day => write!(f, "day"),
        }
    }
}

/// A string did not match the `yyyy-mm-dd` scan pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid date: missing {0}")]
    Missing(Field),

    #[error("invalid date: unexpected newline in {0}")]
    Newline(Field),

    #[error("invalid date: {0} is not an integer")]
    NotAnInteger(Field),

    #[error("invalid date: expected '-' after {0}")]
    Separator(Field),
}

impl ParseError {
    pub fn field(&self) -> Field {
        match *self {
            ParseError::Missing(field)
            | ParseError::Newline(field)
            | ParseError::NotAnInteger(field)
            | ParseError::Separator(field) => field,
        }
    }
}

/// A raw wire value could not be decoded into a date.
///
/// The variant names the stage that failed.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("date is neither null, an integer, nor a string: {0}")]
    Unwrap(#[source] serde_json::Error),

    #[error("date string: {0}")]
    Parse(#[from] ParseError),

    #[error("epoch milliseconds {0} are outside the supported range")]
    OutOfRange(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time zone {name:?}")]
pub struct ZoneError {
    pub name: String,
}
