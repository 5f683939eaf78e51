//! Field-level validation shared by artist and song documents.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub const MAX_NAME_CHARS: usize = 256;
pub const MAX_IMAGE_CHARS: usize = 2048;

/// Input field rejected before any persistence is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required text field is empty after trimming.
    Blank { field: &'static str },
    /// Text field exceeds its character limit.
    TooLong {
        field: &'static str,
        max_chars: usize,
    },
    /// Musical key is not one of the twelve pitch-class spellings.
    InvalidKey(String),
    /// Tonality is neither `major` nor `minor`.
    InvalidTonality(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank { field } => write!(f, "{field} must not be blank"),
            Self::TooLong { field, max_chars } => {
                write!(f, "{field} must be at most {max_chars} characters")
            }
            Self::InvalidKey(value) => write!(f, "invalid musical key `{value}`"),
            Self::InvalidTonality(value) => {
                write!(f, "invalid tonality `{value}`; expected major|minor")
            }
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and enforces non-blank plus `max_chars`.
pub fn required_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Blank { field });
    }
    bounded_text(field, trimmed, max_chars)
}

/// Trims `value` and enforces `max_chars`; empty is allowed.
pub fn optional_text(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<String, ValidationError> {
    bounded_text(field, value.trim(), max_chars)
}

fn bounded_text(
    field: &'static str,
    trimmed: &str,
    max_chars: usize,
) -> Result<String, ValidationError> {
    if trimmed.chars().count() > max_chars {
        return Err(ValidationError::TooLong { field, max_chars });
    }
    Ok(trimmed.to_string())
}
