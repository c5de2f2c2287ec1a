//! Error types for trainer-core.

use thiserror::Error;

/// Result type alias using ValidationError.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors raised when a practice request is malformed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{field}' is required")]
    MissingField { field: &'static str },

    #[error("'{field}' must not be blank")]
    BlankField { field: &'static str },

    #[error("'{field}' is too long (max {max} characters)")]
    TooLong { field: &'static str, max: usize },
}

/// Require a present, non-blank text field and return it trimmed.
pub fn require_text<'a>(field: &'static str, value: Option<&'a str>) -> Result<&'a str> {
    let value = value.ok_or(ValidationError::MissingField { field })?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField { field });
    }
    Ok(trimmed)
}
