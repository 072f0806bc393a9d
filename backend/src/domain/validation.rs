//! Field-level validation contract shared by domain value types.
//!
//! Validation errors know which payload field they concern and carry a
//! stable snake_case code. Inbound adapters turn them into `invalid_request`
//! errors with `{ "field", "code" }` details.

use std::fmt::Display;

/// A validation failure tied to a single input field.
pub trait FieldViolation: Display {
    /// Name of the offending payload field, as clients spell it.
    fn field(&self) -> &'static str;

    /// Stable machine-readable reason, e.g. `too_long`.
    fn code(&self) -> &'static str;
}

/// Trim `raw` and check its character count lies in `1..=max`.
pub(crate) fn bounded_text(raw: &str, max: usize) -> Result<String, TextBoundError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TextBoundError::Empty);
    }
    if trimmed.chars().count() > max {
        return Err(TextBoundError::TooLong);
    }
    Ok(trimmed.to_owned())
}

/// Outcome of a failed [`bounded_text`] check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextBoundError {
    Empty,
    TooLong,
}
