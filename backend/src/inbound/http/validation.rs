//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every payload failure becomes an `invalid_request` error whose details
//! name the offending field and a stable code.

use std::fmt::Display;
use std::str::FromStr;

use serde_json::json;

use crate::domain::{Error, FieldViolation, IdParseError};

/// Validation error codes raised by the HTTP layer itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorCode {
    InvalidUuid,
    InvalidStatus,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidStatus => "invalid_status",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

fn invalid_value(field: FieldName, message: String, code: ErrorCode, value: &str) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "value": value,
        "code": code.as_str(),
    }))
}

/// Map a domain field violation onto an `invalid_request` error.
pub(crate) fn field_error<V: FieldViolation>(violation: V) -> Error {
    Error::invalid_request(violation.to_string()).with_details(json!({
        "field": violation.field(),
        "code": violation.code(),
    }))
}

/// Parse an identifier from a path segment or body field.
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = IdParseError>,
{
    value.parse().map_err(|_| {
        invalid_value(
            field,
            format!("{} must be a valid UUID", field.as_str()),
            ErrorCode::InvalidUuid,
            value,
        )
    })
}

/// Parse an optional `status` filter, falling back to `default`.
pub(crate) fn parse_status<S>(value: Option<&str>, default: S) -> Result<S, Error>
where
    S: FromStr,
    S::Err: Display,
{
    let Some(raw) = value else {
        return Ok(default);
    };
    raw.parse().map_err(|err: S::Err| {
        invalid_value(
            FieldName::new("status"),
            err.to_string(),
            ErrorCode::InvalidStatus,
            raw,
        )
    })
}
