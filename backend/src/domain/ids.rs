//! Strongly typed entity identifiers.
//!
//! Every identifier wraps a UUID v4 and serialises as its hyphenated string
//! form. Distinct types stop a dish id from being passed where a donation id
//! is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raised when text does not parse as an identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} must be a valid UUID")]
pub struct IdParseError {
    kind: &'static str,
}

impl IdParseError {
    /// Human-readable name of the identifier that failed to parse.
    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap a UUID loaded from storage or another trusted source.
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Access the underlying UUID.
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| IdParseError { kind: $kind })
            }
        }
    };
}

define_id! {
    /// Identifier of a registered user.
    ///
    /// # Examples
    /// ```
    /// use foodshare::domain::UserId;
    ///
    /// let id: UserId = "3fa85f64-5717-4562-b3fc-2c963f66afa6".parse().expect("valid");
    /// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// ```
    UserId => "user id"
}

define_id! {
    /// Identifier of a donation.
    DonationId => "donation id"
}

define_id! {
    /// Identifier of a prepared dish.
    DishId => "dish id"
}

define_id! {
    /// Identifier of an audit log entry.
    AuditEntryId => "audit entry id"
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("123")]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afaZ")]
    fn rejects_malformed_text(#[case] raw: &str) {
        let err = raw.parse::<DonationId>().expect_err("malformed id");
        assert_eq!(err.kind(), "donation id");
        assert_eq!(err.to_string(), "donation id must be a valid UUID");
    }

    #[rstest]
    fn tolerates_surrounding_whitespace() {
        let id: DishId = " 3fa85f64-5717-4562-b3fc-2c963f66afa6 "
            .parse()
            .expect("trimmed id parses");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    fn serialises_as_plain_string() {
        let id = UserId::random();
        let value = serde_json::to_value(id).expect("id serialises");
        assert_eq!(value, serde_json::Value::String(id.to_string()));
    }
}
