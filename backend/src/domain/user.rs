//! Registered users and their validated contact attributes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{FieldViolation, TextBoundError, bounded_text};
use super::{Role, UserId};

/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 254;
/// Maximum length of a display name.
pub const DISPLAY_NAME_MAX: usize = 100;
/// Maximum length of a phone number.
pub const PHONE_MAX: usize = 20;
/// Maximum length of a city name.
pub const CITY_MAX: usize = 100;

/// Validation errors for user attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidEmail,
    EmptyDisplayName,
    DisplayNameTooLong { max: usize },
    EmptyPhone,
    PhoneTooLong { max: usize },
    EmptyCity,
    CityTooLong { max: usize },
    InvalidRegion,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyDisplayName => write!(f, "name must not be empty"),
            Self::DisplayNameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyPhone => write!(f, "phone must not be empty"),
            Self::PhoneTooLong { max } => write!(f, "phone must be at most {max} characters"),
            Self::EmptyCity => write!(f, "city must not be empty"),
            Self::CityTooLong { max } => write!(f, "city must be at most {max} characters"),
            Self::InvalidRegion => write!(f, "region must be a two-letter code"),
        }
    }
}

impl std::error::Error for UserValidationError {}

impl FieldViolation for UserValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "email",
            Self::EmptyDisplayName | Self::DisplayNameTooLong { .. } => "name",
            Self::EmptyPhone | Self::PhoneTooLong { .. } => "phone",
            Self::EmptyCity | Self::CityTooLong { .. } => "city",
            Self::InvalidRegion => "region",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid_email",
            Self::EmptyDisplayName | Self::EmptyPhone | Self::EmptyCity => "empty",
            Self::DisplayNameTooLong { .. } | Self::PhoneTooLong { .. } | Self::CityTooLong { .. } => {
                "too_long"
            }
            Self::InvalidRegion => "invalid_region",
        }
    }
}

/// Normalised email address: trimmed and lower-cased.
///
/// # Examples
/// ```
/// use foodshare::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Ana@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "ana@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Normalise and validate an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        let valid_shape = normalised
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty() && !domain.is_empty() && !domain.contains('@')
            });
        if !valid_shape
            || normalised.chars().count() > EMAIL_MAX
            || normalised.chars().any(char::is_whitespace)
        {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

macro_rules! bounded_string {
    ($(#[$meta:meta])* $name:ident, $max:expr, $empty:expr, $too_long:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Trim and validate the value.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
                bounded_text(raw.as_ref(), $max).map(Self).map_err(|err| match err {
                    TextBoundError::Empty => $empty,
                    TextBoundError::TooLong => $too_long,
                })
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = UserValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }
    };
}

bounded_string!(
    /// Name shown next to donations and dishes.
    DisplayName,
    DISPLAY_NAME_MAX,
    UserValidationError::EmptyDisplayName,
    UserValidationError::DisplayNameTooLong { max: DISPLAY_NAME_MAX }
);

bounded_string!(
    /// Free-form contact phone number.
    PhoneNumber,
    PHONE_MAX,
    UserValidationError::EmptyPhone,
    UserValidationError::PhoneTooLong { max: PHONE_MAX }
);

bounded_string!(
    /// City the user operates in.
    City,
    CITY_MAX,
    UserValidationError::EmptyCity,
    UserValidationError::CityTooLong { max: CITY_MAX }
);

/// Two-letter upper-case region code, e.g. `SP`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionCode(String);

impl RegionCode {
    /// Validate and upper-case a region code.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(UserValidationError::InvalidRegion);
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }
}

impl AsRef<str> for RegionCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<RegionCode> for String {
    fn from(value: RegionCode) -> Self {
        value.0
    }
}

impl TryFrom<String> for RegionCode {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact and location attributes captured at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub display_name: DisplayName,
    pub phone: PhoneNumber,
    pub city: City,
    pub region: RegionCode,
}

/// Registered participant.
///
/// ## Invariants
/// - `email` is unique across users.
/// - `role` never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    profile: UserProfile,
    role: Role,
    created_at: DateTime<Utc>,
}

impl User {
    /// Assemble a user from validated parts.
    pub fn new(
        id: UserId,
        email: EmailAddress,
        profile: UserProfile,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            profile,
            role,
            created_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn display_name(&self) -> &DisplayName {
        &self.profile.display_name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
