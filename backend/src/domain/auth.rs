//! Authentication primitives: credentials, registrations and issued tokens.
//!
//! Inbound adapters build these from raw payload strings before talking to
//! the user directory, so services only ever see validated values.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use super::validation::FieldViolation;
use super::{EmailAddress, Role, RoleParseError, User, UserProfile};

/// Validation errors for login and registration secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

impl FieldViolation for CredentialValidationError {
    fn field(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "email",
            Self::EmptyPassword => "password",
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::EmptyEmail => "empty_email",
            Self::EmptyPassword => "empty_password",
        }
    }
}

fn password_secret(password: &str) -> Result<Zeroizing<String>, CredentialValidationError> {
    if password.is_empty() {
        return Err(CredentialValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty. It is not checked for
///   shape so that malformed input fails as a credential mismatch.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use foodshare::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Ana@Example.com ", "s3cret").unwrap();
/// assert_eq!(creds.email(), "ana@example.com");
/// assert_eq!(creds.password(), "s3cret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let normalised = email.trim().to_lowercase();
        if normalised.is_empty() {
            return Err(CredentialValidationError::EmptyEmail);
        }
        Ok(Self {
            email: normalised,
            password: password_secret(password)?,
        })
    }

    /// Normalised email used for the account lookup.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Registration request with validated contact details.
///
/// The requested role stays raw until the directory has checked the email is
/// free, so a taken email is reported ahead of an unknown role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: EmailAddress,
    password: Zeroizing<String>,
    profile: UserProfile,
    role: String,
}

impl Registration {
    /// Bundle validated registration values with the raw password and role.
    pub fn new(
        email: EmailAddress,
        password: &str,
        profile: UserProfile,
        role: impl Into<String>,
    ) -> Result<Self, CredentialValidationError> {
        Ok(Self {
            email,
            password: password_secret(password)?,
            profile,
            role: role.into(),
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Parse the requested role.
    pub fn role(&self) -> Result<Role, RoleParseError> {
        self.role.parse()
    }
}

/// Opaque password digest produced by a credential hasher.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap an encoded digest, e.g. a PHC string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

/// A user together with their stored password digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user: User,
    pub digest: PasswordDigest,
}

/// Signed bearer token handed to clients.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Encoded token suitable for an `Authorization: Bearer` header.
    pub fn as_str(&self) -> &str {
        self.value.as_str()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// Outcome of a successful registration or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user: User,
    pub token: AccessToken,
}
