//! Driven port for issuing and verifying bearer tokens.

use chrono::{DateTime, Utc};

use crate::domain::{AccessToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token services.
    pub enum TokenError {
        /// The token is malformed, tampered with or names no user.
        Invalid { message: String } => "invalid token: {message}",
        /// The token's expiry has passed.
        Expired => "token expired",
        /// A token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Issue a token identifying `user_id`.
    fn issue(&self, user_id: &UserId) -> Result<AccessToken, TokenError>;

    /// Verify a token and return the user it identifies.
    fn verify(&self, token: &str) -> Result<UserId, TokenError>;
}

/// Unsigned token service for tests: tokens are `fixture:<user id>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTokenService;

const FIXTURE_PREFIX: &str = "fixture:";

impl TokenService for FixtureTokenService {
    fn issue(&self, user_id: &UserId) -> Result<AccessToken, TokenError> {
        Ok(AccessToken::new(
            format!("{FIXTURE_PREFIX}{user_id}"),
            DateTime::<Utc>::MAX_UTC,
        ))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        token
            .strip_prefix(FIXTURE_PREFIX)
            .ok_or_else(|| TokenError::invalid("not a fixture token"))?
            .parse()
            .map_err(|err: crate::domain::IdParseError| TokenError::invalid(err.to_string()))
    }
}
