//! Driving port for registration, login and token resolution.
//!
//! Inbound adapters call this port to manage identities without knowing
//! which store, hasher or token format backs it.

use async_trait::async_trait;

use crate::domain::{AuthSession, Error, LoginCredentials, Registration, User, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Create an account and issue a token for it.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Check credentials and issue a token.
    ///
    /// Unknown emails and wrong passwords fail identically.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;

    /// Load the user a resolved token refers to.
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error>;

    /// Verify a bearer token and return the user id it carries.
    fn resolve_token(&self, token: &str) -> Result<UserId, Error>;
}
