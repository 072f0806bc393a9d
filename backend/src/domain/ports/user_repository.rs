//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{DisplayNames, EmailAddress, PasswordDigest, StoredCredentials, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another account already uses the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new user with their password digest.
    ///
    /// Fails with [`UserPersistenceError::DuplicateEmail`] when the email is
    /// taken, including when a concurrent registration wins the race.
    async fn insert(&self, user: &User, digest: &PasswordDigest) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and their digest by normalised email.
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Resolve display names for `ids`. Unknown ids are omitted.
    async fn display_names(&self, ids: &[UserId]) -> Result<DisplayNames, UserPersistenceError>;
}
