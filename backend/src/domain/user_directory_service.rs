//! User directory service: registration, login and token resolution.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    CredentialHasher, CredentialHasherError, TokenError, TokenService, UserDirectory,
    UserRepository,
};
use crate::domain::service_support::map_user_repository_error;
use crate::domain::{
    AuthSession, EmailAddress, Error, LoginCredentials, Registration, User, UserId,
};

const BAD_CREDENTIALS: &str = "invalid email or password";

fn map_hasher_error(error: CredentialHasherError) -> Error {
    Error::internal(format!("credential hasher error: {error}"))
}

fn map_issue_error(error: TokenError) -> Error {
    Error::internal(format!("token issue failed: {error}"))
}

/// Service implementing [`UserDirectory`] over a user repository, a
/// credential hasher and a token service.
#[derive(Clone)]
pub struct UserDirectoryService<U, H, T> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, H, T> UserDirectoryService<U, H, T> {
    pub fn new(users: Arc<U>, hasher: Arc<H>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<U, H, T> UserDirectoryService<U, H, T>
where
    U: UserRepository,
    H: CredentialHasher,
    T: TokenService,
{
    fn session_for(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(&user.id()).map_err(map_issue_error)?;
        Ok(AuthSession { user, token })
    }

    async fn email_taken(&self, email: &EmailAddress) -> Result<bool, Error> {
        self.users
            .find_credentials_by_email(email)
            .await
            .map(|found| found.is_some())
            .map_err(map_user_repository_error)
    }
}

#[async_trait]
impl<U, H, T> UserDirectory for UserDirectoryService<U, H, T>
where
    U: UserRepository,
    H: CredentialHasher,
    T: TokenService,
{
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        if self.email_taken(registration.email()).await? {
            return Err(Error::duplicate_email("email already registered"));
        }
        let role = registration.role()?;

        let digest = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hasher_error)?;
        let user = User::new(
            UserId::random(),
            registration.email().clone(),
            registration.profile().clone(),
            role,
            self.clock.utc(),
        );
        self.users
            .insert(&user, &digest)
            .await
            .map_err(map_user_repository_error)?;

        info!(user_id = %user.id(), role = user.role().as_str(), "user registered");
        self.session_for(user)
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            return Err(Error::invalid_credentials(BAD_CREDENTIALS));
        };
        let Some(stored) = self
            .users
            .find_credentials_by_email(&email)
            .await
            .map_err(map_user_repository_error)?
        else {
            return Err(Error::invalid_credentials(BAD_CREDENTIALS));
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.digest)
            .await
            .map_err(map_hasher_error)?;
        if !matches {
            warn!(user_id = %stored.user.id(), "password mismatch");
            return Err(Error::invalid_credentials(BAD_CREDENTIALS));
        }

        info!(user_id = %stored.user.id(), "user authenticated");
        self.session_for(stored.user)
    }

    async fn current_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    fn resolve_token(&self, token: &str) -> Result<UserId, Error> {
        self.tokens.verify(token).map_err(|err| match err {
            TokenError::Expired => Error::unauthorized("token expired"),
            TokenError::Invalid { .. } => Error::unauthorized("invalid token"),
            TokenError::Signing { message } => {
                Error::internal(format!("token verification failed: {message}"))
            }
        })
    }
}

#[cfg(test)]
#[path = "user_directory_service_tests.rs"]
mod tests;
