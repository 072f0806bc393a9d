//! Argon2id implementation of the `CredentialHasher` port.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use rand::rngs::OsRng;

use crate::domain::PasswordDigest;
use crate::domain::ports::{CredentialHasher, CredentialHasherError};

/// Argon2id hasher producing PHC-encoded digests.
#[derive(Clone)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Default for Argon2CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Argon2CredentialHasher {
    /// Build a hasher with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

fn hash_blocking(argon2: &Argon2<'_>, password: &str) -> Result<PasswordDigest, CredentialHasherError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| PasswordDigest::new(hash.to_string()))
        .map_err(|err| CredentialHasherError::hashing(err.to_string()))
}

fn verify_blocking(
    argon2: &Argon2<'_>,
    password: &str,
    digest: &str,
) -> Result<bool, CredentialHasherError> {
    let parsed =
        PasswordHash::new(digest).map_err(|err| CredentialHasherError::hashing(err.to_string()))?;
    match argon2.verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(CredentialHasherError::hashing(err.to_string())),
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, CredentialHasherError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CredentialHasherError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| CredentialHasherError::hashing(format!("hashing task failed: {err}")))?
}

#[async_trait]
impl CredentialHasher for Argon2CredentialHasher {
    async fn hash(&self, password: &str) -> Result<PasswordDigest, CredentialHasherError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        run_blocking(move || hash_blocking(&argon2, &password)).await
    }

    async fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, CredentialHasherError> {
        let argon2 = self.argon2.clone();
        let password = password.to_owned();
        let digest = digest.as_str().to_owned();
        run_blocking(move || verify_blocking(&argon2, &password, &digest)).await
    }
}
