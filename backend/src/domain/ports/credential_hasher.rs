//! Driven port for password hashing.

use async_trait::async_trait;

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hashers.
    pub enum CredentialHasherError {
        /// Hashing or digest parsing failed.
        Hashing { message: String } => "credential hashing failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Derive a salted digest of `password`.
    async fn hash(&self, password: &str) -> Result<PasswordDigest, CredentialHasherError>;

    /// Check `password` against a stored digest.
    async fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, CredentialHasherError>;
}

/// Reversible hasher for tests that do not exercise key derivation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCredentialHasher;

const FIXTURE_PREFIX: &str = "fixture$";

#[async_trait]
impl CredentialHasher for FixtureCredentialHasher {
    async fn hash(&self, password: &str) -> Result<PasswordDigest, CredentialHasherError> {
        Ok(PasswordDigest::new(format!("{FIXTURE_PREFIX}{password}")))
    }

    async fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, CredentialHasherError> {
        let stored = digest
            .as_str()
            .strip_prefix(FIXTURE_PREFIX)
            .ok_or_else(|| CredentialHasherError::hashing("not a fixture digest"))?;
        Ok(stored == password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("s3cret", true)]
    #[case("S3cret", false)]
    #[case("", false)]
    #[tokio::test]
    async fn fixture_hasher_matches_exact_password(#[case] attempt: &str, #[case] ok: bool) {
        let hasher = FixtureCredentialHasher;
        let digest = hasher.hash("s3cret").await.expect("hash");
        assert_eq!(hasher.verify(attempt, &digest).await, Ok(ok));
    }

    #[tokio::test]
    async fn fixture_hasher_rejects_foreign_digests() {
        let digest = PasswordDigest::new("$argon2id$v=19$m=19456,t=2,p=1$abc$def");
        let result = FixtureCredentialHasher.verify("pw", &digest).await;
        assert!(matches!(result, Err(CredentialHasherError::Hashing { .. })));
    }
}
