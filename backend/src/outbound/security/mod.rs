//! Credential and access-token adapters.
//!
//! - [`Argon2CredentialHasher`] implements `CredentialHasher` with Argon2id,
//!   running key derivation on the blocking thread pool.
//! - [`JwtTokenService`] implements `TokenService` with HS256-signed JWTs.
//! - [`token_secret_from_env`] loads the signing secret.

mod argon2_hasher;
mod jwt_token_service;
pub mod token_config;

pub use argon2_hasher::Argon2CredentialHasher;
pub use jwt_token_service::JwtTokenService;
pub use token_config::{
    BuildMode, SECRET_MIN_LEN, TokenConfigError, TokenSecret, token_secret_from_env,
};
