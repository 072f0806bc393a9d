//! Access-token signing secret configuration.
//!
//! The secret is read from the file named by `AUTH_TOKEN_SECRET_FILE`
//! (default `/var/run/secrets/token_secret`). Debug builds, or deployments
//! that set `AUTH_TOKEN_ALLOW_EPHEMERAL=1`, fall back to a random secret
//! when the file is unreadable; tokens then stop verifying after a restart.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};
use mockable::Env;
use rand::RngCore;
use tracing::warn;
use zeroize::Zeroize;

const SECRET_DEFAULT_PATH: &str = "/var/run/secrets/token_secret";
const SECRET_FILE_ENV: &str = "AUTH_TOKEN_SECRET_FILE";
const ALLOW_EPHEMERAL_ENV: &str = "AUTH_TOKEN_ALLOW_EPHEMERAL";
const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const EPHEMERAL_LEN: usize = 64;

/// Minimum accepted secret length in bytes.
pub const SECRET_MIN_LEN: usize = 32;

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerates missing secrets with a warning.
    Debug,
    /// Requires a readable secret of at least [`SECRET_MIN_LEN`] bytes.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use foodshare::outbound::security::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// HMAC signing secret. Zeroed on drop and never printed.
#[derive(Clone)]
pub struct TokenSecret(Vec<u8>);

impl TokenSecret {
    /// Wrap raw secret bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Generate a random secret for development use.
    pub fn ephemeral() -> Self {
        let mut bytes = vec![0_u8; EPHEMERAL_LEN];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for TokenSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(<redacted>)")
    }
}

/// Errors raised while loading the signing secret.
#[derive(thiserror::Error, Debug)]
pub enum TokenConfigError {
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read token secret at {path}: {source}")]
    SecretRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("token secret at {path} too short: need >= {min_len} bytes, got {length}")]
    SecretTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Load the token signing secret from the environment.
///
/// # Examples
///
/// ```rust
/// use foodshare::outbound::security::{BuildMode, token_secret_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "AUTH_TOKEN_SECRET_FILE" => Some("/nonexistent/token_secret".to_owned()),
///     _ => None,
/// });
///
/// // Debug builds fall back to an ephemeral secret.
/// let secret = token_secret_from_env(&env, BuildMode::Debug).expect("ephemeral secret");
/// assert_eq!(secret.as_bytes().len(), 64);
/// ```
///
/// # Errors
///
/// Returns [`TokenConfigError`] when the secret is unreadable or too short
/// and no fallback applies, or when `AUTH_TOKEN_ALLOW_EPHEMERAL` is not a
/// boolean in a release build.
pub fn token_secret_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<TokenSecret, TokenConfigError> {
    let allow_ephemeral = allow_ephemeral_from_env(env, mode)?;
    let path = PathBuf::from(
        env.string(SECRET_FILE_ENV)
            .unwrap_or_else(|| SECRET_DEFAULT_PATH.to_owned()),
    );

    match read_secret(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if length < SECRET_MIN_LEN {
                if mode == BuildMode::Release {
                    bytes.zeroize();
                    return Err(TokenConfigError::SecretTooShort {
                        path,
                        length,
                        min_len: SECRET_MIN_LEN,
                    });
                }
                warn!(
                    path = %path.display(),
                    length,
                    "token secret shorter than {SECRET_MIN_LEN} bytes (dev only)"
                );
            }
            Ok(TokenSecret(bytes))
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using ephemeral token secret; tokens will not survive a restart"
            );
            Ok(TokenSecret::ephemeral())
        }
        Err(source) => Err(TokenConfigError::SecretRead { path, source }),
    }
}

fn read_secret(path: &Path) -> io::Result<Vec<u8>> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "secret path must name a file")
    })?;
    let directory = Dir::open_ambient_dir(parent, ambient_authority())?;
    let mut bytes = directory.read(Path::new(file_name))?;
    // Secrets mounted from files usually end with a newline.
    while bytes.last().is_some_and(u8::is_ascii_whitespace) {
        bytes.pop();
    }
    Ok(bytes)
}

fn allow_ephemeral_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<bool, TokenConfigError> {
    let Some(value) = env.string(ALLOW_EPHEMERAL_ENV) else {
        return Ok(false);
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(value = %value, "invalid {ALLOW_EPHEMERAL_ENV}; defaulting to disabled");
            Ok(false)
        }
        None => Err(TokenConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            value,
            expected: BOOL_EXPECTED,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
