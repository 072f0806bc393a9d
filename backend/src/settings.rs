//! Process configuration loaded via OrthoConfig.
//!
//! Values come from `FOODSHARE_*` environment variables, command-line flags
//! or a configuration file, in OrthoConfig's usual precedence.

use std::net::{AddrParseError, SocketAddr};

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FOODSHARE")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. When absent the in-memory store is used.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = 10)]
    pub db_max_connections: u32,
    /// Lifetime of issued access tokens.
    #[ortho_config(default = 60)]
    pub token_ttl_minutes: u32,
}

impl AppSettings {
    /// Return the configured bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .trim()
            .parse()
    }

    /// Return the configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn token_ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.token_ttl_minutes.max(1)))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "FOODSHARE_BIND_ADDR",
        "FOODSHARE_DATABASE_URL",
        "FOODSHARE_DB_MAX_CONNECTIONS",
        "FOODSHARE_TOKEN_TTL_MINUTES",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("foodshare")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([0, 0, 0, 0], 8080)))
        );
        assert_eq!(settings.database_url(), None);
        assert_eq!(settings.db_max_connections, 10);
        assert_eq!(settings.token_ttl(), Duration::minutes(60));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("FOODSHARE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "FOODSHARE_DATABASE_URL",
                Some("postgres://localhost/foodshare".to_owned()),
            ),
            ("FOODSHARE_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("FOODSHARE_TOKEN_TTL_MINUTES", Some("15".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            Ok(SocketAddr::from(([127, 0, 0, 1], 9000)))
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://localhost/foodshare")
        );
        assert_eq!(settings.db_max_connections, 4);
        assert_eq!(settings.token_ttl(), Duration::minutes(15));
    }

    #[rstest]
    #[case("   ")]
    #[case("\t")]
    fn blank_database_urls_select_the_memory_store(#[case] url: &str) {
        let _guard = lock_env([
            ("FOODSHARE_BIND_ADDR", None::<String>),
            ("FOODSHARE_DATABASE_URL", Some(url.to_owned())),
            ("FOODSHARE_DB_MAX_CONNECTIONS", None),
            ("FOODSHARE_TOKEN_TTL_MINUTES", None),
        ]);

        assert_eq!(load_from_empty_args().database_url(), None);
    }

    #[rstest]
    fn malformed_bind_addresses_are_reported() {
        let _guard = lock_env([
            ("FOODSHARE_BIND_ADDR", Some("localhost".to_owned())),
            ("FOODSHARE_DATABASE_URL", None::<String>),
            ("FOODSHARE_DB_MAX_CONNECTIONS", None),
            ("FOODSHARE_TOKEN_TTL_MINUTES", None),
        ]);

        assert!(load_from_empty_args().bind_addr().is_err());
    }
}
