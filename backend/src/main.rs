//! Backend entry-point: loads settings, connects storage and serves the API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use foodshare::inbound::http::health::HealthState;
use foodshare::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use foodshare::outbound::security::{BuildMode, TokenSecret, token_secret_from_env};
use foodshare::settings::AppSettings;
use ortho_config::OrthoConfig;

use server::{ServerConfig, create_server};

/// Read the signing secret from the process environment.
fn load_token_secret() -> Result<TokenSecret> {
    token_secret_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("failed to load token secret")
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let bind_addr = settings.bind_addr().wrap_err("invalid bind address")?;
    let token_secret = load_token_secret()?;

    let mut config = ServerConfig::new(bind_addr, token_secret, settings.token_ttl());
    if let Some(database_url) = settings.database_url() {
        run_migrations(database_url).await?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections),
        )
        .await
        .wrap_err("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");
    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}
