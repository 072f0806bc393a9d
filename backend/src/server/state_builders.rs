//! Builders wiring repositories and security adapters into [`HttpState`].

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::warn;

use foodshare::domain::ports::{
    AuditLogRepository, DishRepository, DonationRepository, TokenService, UserRepository,
};
use foodshare::domain::{DashboardService, DishService, DonationService, UserDirectoryService};
use foodshare::inbound::http::state::HttpState;
use foodshare::outbound::memory::InMemoryStore;
use foodshare::outbound::persistence::{
    DieselAuditLogRepository, DieselDishRepository, DieselDonationRepository,
    DieselUserRepository,
};
use foodshare::outbound::security::{Argon2CredentialHasher, JwtTokenService};

use super::ServerConfig;

/// Repository adapters backing every service.
struct Repositories<U, D, Di, A> {
    users: Arc<U>,
    donations: Arc<D>,
    dishes: Arc<Di>,
    audit: Arc<A>,
}

fn assemble<U, D, Di, A, T>(
    repos: Repositories<U, D, Di, A>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
) -> HttpState
where
    U: UserRepository + 'static,
    D: DonationRepository + 'static,
    Di: DishRepository + 'static,
    A: AuditLogRepository + 'static,
    T: TokenService + 'static,
{
    let Repositories {
        users,
        donations,
        dishes,
        audit,
    } = repos;

    let directory = Arc::new(UserDirectoryService::new(
        users.clone(),
        Arc::new(Argon2CredentialHasher::default()),
        tokens,
        clock.clone(),
    ));
    let donation_service = Arc::new(DonationService::new(
        donations.clone(),
        users.clone(),
        clock.clone(),
    ));
    let dish_service = Arc::new(DishService::new(dishes.clone(), users.clone(), clock));
    let dashboard = Arc::new(DashboardService::new(users, donations, dishes, audit));

    HttpState {
        users: directory,
        donations: donation_service.clone(),
        donations_query: donation_service,
        dishes: dish_service.clone(),
        dishes_query: dish_service,
        dashboard,
    }
}

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over a process-local in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens = Arc::new(JwtTokenService::new(
        &config.token_secret,
        config.token_ttl,
        clock.clone(),
    ));

    match &config.db_pool {
        Some(pool) => assemble(
            Repositories {
                users: Arc::new(DieselUserRepository::new(pool.clone())),
                donations: Arc::new(DieselDonationRepository::new(pool.clone())),
                dishes: Arc::new(DieselDishRepository::new(pool.clone())),
                audit: Arc::new(DieselAuditLogRepository::new(pool.clone())),
            },
            tokens,
            clock,
        ),
        None => {
            warn!("no database configured; data is kept in memory and lost on restart");
            let store = Arc::new(InMemoryStore::new());
            assemble(
                Repositories {
                    users: store.clone(),
                    donations: store.clone(),
                    dishes: store.clone(),
                    audit: store,
                },
                tokens,
                clock,
            )
        }
    }
}
