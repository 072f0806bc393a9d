//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::ports::{
    MockDashboardQuery, MockDishCommand, MockDishQuery, MockDonationCommand, MockDonationQuery,
    MockUserDirectory,
};
use crate::domain::{Role, User, UserId};
use crate::test_support::fixtures::profile;

use super::state::HttpState;

/// Bearer token accepted by [`MockPorts::authorising`].
pub const TOKEN: &str = "test-token";

/// Mock driving ports for handler tests; unset ports reject every call.
#[derive(Default)]
pub struct MockPorts {
    pub users: MockUserDirectory,
    pub donations: MockDonationCommand,
    pub donations_query: MockDonationQuery,
    pub dishes: MockDishCommand,
    pub dishes_query: MockDishQuery,
    pub dashboard: MockDashboardQuery,
}

impl MockPorts {
    /// Ports whose user directory resolves [`TOKEN`] to `user_id`.
    pub fn authorising(user_id: UserId) -> Self {
        let mut users = MockUserDirectory::new();
        users
            .expect_resolve_token()
            .withf(|token| token == TOKEN)
            .returning(move |_| Ok(user_id));
        Self {
            users,
            ..Self::default()
        }
    }

    /// Ports authorising [`TOKEN`] for a `role` user, as workflow handlers
    /// look the caller up before touching the payload.
    pub fn acting_as(user_id: UserId, role: Role) -> Self {
        let mut ports = Self::authorising(user_id);
        ports
            .users
            .expect_current_user()
            .withf(move |id| *id == user_id)
            .returning(move |id| Ok(user(*id, "Test Actor", role)));
        ports
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            users: Arc::new(self.users),
            donations: Arc::new(self.donations),
            donations_query: Arc::new(self.donations_query),
            dishes: Arc::new(self.dishes),
            dishes_query: Arc::new(self.dishes_query),
            dashboard: Arc::new(self.dashboard),
        }
    }
}

/// Build an app serving the `/api` routes over `ports`.
pub fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .service(super::api_scope())
}

/// `Authorization` header carrying `token`.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("authorization", format!("Bearer {token}"))
}

pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 1, 15, hour, minute, 0).single() {
        Some(at) => at,
        None => panic!("fixture timestamp"),
    }
}

pub fn user(id: UserId, name: &str, role: Role) -> User {
    let email = format!("{}@example.com", name.to_ascii_lowercase().replace(' ', "."));
    match crate::domain::EmailAddress::new(email) {
        Ok(email) => User::new(id, email, profile(name), role, at(8, 0)),
        Err(error) => panic!("fixture email: {error}"),
    }
}
