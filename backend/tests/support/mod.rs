//! Shared harness for HTTP integration tests.
//!
//! Builds the full `/api` surface with fixture hashing and tokens, so each
//! test drives the real services end to end. [`Harness::new`] runs over one
//! [`InMemoryStore`]; [`Harness::over`] takes any set of repositories, such as
//! the Diesel adapters on an embedded PostgreSQL database.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use foodshare::Trace;
use foodshare::domain::ports::{
    AuditLogRepository, DishRepository, DonationRepository, FixtureCredentialHasher,
    FixtureTokenService, UserRepository,
};
use foodshare::domain::{DashboardService, DishService, DonationService, UserDirectoryService};
use foodshare::inbound::http::api_scope;
use foodshare::inbound::http::state::HttpState;
use foodshare::outbound::memory::InMemoryStore;
use foodshare::test_support::clock::SteppingClock;
use serde_json::{Value, json};

/// Handler state shared by every request a test sends.
#[derive(Clone)]
pub struct Harness {
    state: HttpState,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::over(store.clone(), store.clone(), store.clone(), store)
    }

    /// Wire the services over the given repositories.
    pub fn over<U, D, Di, A>(
        users: Arc<U>,
        donations: Arc<D>,
        dishes: Arc<Di>,
        audit: Arc<A>,
    ) -> Self
    where
        U: UserRepository + 'static,
        D: DonationRepository + 'static,
        Di: DishRepository + 'static,
        A: AuditLogRepository + 'static,
    {
        let clock = Arc::new(SteppingClock::default());
        let directory = Arc::new(UserDirectoryService::new(
            users.clone(),
            Arc::new(FixtureCredentialHasher),
            Arc::new(FixtureTokenService),
            clock.clone(),
        ));
        let donation_service = Arc::new(DonationService::new(
            donations.clone(),
            users.clone(),
            clock.clone(),
        ));
        let dish_service = Arc::new(DishService::new(dishes.clone(), users.clone(), clock));
        let dashboard = Arc::new(DashboardService::new(users, donations, dishes, audit));
        Self {
            state: HttpState {
                users: directory,
                donations: donation_service.clone(),
                donations_query: donation_service,
                dishes: dish_service.clone(),
                dishes_query: dish_service,
                dashboard,
            },
        }
    }

    /// Send one request and decode the JSON body, or `Value::Null` when empty.
    pub async fn send(&self, request: TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(self.state.clone()))
                .wrap(Trace)
                .service(api_scope()),
        )
        .await;
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("JSON body")
        };
        (status, value)
    }

    /// Issue a request carrying `session`'s bearer token.
    pub async fn send_as(&self, session: &Session, request: TestRequest) -> (StatusCode, Value) {
        self.send(request.insert_header(("authorization", format!("Bearer {}", session.token))))
            .await
    }

    /// Register a user and return their access token and id.
    pub async fn register(&self, email: &str, name: &str, role: &str) -> Session {
        let (status, body) = self
            .send(TestRequest::post().uri("/api/auth/register").set_json(json!({
                "email": email,
                "password": "correct horse battery staple",
                "name": name,
                "phone": "+55 11 5555-0100",
                "city": "São Paulo",
                "region": "SP",
                "role": role,
            })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "register {email}: {body}");
        Session {
            token: text(&body, "accessToken"),
            user_id: text(&body["user"], "id"),
        }
    }

    /// Offer a donation as `producer` and return its id.
    pub async fn offer(&self, producer: &Session, title: &str, quantity: &str) -> String {
        let (status, body) = self
            .send_as(
                producer,
                TestRequest::post().uri("/api/donations").set_json(json!({
                    "title": title,
                    "description": "Fresh surplus from today",
                    "quantity": quantity,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "offer {title}: {body}");
        text(&body, "id")
    }

    /// Accept a donation as `cook`, asserting success.
    pub async fn accept_donation(&self, cook: &Session, donation_id: &str) -> Value {
        let (status, body) = self
            .send_as(
                cook,
                TestRequest::post().uri(&format!("/api/donations/{donation_id}/accept")),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "accept {donation_id}: {body}");
        body
    }

    /// Cook a dish from `donation_id` and return the dish id.
    pub async fn cook(&self, cook: &Session, donation_id: &str, title: &str) -> String {
        let (status, body) = self
            .send_as(
                cook,
                TestRequest::post().uri("/api/dishes").set_json(json!({
                    "donationId": donation_id,
                    "title": title,
                    "description": "Cooked from donated ingredients",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "cook {title}: {body}");
        text(&body, "id")
    }
}

/// Credentials of a registered test user.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: String,
}

/// Read a string field, panicking with the body when it is absent.
pub fn text(body: &Value, field: &str) -> String {
    body.get(field)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("expected string field {field} in {body}"))
        .to_owned()
}
