//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers that need an identity take an [`AuthenticatedUser`] argument.
//! Extraction reads `Authorization: Bearer <token>` and resolves it through
//! the user directory, so handlers never see raw tokens.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};

use crate::domain::{Capability, Error, UserId};

use super::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Identity resolved from a valid bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.0
    }

    /// Fail with `Forbidden` unless the caller's role grants `capability`.
    ///
    /// Workflow handlers call this before parsing the payload or path.
    pub async fn authorize(&self, state: &HttpState, capability: Capability) -> Result<(), Error> {
        let user = state.users.current_user(&self.0).await?;
        user.role().require(capability)
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("malformed authorization header"))?;
    let (scheme, token) = value
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("malformed authorization header"))?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.is_empty() {
        return Err(Error::unauthorized("missing bearer token"));
    }
    Ok(token)
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let token = bearer_token(req)?;
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    state.users.resolve_token(token).map(AuthenticatedUser)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserDirectory;
    use crate::inbound::http::test_utils::{MockPorts, TOKEN, bearer};
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;
    use serde_json::Value;

    fn directory_accepting(user_id: UserId) -> MockUserDirectory {
        let mut users = MockUserDirectory::new();
        users
            .expect_resolve_token()
            .withf(|token| token == TOKEN)
            .returning(move |_| Ok(user_id));
        users
            .expect_resolve_token()
            .returning(|_| Err(Error::unauthorized("invalid token")));
        users
    }

    async fn call(users: MockUserDirectory, header: Option<(&str, String)>) -> (StatusCode, Value) {
        let state = MockPorts {
            users,
            ..MockPorts::default()
        }
        .into_state();
        let app = test::init_service(App::new().app_data(web::Data::new(state)).route(
            "/whoami",
            web::get().to(|user: AuthenticatedUser| async move {
                HttpResponse::Ok().json(serde_json::json!({ "id": user.user_id().to_string() }))
            }),
        ))
        .await;
        let mut req = test::TestRequest::get().uri("/whoami");
        if let Some(header) = header {
            req = req.insert_header(header);
        }
        let res = test::call_service(&app, req.to_request()).await;
        let status = res.status();
        (status, test::read_body_json(res).await)
    }

    #[actix_web::test]
    async fn valid_bearer_tokens_resolve_to_the_user() {
        let user_id = UserId::random();
        let (status, body) = call(directory_accepting(user_id), Some(bearer(TOKEN))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], user_id.to_string());
    }

    #[rstest]
    #[case(None)]
    #[case(Some(("authorization", "Basic dXNlcjpwYXNz".to_owned())))]
    #[case(Some(("authorization", "Bearer ".to_owned())))]
    #[case(Some(("authorization", "Bearer forged".to_owned())))]
    #[actix_web::test]
    async fn other_requests_are_unauthorised(#[case] header: Option<(&'static str, String)>) {
        let (status, body) = call(directory_accepting(UserId::random()), header).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized");
    }

    #[actix_web::test]
    async fn scheme_is_case_insensitive() {
        let header = ("authorization", format!("bEaReR {TOKEN}"));
        let (status, _) = call(directory_accepting(UserId::random()), Some(header)).await;

        assert_eq!(status, StatusCode::OK);
    }
}
