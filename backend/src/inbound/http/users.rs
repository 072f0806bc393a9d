//! Account handlers: registration, login and the current identity.
//!
//! ```text
//! POST /api/auth/register {"email":"ana@example.com","password":"...","name":"Ana",...}
//! POST /api/auth/login {"email":"ana@example.com","password":"..."}
//! GET /api/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuthSession, City, DisplayName, EmailAddress, Error, LoginCredentials, PhoneNumber,
    RegionCode, Registration, User, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::field_error;

const TOKEN_TYPE: &str = "Bearer";
const REGISTERED_MESSAGE: &str = "user registered";

/// Registration request body for `POST /api/auth/register`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "ana@example.com")]
    pub email: String,
    pub password: String,
    #[schema(example = "Ana Souza")]
    pub name: String,
    #[schema(example = "+55 11 5555-0100")]
    pub phone: String,
    #[schema(example = "São Paulo")]
    pub city: String,
    #[schema(example = "SP")]
    pub region: String,
    /// One of `producer`, `cook` or `distributor`.
    #[schema(example = "producer")]
    pub role: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let email = EmailAddress::new(&value.email).map_err(field_error)?;
        let profile = UserProfile {
            display_name: DisplayName::new(&value.name).map_err(field_error)?,
            phone: PhoneNumber::new(&value.phone).map_err(field_error)?,
            city: City::new(&value.city).map_err(field_error)?,
            region: RegionCode::new(&value.region).map_err(field_error)?,
        };
        Registration::new(email, &value.password, profile, value.role).map_err(field_error)
    }
}

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ana@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = Error;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password).map_err(field_error)
    }
}

/// Public view of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub city: String,
    pub region: String,
    #[schema(example = "cook")]
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        let profile = user.profile();
        Self {
            id: user.id().to_string(),
            email: user.email().to_string(),
            name: profile.display_name.as_ref().to_owned(),
            phone: profile.phone.as_ref().to_owned(),
            city: profile.city.as_ref().to_owned(),
            region: profile.region.as_ref().to_owned(),
            role: user.role().as_str().to_owned(),
            created_at: user.created_at(),
        }
    }
}

/// Token and identity returned by registration and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AuthResponse {
    fn from_session(session: &AuthSession, message: Option<&str>) -> Self {
        Self {
            access_token: session.token.as_str().to_owned(),
            token_type: TOKEN_TYPE.to_owned(),
            expires_at: session.token.expires_at(),
            user: UserResponse::from(&session.user),
            message: message.map(str::to_owned),
        }
    }
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid payload, duplicate email or unknown role", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let session = state.users.register(registration).await?;
    Ok(HttpResponse::Created().json(AuthResponse::from_session(
        &session,
        Some(REGISTERED_MESSAGE),
    )))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let session = state.users.authenticate(&credentials).await?;
    Ok(web::Json(AuthResponse::from_session(&session, None)))
}

/// Return the identity behind the bearer token.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User no longer exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.users.current_user(auth.user_id()).await?;
    Ok(web::Json(UserResponse::from(&user)))
}
