//! Donation handlers.
//!
//! ```text
//! GET /api/donations?status=available
//! POST /api/donations {"title":"Bread","description":"...","quantity":"10 loaves"}
//! POST /api/donations/{id}/accept
//! GET /api/donations/my-donations
//! GET /api/donations/accepted
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Capability, Description, DonationContent, DonationId, DonationState, DonationStatus,
    DonationView, Error, Quantity, Title,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, parse_id, parse_status};

/// Body for `POST /api/donations`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonationRequest {
    #[schema(example = "Bread")]
    pub title: String,
    #[schema(example = "Whole-grain loaves baked this morning")]
    pub description: String,
    #[schema(example = "10 loaves")]
    pub quantity: String,
}

impl TryFrom<CreateDonationRequest> for DonationContent {
    type Error = Error;

    fn try_from(value: CreateDonationRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: Title::new(&value.title).map_err(field_error)?,
            description: Description::new(&value.description).map_err(field_error)?,
            quantity: Quantity::new(&value.quantity).map_err(field_error)?,
        })
    }
}

/// Optional status filter for the donation listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DonationListQuery {
    /// `available` (default), `accepted` or `finalized`.
    pub status: Option<String>,
}

/// Donation projected with resolved participant names.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponse {
    pub id: String,
    pub producer_id: String,
    pub producer_name: Option<String>,
    pub title: String,
    pub description: String,
    pub quantity: String,
    #[schema(example = "available")]
    pub status: String,
    pub cook_id: Option<String>,
    pub cook_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
}

impl From<DonationView> for DonationResponse {
    fn from(view: DonationView) -> Self {
        let DonationView {
            donation,
            producer_name,
            cook_name,
        } = view;
        let (cook_id, accepted_at) = match donation.state() {
            DonationState::Available => (None, None),
            DonationState::Accepted {
                cook_id,
                accepted_at,
            }
            | DonationState::Finalized {
                cook_id,
                accepted_at,
            } => (Some(cook_id.to_string()), Some(accepted_at)),
        };
        let content = donation.content();
        Self {
            id: donation.id().to_string(),
            producer_id: donation.producer_id().to_string(),
            producer_name: producer_name.map(|name| name.as_ref().to_owned()),
            title: content.title.as_str().to_owned(),
            description: content.description.as_str().to_owned(),
            quantity: content.quantity.as_str().to_owned(),
            status: donation.status().as_str().to_owned(),
            cook_id,
            cook_name: cook_name.map(|name| name.as_ref().to_owned()),
            created_at: donation.created_at(),
            accepted_at,
        }
    }
}

fn responses(views: Vec<DonationView>) -> Vec<DonationResponse> {
    views.into_iter().map(DonationResponse::from).collect()
}

/// List donations in a status, newest first.
#[utoipa::path(
    get,
    path = "/api/donations",
    params(DonationListQuery),
    responses(
        (status = 200, description = "Donations", body = [DonationResponse]),
        (status = 400, description = "Unknown status filter", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "listDonations"
)]
#[get("/donations")]
pub async fn list_donations(
    state: web::Data<HttpState>,
    _auth: AuthenticatedUser,
    query: web::Query<DonationListQuery>,
) -> ApiResult<web::Json<Vec<DonationResponse>>> {
    let status = parse_status(query.status.as_deref(), DonationStatus::Available)?;
    let views = state.donations_query.list_by_status(status).await?;
    Ok(web::Json(responses(views)))
}

/// Offer a new donation. Producers only.
#[utoipa::path(
    post,
    path = "/api/donations",
    request_body = CreateDonationRequest,
    responses(
        (status = 201, description = "Donation created", body = DonationResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not a producer", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "createDonation"
)]
#[post("/donations")]
pub async fn create_donation(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    payload: web::Json<CreateDonationRequest>,
) -> ApiResult<HttpResponse> {
    auth.authorize(&state, Capability::CreateDonation).await?;
    let content = DonationContent::try_from(payload.into_inner())?;
    let view = state.donations.create(auth.user_id(), content).await?;
    Ok(HttpResponse::Created().json(DonationResponse::from(view)))
}

/// Accept an available donation. Cooks only.
#[utoipa::path(
    post,
    path = "/api/donations/{id}/accept",
    params(("id" = String, Path, description = "Donation identifier")),
    responses(
        (status = 200, description = "Donation accepted", body = DonationResponse),
        (status = 400, description = "Donation is not available", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not a cook", body = ErrorSchema),
        (status = 404, description = "Donation not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "acceptDonation"
)]
#[post("/donations/{id}/accept")]
pub async fn accept_donation(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<DonationResponse>> {
    auth.authorize(&state, Capability::AcceptDonation).await?;
    let donation_id: DonationId = parse_id(&path, FieldName::new("id"))?;
    let view = state.donations.accept(auth.user_id(), &donation_id).await?;
    Ok(web::Json(DonationResponse::from(view)))
}

/// Donations the caller offered, newest first.
#[utoipa::path(
    get,
    path = "/api/donations/my-donations",
    responses(
        (status = 200, description = "Donations", body = [DonationResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "myDonations"
)]
#[get("/donations/my-donations")]
pub async fn my_donations(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<DonationResponse>>> {
    let views = state.donations_query.my_donations(auth.user_id()).await?;
    Ok(web::Json(responses(views)))
}

/// Donations the caller accepted, most recently accepted first.
#[utoipa::path(
    get,
    path = "/api/donations/accepted",
    responses(
        (status = 200, description = "Donations", body = [DonationResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["donations"],
    operation_id = "acceptedDonations"
)]
#[get("/donations/accepted")]
pub async fn accepted_donations(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<DonationResponse>>> {
    let views = state.donations_query.accepted_by(auth.user_id()).await?;
    Ok(web::Json(responses(views)))
}

#[cfg(test)]
#[path = "donations_tests.rs"]
mod tests;
