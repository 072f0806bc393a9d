//! Dish handlers.
//!
//! ```text
//! GET /api/dishes?status=ready
//! POST /api/dishes {"donationId":"...","title":"Bread pudding","description":"..."}
//! POST /api/dishes/{id}/accept
//! GET /api/dishes/my-dishes
//! GET /api/dishes/distributed
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Capability, Description, DishContent, DishId, DishState, DishStatus, DishView, DonationId,
    Error, Title,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, field_error, parse_id, parse_status};

/// Body for `POST /api/dishes`.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDishRequest {
    /// Donation the dish is cooked from; must be accepted by the caller.
    pub donation_id: String,
    #[schema(example = "Bread pudding")]
    pub title: String,
    #[schema(example = "Twelve portions, contains milk and eggs")]
    pub description: String,
}

struct NewDish {
    donation_id: DonationId,
    content: DishContent,
}

impl TryFrom<CreateDishRequest> for NewDish {
    type Error = Error;

    fn try_from(value: CreateDishRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            donation_id: parse_id(&value.donation_id, FieldName::new("donationId"))?,
            content: DishContent {
                title: Title::new(&value.title).map_err(field_error)?,
                description: Description::new(&value.description).map_err(field_error)?,
            },
        })
    }
}

/// Optional status filter for the dish listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DishListQuery {
    /// `ready` (default), `preparing` or `distributed`.
    pub status: Option<String>,
}

/// Dish projected with resolved participant names.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DishResponse {
    pub id: String,
    pub cook_id: String,
    pub cook_name: Option<String>,
    pub donation_id: String,
    pub title: String,
    pub description: String,
    #[schema(example = "ready")]
    pub status: String,
    pub distributor_id: Option<String>,
    pub distributor_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub ready_at: Option<DateTime<Utc>>,
    pub distributed_at: Option<DateTime<Utc>>,
}

impl From<DishView> for DishResponse {
    fn from(view: DishView) -> Self {
        let DishView {
            dish,
            cook_name,
            distributor_name,
        } = view;
        let (ready_at, distributor_id, distributed_at) = match dish.state() {
            DishState::Preparing => (None, None, None),
            DishState::Ready { ready_at } => (Some(ready_at), None, None),
            DishState::Distributed {
                ready_at,
                distributor_id,
                distributed_at,
            } => (
                Some(ready_at),
                Some(distributor_id.to_string()),
                Some(distributed_at),
            ),
        };
        let content = dish.content();
        Self {
            id: dish.id().to_string(),
            cook_id: dish.cook_id().to_string(),
            cook_name: cook_name.map(|name| name.as_ref().to_owned()),
            donation_id: dish.donation_id().to_string(),
            title: content.title.as_str().to_owned(),
            description: content.description.as_str().to_owned(),
            status: dish.status().as_str().to_owned(),
            distributor_id,
            distributor_name: distributor_name.map(|name| name.as_ref().to_owned()),
            created_at: dish.created_at(),
            ready_at,
            distributed_at,
        }
    }
}

fn responses(views: Vec<DishView>) -> Vec<DishResponse> {
    views.into_iter().map(DishResponse::from).collect()
}

/// List dishes in a status, most recently ready first.
#[utoipa::path(
    get,
    path = "/api/dishes",
    params(DishListQuery),
    responses(
        (status = 200, description = "Dishes", body = [DishResponse]),
        (status = 400, description = "Unknown status filter", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["dishes"],
    operation_id = "listDishes"
)]
#[get("/dishes")]
pub async fn list_dishes(
    state: web::Data<HttpState>,
    _auth: AuthenticatedUser,
    query: web::Query<DishListQuery>,
) -> ApiResult<web::Json<Vec<DishResponse>>> {
    let status = parse_status(query.status.as_deref(), DishStatus::Ready)?;
    let views = state.dishes_query.list_by_status(status).await?;
    Ok(web::Json(responses(views)))
}

/// Cook a dish from a donation the caller accepted. Cooks only.
///
/// The source donation becomes `finalized` in the same unit of work.
#[utoipa::path(
    post,
    path = "/api/dishes",
    request_body = CreateDishRequest,
    responses(
        (status = 201, description = "Dish created and ready", body = DishResponse),
        (status = 400, description = "Invalid payload, donation reference or donation state", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not a cook", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["dishes"],
    operation_id = "createDish"
)]
#[post("/dishes")]
pub async fn create_dish(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    payload: web::Json<CreateDishRequest>,
) -> ApiResult<HttpResponse> {
    auth.authorize(&state, Capability::CreateDish).await?;
    let NewDish {
        donation_id,
        content,
    } = NewDish::try_from(payload.into_inner())?;
    let view = state
        .dishes
        .create(auth.user_id(), &donation_id, content)
        .await?;
    Ok(HttpResponse::Created().json(DishResponse::from(view)))
}

/// Take a ready dish for distribution. Distributors only.
#[utoipa::path(
    post,
    path = "/api/dishes/{id}/accept",
    params(("id" = String, Path, description = "Dish identifier")),
    responses(
        (status = 200, description = "Dish distributed", body = DishResponse),
        (status = 400, description = "Dish is not ready", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Caller is not a distributor", body = ErrorSchema),
        (status = 404, description = "Dish not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["dishes"],
    operation_id = "acceptDish"
)]
#[post("/dishes/{id}/accept")]
pub async fn accept_dish(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<DishResponse>> {
    auth.authorize(&state, Capability::DistributeDish).await?;
    let dish_id: DishId = parse_id(&path, FieldName::new("id"))?;
    let view = state.dishes.distribute(auth.user_id(), &dish_id).await?;
    Ok(web::Json(DishResponse::from(view)))
}

/// Dishes the caller cooked, newest first.
#[utoipa::path(
    get,
    path = "/api/dishes/my-dishes",
    responses(
        (status = 200, description = "Dishes", body = [DishResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["dishes"],
    operation_id = "myDishes"
)]
#[get("/dishes/my-dishes")]
pub async fn my_dishes(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<DishResponse>>> {
    let views = state.dishes_query.my_dishes(auth.user_id()).await?;
    Ok(web::Json(responses(views)))
}

/// Dishes the caller distributed, most recent first.
#[utoipa::path(
    get,
    path = "/api/dishes/distributed",
    responses(
        (status = 200, description = "Dishes", body = [DishResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["dishes"],
    operation_id = "distributedDishes"
)]
#[get("/dishes/distributed")]
pub async fn distributed_dishes(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<DishResponse>>> {
    let views = state.dishes_query.distributed_by(auth.user_id()).await?;
    Ok(web::Json(responses(views)))
}

#[cfg(test)]
#[path = "dishes_tests.rs"]
mod tests;
