//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every handler under `/api`, the health probes, the
//! request and response bodies, and the external schemas for domain types
//! ([`ErrorSchema`], [`ErrorCodeSchema`], [`DashboardStatsSchema`]). The
//! document backs Swagger UI in debug builds and is printed by the
//! `openapi-dump` binary.

use crate::inbound::http::dashboard::HistoryEntryResponse;
use crate::inbound::http::dishes::{CreateDishRequest, DishResponse};
use crate::inbound::http::donations::{CreateDonationRequest, DonationResponse};
use crate::inbound::http::schemas::{DashboardStatsSchema, ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer-token security scheme.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Access token issued by POST /api/auth/register or /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Foodshare backend API",
        description = "Coordinates surplus food from producers through cooks to distributors.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::donations::list_donations,
        crate::inbound::http::donations::create_donation,
        crate::inbound::http::donations::accept_donation,
        crate::inbound::http::donations::my_donations,
        crate::inbound::http::donations::accepted_donations,
        crate::inbound::http::dishes::list_dishes,
        crate::inbound::http::dishes::create_dish,
        crate::inbound::http::dishes::accept_dish,
        crate::inbound::http::dishes::my_dishes,
        crate::inbound::http::dishes::distributed_dishes,
        crate::inbound::http::dashboard::stats,
        crate::inbound::http::dashboard::history,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        DashboardStatsSchema,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        AuthResponse,
        CreateDonationRequest,
        DonationResponse,
        CreateDishRequest,
        DishResponse,
        HistoryEntryResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login and the current user"),
        (name = "donations", description = "Ingredient donations offered by producers"),
        (name = "dishes", description = "Dishes cooked from accepted donations"),
        (name = "dashboard", description = "Role-scoped statistics and action history"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
