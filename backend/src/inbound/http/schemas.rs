//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The email is already registered.
    #[schema(rename = "duplicate_email")]
    DuplicateEmail,
    /// The role is not one of the fixed roles.
    #[schema(rename = "invalid_role")]
    InvalidRole,
    /// Email or password did not match.
    #[schema(rename = "invalid_credentials")]
    InvalidCredentials,
    /// Bearer token missing, expired or invalid.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The caller's role may not perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The entity is not in the status the action requires.
    #[schema(rename = "invalid_state")]
    InvalidState,
    /// A referenced entity is missing or belongs to someone else.
    #[schema(rename = "invalid_reference")]
    InvalidReference,
    /// The backing store is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "title must not be empty")]
    error: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "6f1f1c4e-8f7e-4d6a-9f59-4f4ad6f0c2d1")]
    trace_id: Option<String>,
    /// Supplementary error details such as `field` and `code`.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::DashboardStats`].
///
/// Only the counters for the caller's role are present; an actor whose
/// account no longer exists receives `{}`.
#[derive(ToSchema)]
#[schema(as = DashboardStats, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DashboardStatsSchema {
    /// Producer: donations offered.
    total_donations: Option<u64>,
    /// Producer: donations accepted. Cook: donations the cook accepted.
    accepted_donations: Option<u64>,
    /// Producer: donations turned into dishes.
    finalized_donations: Option<u64>,
    /// Producer: donations still open.
    available_donations: Option<u64>,
    /// Cook: dishes created.
    dishes_created: Option<u64>,
    /// Cook or distributor: dishes distributed.
    dishes_distributed: Option<u64>,
    /// Cook: dishes waiting for pickup.
    dishes_available: Option<u64>,
}
