//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: Define the food-sharing workflow in transport-agnostic terms.
//! Donations move `available → accepted → finalized`, dishes move
//! `ready → distributed`, and every change is recorded in the audit log.
//!
//! Public surface:
//! - Error / ErrorCode: failure payload and stable error identifiers.
//! - User, Role, Capability: identities and role gating.
//! - Donation, Dish and their state machines.
//! - AuditEntry, DashboardStats: audit and reporting read models.
//! - ports: driven and driving port traits.
//! - *Service: driving port implementations.

pub mod audit;
pub mod auth;
pub mod content;
mod dashboard_service;
pub mod dish;
mod dish_service;
pub mod donation;
mod donation_service;
pub mod error;
pub mod ids;
pub mod ports;
pub mod read_model;
pub mod role;
mod service_support;
pub mod stats;
pub mod trace_id;
pub mod user;
mod user_directory_service;
pub mod validation;

pub use self::audit::{
    AuditAction, AuditEntityType, AuditEntry, AuditSubject, AuditTagParseError, HISTORY_LIMIT,
    HistoryLimit,
};
pub use self::auth::{
    AccessToken, AuthSession, CredentialValidationError, LoginCredentials, PasswordDigest,
    Registration, StoredCredentials,
};
pub use self::content::{ContentValidationError, Description, Quantity, Title};
pub use self::dashboard_service::DashboardService;
pub use self::dish::{
    Dish, DishContent, DishState, DishStateError, DishStatus, DishStatusParseError,
    DishTransition, DishTransitionError,
};
pub use self::dish_service::DishService;
pub use self::donation::{
    Donation, DonationContent, DonationState, DonationStateError, DonationStatus,
    DonationStatusParseError, DonationTransition, DonationTransitionError,
};
pub use self::donation_service::DonationService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::ids::{AuditEntryId, DishId, DonationId, IdParseError, UserId};
pub use self::read_model::{
    DishView, DisplayNames, DonationView, dish_user_ids, donation_user_ids, project_dish,
    project_donation,
};
pub use self::role::{Capability, Role, RoleParseError};
pub use self::stats::{
    CookStats, DashboardStats, DishCounts, DistributorStats, DonationCounts, EmptyStats,
    ProducerStats,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    City, DisplayName, EmailAddress, PhoneNumber, RegionCode, User, UserProfile,
    UserValidationError,
};
pub use self::user_directory_service::UserDirectoryService;
pub use self::validation::FieldViolation;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use foodshare::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("only producers can create donations"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
