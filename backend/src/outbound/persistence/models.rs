//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversion into domain aggregates lives in
//! the repository that owns each table.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{dishes, donations, transactions, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub phone: String,
    pub city: String,
    pub region: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for registering a user.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub display_name: &'a str,
    pub phone: &'a str,
    pub city: &'a str,
    pub region: &'a str,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Donations
// ---------------------------------------------------------------------------

/// Row struct for reading from the donations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = donations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DonationRow {
    pub id: Uuid,
    pub producer_id: Uuid,
    pub title: String,
    pub description: String,
    pub quantity: String,
    pub status: String,
    pub cook_id: Option<Uuid>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for offering a donation.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = donations)]
pub(crate) struct NewDonationRow<'a> {
    pub id: Uuid,
    pub producer_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub quantity: &'a str,
    pub status: &'a str,
    pub cook_id: Option<Uuid>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Columns touched by a donation status transition.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = donations)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct DonationStateChange<'a> {
    pub status: &'a str,
    pub cook_id: Option<Uuid>,
    pub accepted_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Dishes
// ---------------------------------------------------------------------------

/// Row struct for reading from the dishes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = dishes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DishRow {
    pub id: Uuid,
    pub cook_id: Uuid,
    pub donation_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub ready_at: Option<DateTime<Utc>>,
    pub distributor_id: Option<Uuid>,
    pub distributed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating a dish.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dishes)]
pub(crate) struct NewDishRow<'a> {
    pub id: Uuid,
    pub cook_id: Uuid,
    pub donation_id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub status: &'a str,
    pub ready_at: Option<DateTime<Utc>>,
    pub distributor_id: Option<Uuid>,
    pub distributed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Columns touched by a dish status transition.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = dishes)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct DishStateChange<'a> {
    pub status: &'a str,
    pub ready_at: Option<DateTime<Utc>>,
    pub distributor_id: Option<Uuid>,
    pub distributed_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Audit log
// ---------------------------------------------------------------------------

/// Row struct for reading from the transactions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AuditEntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for appending an audit entry.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = transactions)]
pub(crate) struct NewAuditEntryRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub action: &'a str,
    pub entity_type: &'a str,
    pub entity_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a crate::domain::AuditEntry> for NewAuditEntryRow<'a> {
    fn from(entry: &'a crate::domain::AuditEntry) -> Self {
        Self {
            id: *entry.id.as_uuid(),
            user_id: *entry.user_id.as_uuid(),
            action: entry.action.as_str(),
            entity_type: entry.entity_type.as_str(),
            entity_id: entry.entity_id,
            created_at: entry.created_at,
        }
    }
}
