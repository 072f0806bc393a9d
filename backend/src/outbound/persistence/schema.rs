//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts with their credentials and immutable role.
    users (id) {
        id -> Uuid,
        /// Lower-cased, unique.
        email -> Varchar,
        /// PHC-encoded Argon2 digest.
        password_hash -> Text,
        display_name -> Varchar,
        phone -> Varchar,
        city -> Varchar,
        region -> Varchar,
        /// One of `producer`, `cook`, `distributor`.
        role -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Surplus food offered by producers.
    donations (id) {
        id -> Uuid,
        producer_id -> Uuid,
        title -> Varchar,
        description -> Text,
        quantity -> Varchar,
        /// One of `available`, `accepted`, `finalized`.
        status -> Varchar,
        /// Set together with `accepted_at` once a cook accepts.
        cook_id -> Nullable<Uuid>,
        accepted_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Dishes cooked from accepted donations.
    dishes (id) {
        id -> Uuid,
        cook_id -> Uuid,
        /// Unique: one dish per donation.
        donation_id -> Uuid,
        title -> Varchar,
        description -> Text,
        /// One of `preparing`, `ready`, `distributed`.
        status -> Varchar,
        ready_at -> Nullable<Timestamptz>,
        distributor_id -> Nullable<Uuid>,
        distributed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit log of successful mutations.
    transactions (id) {
        id -> Uuid,
        user_id -> Uuid,
        action -> Varchar,
        entity_type -> Varchar,
        entity_id -> Uuid,
        created_at -> Timestamptz,
    }
}
