//! PostgreSQL persistence adapters using Diesel.
//!
//! Repository implementations translate between Diesel rows and domain
//! aggregates and hold no business rules: state transitions are computed by
//! the domain and written with a compare-and-set on the prior status.
//! Row structs (`models`) and table definitions (`schema`) stay private.
//!
//! # Example
//!
//! ```no_run
//! use foodshare::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/foodshare")).await?;
//! let users = DieselUserRepository::new(pool);
//! # let _ = users;
//! # Ok(())
//! # }
//! ```

mod diesel_audit_log_repository;
mod diesel_basic_error_mapping;
mod diesel_dish_repository;
mod diesel_donation_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_audit_log_repository::DieselAuditLogRepository;
pub use diesel_dish_repository::DieselDishRepository;
pub use diesel_donation_repository::DieselDonationRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
