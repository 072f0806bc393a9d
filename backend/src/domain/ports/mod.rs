//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, hasher, token service) are implemented by
//! outbound adapters. Driving ports (directory, commands, queries) are
//! implemented by domain services and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod audit_log_repository;
mod credential_hasher;
mod dashboard_query;
mod dish_command;
mod dish_query;
mod dish_repository;
mod donation_command;
mod donation_query;
mod donation_repository;
mod token_service;
mod user_directory;
mod user_repository;

#[cfg(test)]
pub use audit_log_repository::MockAuditLogRepository;
pub use audit_log_repository::{AuditLogRepository, AuditLogRepositoryError};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHasher, CredentialHasherError, FixtureCredentialHasher};
pub use dashboard_query::DashboardQuery;
#[cfg(test)]
pub use dashboard_query::MockDashboardQuery;
pub use dish_command::DishCommand;
#[cfg(test)]
pub use dish_command::MockDishCommand;
pub use dish_query::DishQuery;
#[cfg(test)]
pub use dish_query::MockDishQuery;
#[cfg(test)]
pub use dish_repository::MockDishRepository;
pub use dish_repository::{DishRepository, DishRepositoryError};
pub use donation_command::DonationCommand;
#[cfg(test)]
pub use donation_command::MockDonationCommand;
pub use donation_query::DonationQuery;
#[cfg(test)]
pub use donation_query::MockDonationQuery;
#[cfg(test)]
pub use donation_repository::MockDonationRepository;
pub use donation_repository::{DonationRepository, DonationRepositoryError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{FixtureTokenService, TokenError, TokenService};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
