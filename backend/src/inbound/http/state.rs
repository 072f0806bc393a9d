//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DashboardQuery, DishCommand, DishQuery, DonationCommand, DonationQuery, UserDirectory,
};

/// Dependency bundle for HTTP handlers.
///
/// Production wiring fills every port from the domain services; handler tests
/// substitute mocks for the ports they exercise.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserDirectory>,
    pub donations: Arc<dyn DonationCommand>,
    pub donations_query: Arc<dyn DonationQuery>,
    pub dishes: Arc<dyn DishCommand>,
    pub dishes_query: Arc<dyn DishQuery>,
    pub dashboard: Arc<dyn DashboardQuery>,
}
