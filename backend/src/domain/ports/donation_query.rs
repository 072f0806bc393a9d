//! Driving port for donation listings.

use async_trait::async_trait;

use crate::domain::{DonationStatus, DonationView, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationQuery: Send + Sync {
    /// Donations in `status`, newest first.
    async fn list_by_status(&self, status: DonationStatus) -> Result<Vec<DonationView>, Error>;

    /// Donations offered by the actor, newest first.
    async fn my_donations(&self, actor: &UserId) -> Result<Vec<DonationView>, Error>;

    /// Donations the actor accepted, most recently accepted first.
    async fn accepted_by(&self, actor: &UserId) -> Result<Vec<DonationView>, Error>;
}
