//! Driving port for donation mutations.

use async_trait::async_trait;

use crate::domain::{DonationContent, DonationId, DonationView, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationCommand: Send + Sync {
    /// Offer a new donation on behalf of a producer.
    async fn create(&self, actor: &UserId, content: DonationContent)
    -> Result<DonationView, Error>;

    /// Accept an available donation on behalf of a cook.
    async fn accept(&self, actor: &UserId, donation_id: &DonationId)
    -> Result<DonationView, Error>;
}
