//! Driving port for dish mutations.

use async_trait::async_trait;

use crate::domain::{DishContent, DishId, DishView, DonationId, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DishCommand: Send + Sync {
    /// Cook a dish from a donation the actor accepted.
    async fn create(
        &self,
        actor: &UserId,
        donation_id: &DonationId,
        content: DishContent,
    ) -> Result<DishView, Error>;

    /// Take a ready dish for distribution.
    async fn distribute(&self, actor: &UserId, dish_id: &DishId) -> Result<DishView, Error>;
}
