//! Driving port for dish listings.

use async_trait::async_trait;

use crate::domain::{DishStatus, DishView, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DishQuery: Send + Sync {
    /// Dishes in `status`, most recently ready first.
    async fn list_by_status(&self, status: DishStatus) -> Result<Vec<DishView>, Error>;

    /// Dishes cooked by the actor, newest first.
    async fn my_dishes(&self, actor: &UserId) -> Result<Vec<DishView>, Error>;

    /// Dishes the actor distributed, most recent first.
    async fn distributed_by(&self, actor: &UserId) -> Result<Vec<DishView>, Error>;
}
