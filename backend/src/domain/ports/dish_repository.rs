//! Port for dish persistence.

use async_trait::async_trait;

use crate::domain::{
    AuditEntry, Dish, DishCounts, DishId, DishStatus, DishTransition, DonationId, DonationStatus,
    UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by dish repository adapters.
    pub enum DishRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "dish repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "dish repository query failed: {message}",
        /// No dish has the identifier.
        NotFound { dish_id: DishId } => "dish {dish_id} not found",
        /// The stored status differed from the transition's expected prior status.
        StatusConflict { expected: DishStatus, actual: DishStatus } =>
            "dish is {actual}, expected {expected}",
        /// The source donation does not exist.
        DonationMissing { donation_id: DonationId } => "donation {donation_id} not found",
        /// The source donation was not accepted by the creating cook.
        DonationNotOwned { donation_id: DonationId } =>
            "donation {donation_id} was not accepted by this cook",
        /// The source donation is owned but no longer `accepted`.
        DonationNotAccepted { donation_id: DonationId, actual: DonationStatus } =>
            "donation {donation_id} is {actual}, expected accepted",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DishRepository: Send + Sync {
    /// Create `dish` from its source donation in one unit of work.
    ///
    /// The adapter locks the donation, checks it was accepted by the dish's
    /// cook, finalizes it with compare-and-set from `accepted`, inserts the
    /// dish and appends `audit`.
    async fn create_from_donation(
        &self,
        dish: &Dish,
        audit: &AuditEntry,
    ) -> Result<(), DishRepositoryError>;

    /// Apply `transition` with compare-and-set on the expected prior status
    /// and append `audit` in the same unit of work.
    async fn transition(
        &self,
        id: &DishId,
        transition: &DishTransition,
        audit: &AuditEntry,
    ) -> Result<Dish, DishRepositoryError>;

    async fn find_by_id(&self, id: &DishId) -> Result<Option<Dish>, DishRepositoryError>;

    /// Dishes with `status`, most recently ready first.
    async fn list_by_status(&self, status: DishStatus) -> Result<Vec<Dish>, DishRepositoryError>;

    /// Dishes cooked by `cook_id`, newest first.
    async fn list_by_cook(&self, cook_id: &UserId) -> Result<Vec<Dish>, DishRepositoryError>;

    /// Dishes distributed by `distributor_id`, most recent first.
    async fn list_distributed_by(
        &self,
        distributor_id: &UserId,
    ) -> Result<Vec<Dish>, DishRepositoryError>;

    /// Created and distributed tallies over dishes cooked by `cook_id`.
    async fn cook_counts(&self, cook_id: &UserId) -> Result<DishCounts, DishRepositoryError>;

    async fn count_distributed_by(
        &self,
        distributor_id: &UserId,
    ) -> Result<u64, DishRepositoryError>;
}
