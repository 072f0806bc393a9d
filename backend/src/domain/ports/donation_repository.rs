//! Port for donation persistence.
//!
//! Mutations write the donation change and its audit entry as one unit.

use async_trait::async_trait;

use crate::domain::{
    AuditEntry, Donation, DonationCounts, DonationId, DonationStatus, DonationTransition, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by donation repository adapters.
    pub enum DonationRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "donation repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "donation repository query failed: {message}",
        /// No donation has the identifier.
        NotFound { donation_id: DonationId } => "donation {donation_id} not found",
        /// The stored status differed from the transition's expected prior status.
        StatusConflict { expected: DonationStatus, actual: DonationStatus } =>
            "donation is {actual}, expected {expected}",
        /// The donation was accepted by a different cook.
        CookMismatch { donation_id: DonationId } =>
            "donation {donation_id} was accepted by another cook",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationRepository: Send + Sync {
    /// Insert a new donation and its creation audit entry.
    async fn create(
        &self,
        donation: &Donation,
        audit: &AuditEntry,
    ) -> Result<(), DonationRepositoryError>;

    /// Apply `transition` with compare-and-set on the expected prior status
    /// and append `audit` in the same unit of work.
    ///
    /// A lost race surfaces as [`DonationRepositoryError::StatusConflict`].
    async fn transition(
        &self,
        id: &DonationId,
        transition: &DonationTransition,
        audit: &AuditEntry,
    ) -> Result<Donation, DonationRepositoryError>;

    async fn find_by_id(&self, id: &DonationId)
    -> Result<Option<Donation>, DonationRepositoryError>;

    /// Donations with `status`, newest first.
    async fn list_by_status(
        &self,
        status: DonationStatus,
    ) -> Result<Vec<Donation>, DonationRepositoryError>;

    /// Donations offered by `producer_id`, newest first.
    async fn list_by_producer(
        &self,
        producer_id: &UserId,
    ) -> Result<Vec<Donation>, DonationRepositoryError>;

    /// Donations accepted by `cook_id`, most recently accepted first.
    async fn list_accepted_by(
        &self,
        cook_id: &UserId,
    ) -> Result<Vec<Donation>, DonationRepositoryError>;

    /// Status tallies over donations offered by `producer_id`.
    async fn producer_counts(
        &self,
        producer_id: &UserId,
    ) -> Result<DonationCounts, DonationRepositoryError>;

    /// Number of donations accepted by `cook_id`, in any later status.
    async fn count_accepted_by(&self, cook_id: &UserId) -> Result<u64, DonationRepositoryError>;
}
