//! Donation registry service.
//!
//! Implements the donation command and query driving ports. Role checks run
//! against the freshly loaded actor; state checks are left to the
//! repository's compare-and-set so concurrent accepts resolve in storage.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    DonationCommand, DonationQuery, DonationRepository, DonationRepositoryError, UserRepository,
};
use crate::domain::service_support::{donation_views, load_actor, single};
use crate::domain::{
    AuditAction, AuditEntry, AuditSubject, Capability, Donation, DonationContent, DonationId,
    DonationStatus, DonationTransition, DonationView, Error, UserId,
};

fn map_donation_error(error: DonationRepositoryError) -> Error {
    match error {
        DonationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("donation repository unavailable: {message}"))
        }
        DonationRepositoryError::Query { message } => {
            Error::internal(format!("donation repository error: {message}"))
        }
        DonationRepositoryError::NotFound { donation_id } => {
            Error::not_found(format!("donation {donation_id} not found"))
        }
        DonationRepositoryError::StatusConflict { expected, actual } => Error::invalid_state(
            format!("donation is {actual}; only {expected} donations can be changed this way"),
        ),
        DonationRepositoryError::CookMismatch { donation_id } => Error::invalid_reference(
            format!("donation {donation_id} was accepted by another cook"),
        ),
    }
}

/// Service implementing donation driving ports.
#[derive(Clone)]
pub struct DonationService<D, U> {
    donations: Arc<D>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<D, U> DonationService<D, U> {
    pub fn new(donations: Arc<D>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            donations,
            users,
            clock,
        }
    }
}

impl<D, U> DonationService<D, U>
where
    D: DonationRepository,
    U: UserRepository,
{
    async fn views(&self, donations: Vec<Donation>) -> Result<Vec<DonationView>, Error> {
        donation_views(self.users.as_ref(), donations).await
    }

    async fn view(&self, donation: Donation) -> Result<DonationView, Error> {
        single(self.views(vec![donation]).await?)
    }
}

#[async_trait]
impl<D, U> DonationCommand for DonationService<D, U>
where
    D: DonationRepository,
    U: UserRepository,
{
    async fn create(
        &self,
        actor: &UserId,
        content: DonationContent,
    ) -> Result<DonationView, Error> {
        let producer = load_actor(self.users.as_ref(), actor).await?;
        producer.role().require(Capability::CreateDonation)?;

        let now = self.clock.utc();
        let donation = Donation::offer(DonationId::random(), producer.id(), content, now);
        let audit = AuditEntry::record(
            producer.id(),
            AuditAction::Created,
            AuditSubject::Donation(donation.id()),
            now,
        );
        self.donations
            .create(&donation, &audit)
            .await
            .map_err(map_donation_error)?;

        info!(user_id = %producer.id(), entity_id = %donation.id(), "donation created");
        self.view(donation).await
    }

    async fn accept(
        &self,
        actor: &UserId,
        donation_id: &DonationId,
    ) -> Result<DonationView, Error> {
        let cook = load_actor(self.users.as_ref(), actor).await?;
        cook.role().require(Capability::AcceptDonation)?;

        let now = self.clock.utc();
        let transition = DonationTransition::Accept {
            cook_id: cook.id(),
            at: now,
        };
        let audit = AuditEntry::record(
            cook.id(),
            AuditAction::Accepted,
            AuditSubject::Donation(*donation_id),
            now,
        );
        let donation = self
            .donations
            .transition(donation_id, &transition, &audit)
            .await
            .map_err(map_donation_error)?;

        info!(user_id = %cook.id(), entity_id = %donation_id, "donation accepted");
        self.view(donation).await
    }
}

#[async_trait]
impl<D, U> DonationQuery for DonationService<D, U>
where
    D: DonationRepository,
    U: UserRepository,
{
    async fn list_by_status(&self, status: DonationStatus) -> Result<Vec<DonationView>, Error> {
        let donations = self
            .donations
            .list_by_status(status)
            .await
            .map_err(map_donation_error)?;
        self.views(donations).await
    }

    async fn my_donations(&self, actor: &UserId) -> Result<Vec<DonationView>, Error> {
        let donations = self
            .donations
            .list_by_producer(actor)
            .await
            .map_err(map_donation_error)?;
        self.views(donations).await
    }

    async fn accepted_by(&self, actor: &UserId) -> Result<Vec<DonationView>, Error> {
        let donations = self
            .donations
            .list_accepted_by(actor)
            .await
            .map_err(map_donation_error)?;
        self.views(donations).await
    }
}

#[cfg(test)]
#[path = "donation_service_tests.rs"]
mod tests;
