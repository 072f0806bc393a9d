//! Dish registry service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    DishCommand, DishQuery, DishRepository, DishRepositoryError, UserRepository,
};
use crate::domain::service_support::{dish_views, load_actor, single};
use crate::domain::{
    AuditAction, AuditEntry, AuditSubject, Capability, Dish, DishContent, DishId, DishStatus,
    DishTransition, DishView, DonationId, Error, UserId,
};

fn map_dish_error(error: DishRepositoryError) -> Error {
    match error {
        DishRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("dish repository unavailable: {message}"))
        }
        DishRepositoryError::Query { message } => {
            Error::internal(format!("dish repository error: {message}"))
        }
        DishRepositoryError::NotFound { dish_id } => {
            Error::not_found(format!("dish {dish_id} not found"))
        }
        DishRepositoryError::StatusConflict { expected, actual } => Error::invalid_state(
            format!("dish is {actual}; only {expected} dishes can be changed this way"),
        ),
        DishRepositoryError::DonationMissing { donation_id }
        | DishRepositoryError::DonationNotOwned { donation_id } => Error::invalid_reference(
            format!("donation {donation_id} does not exist or was not accepted by you"),
        ),
        DishRepositoryError::DonationNotAccepted {
            donation_id,
            actual,
        } => Error::invalid_state(format!(
            "donation {donation_id} is {actual}; dishes can only be made from accepted donations"
        )),
    }
}

/// Service implementing dish driving ports.
#[derive(Clone)]
pub struct DishService<Di, U> {
    dishes: Arc<Di>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<Di, U> DishService<Di, U> {
    pub fn new(dishes: Arc<Di>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dishes,
            users,
            clock,
        }
    }
}

impl<Di, U> DishService<Di, U>
where
    Di: DishRepository,
    U: UserRepository,
{
    async fn views(&self, dishes: Vec<Dish>) -> Result<Vec<DishView>, Error> {
        dish_views(self.users.as_ref(), dishes).await
    }

    async fn view(&self, dish: Dish) -> Result<DishView, Error> {
        single(self.views(vec![dish]).await?)
    }
}

#[async_trait]
impl<Di, U> DishCommand for DishService<Di, U>
where
    Di: DishRepository,
    U: UserRepository,
{
    async fn create(
        &self,
        actor: &UserId,
        donation_id: &DonationId,
        content: DishContent,
    ) -> Result<DishView, Error> {
        let cook = load_actor(self.users.as_ref(), actor).await?;
        cook.role().require(Capability::CreateDish)?;

        let now = self.clock.utc();
        let dish = Dish::ready(DishId::random(), cook.id(), *donation_id, content, now);
        let audit = AuditEntry::record(
            cook.id(),
            AuditAction::Created,
            AuditSubject::Dish(dish.id()),
            now,
        );
        self.dishes
            .create_from_donation(&dish, &audit)
            .await
            .map_err(map_dish_error)?;

        info!(
            user_id = %cook.id(),
            entity_id = %dish.id(),
            donation_id = %donation_id,
            "dish created and donation finalized"
        );
        self.view(dish).await
    }

    async fn distribute(&self, actor: &UserId, dish_id: &DishId) -> Result<DishView, Error> {
        let distributor = load_actor(self.users.as_ref(), actor).await?;
        distributor.role().require(Capability::DistributeDish)?;

        let now = self.clock.utc();
        let transition = DishTransition::Distribute {
            distributor_id: distributor.id(),
            at: now,
        };
        let audit = AuditEntry::record(
            distributor.id(),
            AuditAction::Distributed,
            AuditSubject::Dish(*dish_id),
            now,
        );
        let dish = self
            .dishes
            .transition(dish_id, &transition, &audit)
            .await
            .map_err(map_dish_error)?;

        info!(user_id = %distributor.id(), entity_id = %dish_id, "dish distributed");
        self.view(dish).await
    }
}

#[async_trait]
impl<Di, U> DishQuery for DishService<Di, U>
where
    Di: DishRepository,
    U: UserRepository,
{
    async fn list_by_status(&self, status: DishStatus) -> Result<Vec<DishView>, Error> {
        let dishes = self
            .dishes
            .list_by_status(status)
            .await
            .map_err(map_dish_error)?;
        self.views(dishes).await
    }

    async fn my_dishes(&self, actor: &UserId) -> Result<Vec<DishView>, Error> {
        let dishes = self
            .dishes
            .list_by_cook(actor)
            .await
            .map_err(map_dish_error)?;
        self.views(dishes).await
    }

    async fn distributed_by(&self, actor: &UserId) -> Result<Vec<DishView>, Error> {
        let dishes = self
            .dishes
            .list_distributed_by(actor)
            .await
            .map_err(map_dish_error)?;
        self.views(dishes).await
    }
}

#[cfg(test)]
#[path = "dish_service_tests.rs"]
mod tests;
