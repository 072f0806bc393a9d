//! Helpers shared by the workflow services.

use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    DishView, DisplayNames, Dish, Donation, DonationView, Error, User, UserId, dish_user_ids,
    donation_user_ids, project_dish, project_donation,
};

pub(crate) fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::duplicate_email("email already registered")
        }
    }
}

/// Load the acting user; a token for a deleted account is no longer valid.
pub(crate) async fn load_actor<U>(users: &U, actor: &UserId) -> Result<User, Error>
where
    U: UserRepository + ?Sized,
{
    users
        .find_by_id(actor)
        .await
        .map_err(map_user_repository_error)?
        .ok_or_else(|| {
            debug!(user_id = %actor, "token refers to a missing user");
            Error::unauthorized("user no longer exists")
        })
}

async fn names_for<U>(users: &U, ids: Vec<UserId>) -> Result<DisplayNames, Error>
where
    U: UserRepository + ?Sized,
{
    if ids.is_empty() {
        return Ok(DisplayNames::new());
    }
    users
        .display_names(&ids)
        .await
        .map_err(map_user_repository_error)
}

pub(crate) async fn donation_views<U>(
    users: &U,
    donations: Vec<Donation>,
) -> Result<Vec<DonationView>, Error>
where
    U: UserRepository + ?Sized,
{
    let names = names_for(users, donation_user_ids(&donations)).await?;
    Ok(donations
        .into_iter()
        .map(|donation| project_donation(donation, &names))
        .collect())
}

pub(crate) async fn dish_views<U>(users: &U, dishes: Vec<Dish>) -> Result<Vec<DishView>, Error>
where
    U: UserRepository + ?Sized,
{
    let names = names_for(users, dish_user_ids(&dishes)).await?;
    Ok(dishes
        .into_iter()
        .map(|dish| project_dish(dish, &names))
        .collect())
}

/// Project a single entity returned by a mutation.
pub(crate) fn single<T>(views: Vec<T>) -> Result<T, Error> {
    views
        .into_iter()
        .next()
        .ok_or_else(|| Error::internal("projection dropped the entity"))
}
