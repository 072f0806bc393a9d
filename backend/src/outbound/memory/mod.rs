//! In-memory adapters implementing the repository ports.
//!
//! Used when no database is configured and by integration tests. A single
//! mutex guards the whole store, so every check-and-write (compare-and-set
//! transitions, dish creation, audit appends) happens under one guard and
//! matches the transactional behaviour of the PostgreSQL adapters.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    AuditLogRepository, AuditLogRepositoryError, DishRepository, DishRepositoryError,
    DonationRepository, DonationRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuditEntry, DisplayNames, Dish, DishCounts, DishId, DishStatus, DishTransition, Donation,
    DonationCounts, DonationId, DonationStatus, DonationTransition, DonationTransitionError,
    EmailAddress, HistoryLimit, PasswordDigest, StoredCredentials, User, UserId,
};

#[derive(Default)]
struct StoreState {
    users: Vec<StoredCredentials>,
    donations: Vec<Donation>,
    dishes: Vec<Dish>,
    audit: Vec<AuditEntry>,
}

/// Shared in-memory store. Clones share the same state.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(&self, query: impl FnOnce(String) -> E) -> Result<MutexGuard<'_, StoreState>, E> {
        self.state.lock().map_err(|_| {
            debug!("in-memory store mutex poisoned");
            query("store lock poisoned".to_owned())
        })
    }
}

/// Clone matching items newest first by `key`.
///
/// Ties keep the most recently inserted item first.
fn newest_first<'a, T, K, F>(items: impl DoubleEndedIterator<Item = &'a T>, key: F) -> Vec<T>
where
    T: Clone + 'a,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut selected: Vec<T> = items.rev().cloned().collect();
    selected.sort_by(|a, b| key(b).cmp(&key(a)));
    selected
}

fn count<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> u64 {
    items
        .iter()
        .filter(|item| predicate(item))
        .fold(0, |acc, _| acc + 1)
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User, digest: &PasswordDigest) -> Result<(), UserPersistenceError> {
        let mut state = self.lock(|message| UserPersistenceError::query(message))?;
        if state
            .users
            .iter()
            .any(|stored| stored.user.email() == user.email())
        {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        state.users.push(StoredCredentials {
            user: user.clone(),
            digest: digest.clone(),
        });
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let state = self.lock(|message| UserPersistenceError::query(message))?;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.id() == *id)
            .map(|stored| stored.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = self.lock(|message| UserPersistenceError::query(message))?;
        Ok(state
            .users
            .iter()
            .find(|stored| stored.user.email() == email)
            .cloned())
    }

    async fn display_names(&self, ids: &[UserId]) -> Result<DisplayNames, UserPersistenceError> {
        let state = self.lock(|message| UserPersistenceError::query(message))?;
        Ok(state
            .users
            .iter()
            .filter(|stored| ids.contains(&stored.user.id()))
            .map(|stored| (stored.user.id(), stored.user.display_name().clone()))
            .collect())
    }
}

#[async_trait]
impl DonationRepository for InMemoryStore {
    async fn create(
        &self,
        donation: &Donation,
        audit: &AuditEntry,
    ) -> Result<(), DonationRepositoryError> {
        let mut state = self.lock(|message| DonationRepositoryError::query(message))?;
        state.donations.push(donation.clone());
        state.audit.push(audit.clone());
        Ok(())
    }

    async fn transition(
        &self,
        id: &DonationId,
        transition: &DonationTransition,
        audit: &AuditEntry,
    ) -> Result<Donation, DonationRepositoryError> {
        let mut state = self.lock(|message| DonationRepositoryError::query(message))?;
        let donation = state
            .donations
            .iter_mut()
            .find(|donation| donation.id() == *id)
            .ok_or_else(|| DonationRepositoryError::not_found(*id))?;
        donation.apply(transition).map_err(|err| match err {
            DonationTransitionError::WrongStatus { expected, actual } => {
                DonationRepositoryError::status_conflict(expected, actual)
            }
            DonationTransitionError::CookMismatch => DonationRepositoryError::cook_mismatch(*id),
        })?;
        let updated = donation.clone();
        state.audit.push(audit.clone());
        Ok(updated)
    }

    async fn find_by_id(
        &self,
        id: &DonationId,
    ) -> Result<Option<Donation>, DonationRepositoryError> {
        let state = self.lock(|message| DonationRepositoryError::query(message))?;
        Ok(state
            .donations
            .iter()
            .find(|donation| donation.id() == *id)
            .cloned())
    }

    async fn list_by_status(
        &self,
        status: DonationStatus,
    ) -> Result<Vec<Donation>, DonationRepositoryError> {
        let state = self.lock(|message| DonationRepositoryError::query(message))?;
        Ok(newest_first(
            state
                .donations
                .iter()
                .filter(|donation| donation.status() == status),
            Donation::created_at,
        ))
    }

    async fn list_by_producer(
        &self,
        producer_id: &UserId,
    ) -> Result<Vec<Donation>, DonationRepositoryError> {
        let state = self.lock(|message| DonationRepositoryError::query(message))?;
        Ok(newest_first(
            state
                .donations
                .iter()
                .filter(|donation| donation.producer_id() == *producer_id),
            Donation::created_at,
        ))
    }

    async fn list_accepted_by(
        &self,
        cook_id: &UserId,
    ) -> Result<Vec<Donation>, DonationRepositoryError> {
        let state = self.lock(|message| DonationRepositoryError::query(message))?;
        Ok(newest_first(
            state
                .donations
                .iter()
                .filter(|donation| donation.state().cook_id() == Some(*cook_id)),
            |donation| donation.state().accepted_at(),
        ))
    }

    async fn producer_counts(
        &self,
        producer_id: &UserId,
    ) -> Result<DonationCounts, DonationRepositoryError> {
        let state = self.lock(|message| DonationRepositoryError::query(message))?;
        let own = |donation: &Donation| donation.producer_id() == *producer_id;
        Ok(DonationCounts {
            total: count(&state.donations, own),
            accepted: count(&state.donations, |donation| {
                own(donation) && donation.status() == DonationStatus::Accepted
            }),
            finalized: count(&state.donations, |donation| {
                own(donation) && donation.status() == DonationStatus::Finalized
            }),
        })
    }

    async fn count_accepted_by(&self, cook_id: &UserId) -> Result<u64, DonationRepositoryError> {
        let state = self.lock(|message| DonationRepositoryError::query(message))?;
        Ok(count(&state.donations, |donation| {
            donation.state().cook_id() == Some(*cook_id)
        }))
    }
}

#[async_trait]
impl DishRepository for InMemoryStore {
    async fn create_from_donation(
        &self,
        dish: &Dish,
        audit: &AuditEntry,
    ) -> Result<(), DishRepositoryError> {
        let mut state = self.lock(|message| DishRepositoryError::query(message))?;
        let donation_id = dish.donation_id();
        let donation = state
            .donations
            .iter_mut()
            .find(|donation| donation.id() == donation_id)
            .ok_or_else(|| DishRepositoryError::donation_missing(donation_id))?;
        if donation.state().cook_id() != Some(dish.cook_id()) {
            return Err(DishRepositoryError::donation_not_owned(donation_id));
        }
        donation
            .apply(&DonationTransition::Finalize {
                cook_id: dish.cook_id(),
            })
            .map_err(|err| match err {
                DonationTransitionError::WrongStatus { actual, .. } => {
                    DishRepositoryError::donation_not_accepted(donation_id, actual)
                }
                DonationTransitionError::CookMismatch => {
                    DishRepositoryError::donation_not_owned(donation_id)
                }
            })?;
        state.dishes.push(dish.clone());
        state.audit.push(audit.clone());
        Ok(())
    }

    async fn transition(
        &self,
        id: &DishId,
        transition: &DishTransition,
        audit: &AuditEntry,
    ) -> Result<Dish, DishRepositoryError> {
        let mut state = self.lock(|message| DishRepositoryError::query(message))?;
        let dish = state
            .dishes
            .iter_mut()
            .find(|dish| dish.id() == *id)
            .ok_or_else(|| DishRepositoryError::not_found(*id))?;
        dish.apply(transition)
            .map_err(|err| DishRepositoryError::status_conflict(err.expected, err.actual))?;
        let updated = dish.clone();
        state.audit.push(audit.clone());
        Ok(updated)
    }

    async fn find_by_id(&self, id: &DishId) -> Result<Option<Dish>, DishRepositoryError> {
        let state = self.lock(|message| DishRepositoryError::query(message))?;
        Ok(state.dishes.iter().find(|dish| dish.id() == *id).cloned())
    }

    async fn list_by_status(&self, status: DishStatus) -> Result<Vec<Dish>, DishRepositoryError> {
        let state = self.lock(|message| DishRepositoryError::query(message))?;
        Ok(newest_first(
            state.dishes.iter().filter(|dish| dish.status() == status),
            |dish| dish.state().ready_at(),
        ))
    }

    async fn list_by_cook(&self, cook_id: &UserId) -> Result<Vec<Dish>, DishRepositoryError> {
        let state = self.lock(|message| DishRepositoryError::query(message))?;
        Ok(newest_first(
            state.dishes.iter().filter(|dish| dish.cook_id() == *cook_id),
            Dish::created_at,
        ))
    }

    async fn list_distributed_by(
        &self,
        distributor_id: &UserId,
    ) -> Result<Vec<Dish>, DishRepositoryError> {
        let state = self.lock(|message| DishRepositoryError::query(message))?;
        Ok(newest_first(
            state
                .dishes
                .iter()
                .filter(|dish| dish.state().distributor_id() == Some(*distributor_id)),
            |dish| dish.state().distributed_at(),
        ))
    }

    async fn cook_counts(&self, cook_id: &UserId) -> Result<DishCounts, DishRepositoryError> {
        let state = self.lock(|message| DishRepositoryError::query(message))?;
        let own = |dish: &Dish| dish.cook_id() == *cook_id;
        Ok(DishCounts {
            created: count(&state.dishes, own),
            distributed: count(&state.dishes, |dish| {
                own(dish) && dish.status() == DishStatus::Distributed
            }),
        })
    }

    async fn count_distributed_by(
        &self,
        distributor_id: &UserId,
    ) -> Result<u64, DishRepositoryError> {
        let state = self.lock(|message| DishRepositoryError::query(message))?;
        Ok(count(&state.dishes, |dish| {
            dish.state().distributor_id() == Some(*distributor_id)
        }))
    }
}

#[async_trait]
impl AuditLogRepository for InMemoryStore {
    async fn history_for(
        &self,
        user_id: &UserId,
        limit: HistoryLimit,
    ) -> Result<Vec<AuditEntry>, AuditLogRepositoryError> {
        let state = self.lock(|message| AuditLogRepositoryError::query(message))?;
        let mut entries = newest_first(
            state.audit.iter().filter(|entry| entry.user_id == *user_id),
            |entry| entry.created_at,
        );
        entries.truncate(usize::try_from(limit.get()).unwrap_or(usize::MAX));
        Ok(entries)
    }
}
