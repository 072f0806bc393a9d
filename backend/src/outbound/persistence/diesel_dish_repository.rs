//! PostgreSQL-backed `DishRepository` adapter.
//!
//! Creating a dish locks the source donation, finalizes it with a
//! compare-and-set from `accepted`, inserts the dish and appends the audit
//! entry in one transaction.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{DishRepository, DishRepositoryError};
use crate::domain::{
    AuditEntry, Description, Dish, DishContent, DishCounts, DishId, DishState, DishStatus,
    DishTransition, DonationId, DonationStatus, DonationTransition, DonationTransitionError,
    Title, UserId,
};

use super::diesel_basic_error_mapping::{
    TransactionFailure, count_from_sql, is_unique_violation, map_basic_diesel_error,
    map_basic_pool_error,
};
use super::diesel_donation_repository::row_to_donation;
use super::models::{
    DishRow, DishStateChange, DonationRow, DonationStateChange, NewAuditEntryRow, NewDishRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{dishes, donations, transactions};

const DONATION_CONSTRAINT: &str = "dishes_donation_id_key";

/// Diesel-backed implementation of the [`DishRepository`] port.
#[derive(Clone)]
pub struct DieselDishRepository {
    pool: DbPool,
}

impl DieselDishRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DishRepositoryError {
    map_basic_pool_error(error, |message| DishRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> DishRepositoryError {
    map_basic_diesel_error(
        error,
        |message| DishRepositoryError::query(message),
        |message| DishRepositoryError::connection(message),
    )
}

fn corrupt(field: &str, err: impl std::fmt::Display) -> DishRepositoryError {
    DishRepositoryError::query(format!("invalid {field} in dishes row: {err}"))
}

fn row_to_dish(row: DishRow) -> Result<Dish, DishRepositoryError> {
    let status = DishStatus::from_str(&row.status).map_err(|err| corrupt("status", err))?;
    let state = DishState::from_parts(
        status,
        row.ready_at,
        row.distributor_id.map(UserId::from_uuid),
        row.distributed_at,
    )
    .map_err(|err| corrupt("state", err))?;
    let content = DishContent {
        title: Title::new(&row.title).map_err(|err| corrupt("title", err))?,
        description: Description::new(&row.description)
            .map_err(|err| corrupt("description", err))?,
    };
    Ok(Dish::from_parts(
        DishId::from_uuid(row.id),
        UserId::from_uuid(row.cook_id),
        DonationId::from_uuid(row.donation_id),
        content,
        state,
        row.created_at,
    ))
}

fn rows_to_dishes(rows: Vec<DishRow>) -> Result<Vec<Dish>, DishRepositoryError> {
    rows.into_iter().map(row_to_dish).collect()
}

fn state_change(state: &DishState) -> DishStateChange<'static> {
    DishStateChange {
        status: state.status().as_str(),
        ready_at: state.ready_at(),
        distributor_id: state.distributor_id().map(|id| *id.as_uuid()),
        distributed_at: state.distributed_at(),
    }
}

/// Map a rejected `Finalize` on the source donation.
fn finalize_rejected(donation_id: DonationId, error: DonationTransitionError) -> DishRepositoryError {
    match error {
        DonationTransitionError::WrongStatus { actual, .. } => {
            DishRepositoryError::donation_not_accepted(donation_id, actual)
        }
        DonationTransitionError::CookMismatch => DishRepositoryError::donation_not_owned(donation_id),
    }
}

type Failure = TransactionFailure<DishRepositoryError>;

#[async_trait]
impl DishRepository for DieselDishRepository {
    async fn create_from_donation(
        &self,
        dish: &Dish,
        audit: &AuditEntry,
    ) -> Result<(), DishRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let donation_id = dish.donation_id();
        let cook_id = dish.cook_id();
        let content = dish.content();
        let change = state_change(&dish.state());
        let dish_row = NewDishRow {
            id: *dish.id().as_uuid(),
            cook_id: *cook_id.as_uuid(),
            donation_id: *donation_id.as_uuid(),
            title: content.title.as_str(),
            description: content.description.as_str(),
            status: change.status,
            ready_at: change.ready_at,
            distributor_id: change.distributor_id,
            distributed_at: change.distributed_at,
            created_at: dish.created_at(),
        };
        let audit_row = NewAuditEntryRow::from(audit);

        conn.transaction(|conn| {
            async move {
                let row: Option<DonationRow> = donations::table
                    .filter(donations::id.eq(donation_id.as_uuid()))
                    .select(DonationRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(row) = row else {
                    return Err(Failure::Rejected(DishRepositoryError::donation_missing(
                        donation_id,
                    )));
                };
                let mut donation = row_to_donation(row)
                    .map_err(|err| Failure::Rejected(DishRepositoryError::query(err.to_string())))?;
                if donation.state().cook_id() != Some(cook_id) {
                    return Err(Failure::Rejected(DishRepositoryError::donation_not_owned(
                        donation_id,
                    )));
                }
                donation
                    .apply(&DonationTransition::Finalize { cook_id })
                    .map_err(|err| Failure::Rejected(finalize_rejected(donation_id, err)))?;

                let finalized = diesel::update(
                    donations::table
                        .filter(donations::id.eq(donation_id.as_uuid()))
                        .filter(donations::status.eq(DonationStatus::Accepted.as_str())),
                )
                .set(DonationStateChange {
                    status: donation.status().as_str(),
                    cook_id: donation.state().cook_id().map(|id| *id.as_uuid()),
                    accepted_at: donation.state().accepted_at(),
                })
                .execute(conn)
                .await?;
                if finalized == 0 {
                    debug!(donation_id = %donation_id, "donation changed between lock and update");
                    return Err(Failure::Rejected(DishRepositoryError::donation_not_accepted(
                        donation_id,
                        DonationStatus::Finalized,
                    )));
                }

                diesel::insert_into(dishes::table)
                    .values(&dish_row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(transactions::table)
                    .values(&audit_row)
                    .execute(conn)
                    .await?;
                Ok::<_, Failure>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|failure| {
            failure.into_port_error(|err| {
                if is_unique_violation(&err, DONATION_CONSTRAINT) {
                    DishRepositoryError::donation_not_accepted(
                        donation_id,
                        DonationStatus::Finalized,
                    )
                } else {
                    map_diesel_error(err)
                }
            })
        })
    }

    async fn transition(
        &self,
        id: &DishId,
        transition: &DishTransition,
        audit: &AuditEntry,
    ) -> Result<Dish, DishRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *id;
        let transition = *transition;
        let audit_row = NewAuditEntryRow::from(audit);

        conn.transaction(|conn| {
            async move {
                let row: Option<DishRow> = dishes::table
                    .filter(dishes::id.eq(id.as_uuid()))
                    .select(DishRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let Some(row) = row else {
                    return Err(Failure::Rejected(DishRepositoryError::not_found(id)));
                };
                let mut dish = row_to_dish(row).map_err(Failure::Rejected)?;
                dish.apply(&transition).map_err(|err| {
                    Failure::Rejected(DishRepositoryError::status_conflict(
                        err.expected,
                        err.actual,
                    ))
                })?;

                let updated = diesel::update(
                    dishes::table
                        .filter(dishes::id.eq(id.as_uuid()))
                        .filter(dishes::status.eq(transition.expected_prior().as_str())),
                )
                .set(state_change(&dish.state()))
                .execute(conn)
                .await?;
                if updated == 0 {
                    debug!(dish_id = %id, "dish changed between lock and update");
                    let current: String = dishes::table
                        .filter(dishes::id.eq(id.as_uuid()))
                        .select(dishes::status)
                        .first(conn)
                        .await?;
                    let actual = DishStatus::from_str(&current)
                        .map_err(|err| Failure::Rejected(corrupt("status", err)))?;
                    return Err(Failure::Rejected(DishRepositoryError::status_conflict(
                        transition.expected_prior(),
                        actual,
                    )));
                }

                diesel::insert_into(transactions::table)
                    .values(&audit_row)
                    .execute(conn)
                    .await?;
                Ok::<_, Failure>(dish)
            }
            .scope_boxed()
        })
        .await
        .map_err(|failure| failure.into_port_error(map_diesel_error))
    }

    async fn find_by_id(&self, id: &DishId) -> Result<Option<Dish>, DishRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = dishes::table
            .filter(dishes::id.eq(id.as_uuid()))
            .select(DishRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_dish).transpose()
    }

    async fn list_by_status(&self, status: DishStatus) -> Result<Vec<Dish>, DishRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = dishes::table
            .filter(dishes::status.eq(status.as_str()))
            .order(dishes::ready_at.desc())
            .select(DishRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_dishes(rows)
    }

    async fn list_by_cook(&self, cook_id: &UserId) -> Result<Vec<Dish>, DishRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = dishes::table
            .filter(dishes::cook_id.eq(cook_id.as_uuid()))
            .order(dishes::created_at.desc())
            .select(DishRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_dishes(rows)
    }

    async fn list_distributed_by(
        &self,
        distributor_id: &UserId,
    ) -> Result<Vec<Dish>, DishRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = dishes::table
            .filter(dishes::distributor_id.eq(distributor_id.as_uuid()))
            .order(dishes::distributed_at.desc())
            .select(DishRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_dishes(rows)
    }

    async fn cook_counts(&self, cook_id: &UserId) -> Result<DishCounts, DishRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let grouped: Vec<(String, i64)> = dishes::table
            .filter(dishes::cook_id.eq(cook_id.as_uuid()))
            .group_by(dishes::status)
            .select((dishes::status, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        grouped
            .into_iter()
            .try_fold(DishCounts::default(), |mut counts, (status, count)| {
                let count = count_from_sql(count, |message| DishRepositoryError::query(message))?;
                counts.created += count;
                if DishStatus::from_str(&status).map_err(|err| corrupt("status", err))?
                    == DishStatus::Distributed
                {
                    counts.distributed += count;
                }
                Ok(counts)
            })
    }

    async fn count_distributed_by(
        &self,
        distributor_id: &UserId,
    ) -> Result<u64, DishRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = dishes::table
            .filter(dishes::distributor_id.eq(distributor_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        count_from_sql(count, |message| DishRepositoryError::query(message))
    }
}
