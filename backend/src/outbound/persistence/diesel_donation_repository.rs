//! PostgreSQL-backed `DonationRepository` adapter.
//!
//! Transitions lock the donation row, apply the domain state machine, write
//! the new state with a compare-and-set on the prior status and append the
//! audit entry, all inside one transaction.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{DonationRepository, DonationRepositoryError};
use crate::domain::{
    AuditEntry, Description, Donation, DonationContent, DonationCounts, DonationId, DonationState,
    DonationStatus, DonationTransition, DonationTransitionError, Quantity, Title, UserId,
};

use super::diesel_basic_error_mapping::{
    TransactionFailure, count_from_sql, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{DonationRow, DonationStateChange, NewAuditEntryRow, NewDonationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{donations, transactions};

/// Diesel-backed implementation of the [`DonationRepository`] port.
#[derive(Clone)]
pub struct DieselDonationRepository {
    pool: DbPool,
}

impl DieselDonationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DonationRepositoryError {
    map_basic_pool_error(error, |message| DonationRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> DonationRepositoryError {
    map_basic_diesel_error(
        error,
        |message| DonationRepositoryError::query(message),
        |message| DonationRepositoryError::connection(message),
    )
}

fn corrupt(field: &str, err: impl std::fmt::Display) -> DonationRepositoryError {
    DonationRepositoryError::query(format!("invalid {field} in donations row: {err}"))
}

pub(super) fn row_to_donation(row: DonationRow) -> Result<Donation, DonationRepositoryError> {
    let status = DonationStatus::from_str(&row.status).map_err(|err| corrupt("status", err))?;
    let state = DonationState::from_parts(status, row.cook_id.map(UserId::from_uuid), row.accepted_at)
        .map_err(|err| corrupt("state", err))?;
    let content = DonationContent {
        title: Title::new(&row.title).map_err(|err| corrupt("title", err))?,
        description: Description::new(&row.description)
            .map_err(|err| corrupt("description", err))?,
        quantity: Quantity::new(&row.quantity).map_err(|err| corrupt("quantity", err))?,
    };
    Ok(Donation::from_parts(
        DonationId::from_uuid(row.id),
        UserId::from_uuid(row.producer_id),
        content,
        state,
        row.created_at,
    ))
}

fn rows_to_donations(rows: Vec<DonationRow>) -> Result<Vec<Donation>, DonationRepositoryError> {
    rows.into_iter().map(row_to_donation).collect()
}

fn state_change(state: &DonationState) -> DonationStateChange<'static> {
    DonationStateChange {
        status: state.status().as_str(),
        cook_id: state.cook_id().map(|id| *id.as_uuid()),
        accepted_at: state.accepted_at(),
    }
}

fn rejected(id: DonationId, error: DonationTransitionError) -> DonationRepositoryError {
    match error {
        DonationTransitionError::WrongStatus { expected, actual } => {
            DonationRepositoryError::status_conflict(expected, actual)
        }
        DonationTransitionError::CookMismatch => DonationRepositoryError::cook_mismatch(id),
    }
}

#[async_trait]
impl DonationRepository for DieselDonationRepository {
    async fn create(
        &self,
        donation: &Donation,
        audit: &AuditEntry,
    ) -> Result<(), DonationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let content = donation.content();
        let change = state_change(&donation.state());
        let row = NewDonationRow {
            id: *donation.id().as_uuid(),
            producer_id: *donation.producer_id().as_uuid(),
            title: content.title.as_str(),
            description: content.description.as_str(),
            quantity: content.quantity.as_str(),
            status: change.status,
            cook_id: change.cook_id,
            accepted_at: change.accepted_at,
            created_at: donation.created_at(),
        };
        let audit_row = NewAuditEntryRow::from(audit);

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(donations::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                diesel::insert_into(transactions::table)
                    .values(&audit_row)
                    .execute(conn)
                    .await?;
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn transition(
        &self,
        id: &DonationId,
        transition: &DonationTransition,
        audit: &AuditEntry,
    ) -> Result<Donation, DonationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *id;
        let transition = *transition;
        let audit_row = NewAuditEntryRow::from(audit);

        conn.transaction(|conn| {
            async move {
                let row: Option<DonationRow> = donations::table
                    .filter(donations::id.eq(id.as_uuid()))
                    .select(DonationRow::as_select())
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;
                let mut donation = row
                    .ok_or_else(|| {
                        TransactionFailure::Rejected(DonationRepositoryError::not_found(id))
                    })
                    .and_then(|row| row_to_donation(row).map_err(TransactionFailure::Rejected))?;

                donation
                    .apply(&transition)
                    .map_err(|err| TransactionFailure::Rejected(rejected(id, err)))?;

                let updated = diesel::update(
                    donations::table
                        .filter(donations::id.eq(id.as_uuid()))
                        .filter(donations::status.eq(transition.expected_prior().as_str())),
                )
                .set(state_change(&donation.state()))
                .execute(conn)
                .await?;
                if updated == 0 {
                    debug!(donation_id = %id, "donation changed between lock and update");
                    let current: String = donations::table
                        .filter(donations::id.eq(id.as_uuid()))
                        .select(donations::status)
                        .first(conn)
                        .await?;
                    let actual = DonationStatus::from_str(&current)
                        .map_err(|err| TransactionFailure::Rejected(corrupt("status", err)))?;
                    return Err(TransactionFailure::Rejected(
                        DonationRepositoryError::status_conflict(transition.expected_prior(), actual),
                    ));
                }

                diesel::insert_into(transactions::table)
                    .values(&audit_row)
                    .execute(conn)
                    .await?;
                Ok::<_, TransactionFailure<DonationRepositoryError>>(donation)
            }
            .scope_boxed()
        })
        .await
        .map_err(|failure| failure.into_port_error(map_diesel_error))
    }

    async fn find_by_id(
        &self,
        id: &DonationId,
    ) -> Result<Option<Donation>, DonationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = donations::table
            .filter(donations::id.eq(id.as_uuid()))
            .select(DonationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_donation).transpose()
    }

    async fn list_by_status(
        &self,
        status: DonationStatus,
    ) -> Result<Vec<Donation>, DonationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = donations::table
            .filter(donations::status.eq(status.as_str()))
            .order(donations::created_at.desc())
            .select(DonationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_donations(rows)
    }

    async fn list_by_producer(
        &self,
        producer_id: &UserId,
    ) -> Result<Vec<Donation>, DonationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = donations::table
            .filter(donations::producer_id.eq(producer_id.as_uuid()))
            .order(donations::created_at.desc())
            .select(DonationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_donations(rows)
    }

    async fn list_accepted_by(
        &self,
        cook_id: &UserId,
    ) -> Result<Vec<Donation>, DonationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = donations::table
            .filter(donations::cook_id.eq(cook_id.as_uuid()))
            .order(donations::accepted_at.desc())
            .select(DonationRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows_to_donations(rows)
    }

    async fn producer_counts(
        &self,
        producer_id: &UserId,
    ) -> Result<DonationCounts, DonationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let grouped: Vec<(String, i64)> = donations::table
            .filter(donations::producer_id.eq(producer_id.as_uuid()))
            .group_by(donations::status)
            .select((donations::status, diesel::dsl::count_star()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        grouped
            .into_iter()
            .try_fold(DonationCounts::default(), |mut counts, (status, count)| {
                let count = count_from_sql(count, |message| {
                    DonationRepositoryError::query(message)
                })?;
                counts.total += count;
                match DonationStatus::from_str(&status).map_err(|err| corrupt("status", err))? {
                    DonationStatus::Available => {}
                    DonationStatus::Accepted => counts.accepted += count,
                    DonationStatus::Finalized => counts.finalized += count,
                }
                Ok(counts)
            })
    }

    async fn count_accepted_by(&self, cook_id: &UserId) -> Result<u64, DonationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = donations::table
            .filter(donations::cook_id.eq(cook_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        count_from_sql(count, |message| DonationRepositoryError::query(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(status: &str, cook_id: Option<Uuid>) -> DonationRow {
        DonationRow {
            id: Uuid::new_v4(),
            producer_id: Uuid::new_v4(),
            title: "Bread".to_owned(),
            description: "Day-old sourdough".to_owned(),
            quantity: "10 loaves".to_owned(),
            status: status.to_owned(),
            cook_id,
            accepted_at: cook_id.map(|_| Utc::now()),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn accepted_rows_carry_their_cook() {
        let cook = Uuid::new_v4();
        let donation = row_to_donation(row("accepted", Some(cook))).expect("valid row");
        assert_eq!(donation.status(), DonationStatus::Accepted);
        assert_eq!(donation.state().cook_id(), Some(UserId::from_uuid(cook)));
    }

    #[rstest]
    #[case::unknown_status(row("expired", None))]
    #[case::accepted_without_cook(row("accepted", None))]
    #[case::available_with_cook(row("available", Some(Uuid::new_v4())))]
    fn inconsistent_rows_are_query_errors(#[case] source: DonationRow) {
        let err = row_to_donation(source).expect_err("corrupt row");
        assert!(matches!(err, DonationRepositoryError::Query { .. }));
    }

    #[rstest]
    fn state_change_clears_acceptance_for_available() {
        let change = state_change(&DonationState::Available);
        assert_eq!(change.status, "available");
        assert_eq!(change.cook_id, None);
        assert_eq!(change.accepted_at, None);
    }

    #[rstest]
    fn transition_rejections_map_to_port_errors() {
        let id = DonationId::random();
        assert_eq!(
            rejected(
                id,
                DonationTransitionError::WrongStatus {
                    expected: DonationStatus::Available,
                    actual: DonationStatus::Finalized,
                }
            ),
            DonationRepositoryError::status_conflict(
                DonationStatus::Available,
                DonationStatus::Finalized
            )
        );
        assert_eq!(
            rejected(id, DonationTransitionError::CookMismatch),
            DonationRepositoryError::cook_mismatch(id)
        );
    }
}
