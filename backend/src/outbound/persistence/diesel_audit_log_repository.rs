//! PostgreSQL-backed `AuditLogRepository` adapter.
//!
//! Entries are appended by the donation and dish adapters inside their own
//! transactions; this adapter only reads them back.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AuditLogRepository, AuditLogRepositoryError};
use crate::domain::{
    AuditAction, AuditEntityType, AuditEntry, AuditEntryId, HistoryLimit, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::AuditEntryRow;
use super::pool::{DbPool, PoolError};
use super::schema::transactions;

/// Diesel-backed implementation of the [`AuditLogRepository`] port.
#[derive(Clone)]
pub struct DieselAuditLogRepository {
    pool: DbPool,
}

impl DieselAuditLogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AuditLogRepositoryError {
    map_basic_pool_error(error, |message| AuditLogRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> AuditLogRepositoryError {
    map_basic_diesel_error(
        error,
        |message| AuditLogRepositoryError::query(message),
        |message| AuditLogRepositoryError::connection(message),
    )
}

impl TryFrom<AuditEntryRow> for AuditEntry {
    type Error = AuditLogRepositoryError;

    fn try_from(row: AuditEntryRow) -> Result<Self, Self::Error> {
        let action = AuditAction::from_str(&row.action).map_err(|err| {
            AuditLogRepositoryError::query(format!("invalid action in transactions row: {err}"))
        })?;
        let entity_type = AuditEntityType::from_str(&row.entity_type).map_err(|err| {
            AuditLogRepositoryError::query(format!(
                "invalid entity_type in transactions row: {err}"
            ))
        })?;
        Ok(Self {
            id: AuditEntryId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            action,
            entity_type,
            entity_id: row.entity_id,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl AuditLogRepository for DieselAuditLogRepository {
    async fn history_for(
        &self,
        user_id: &UserId,
        limit: HistoryLimit,
    ) -> Result<Vec<AuditEntry>, AuditLogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = transactions::table
            .filter(transactions::user_id.eq(user_id.as_uuid()))
            .order(transactions::created_at.desc())
            .limit(i64::from(limit.get()))
            .select(AuditEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(AuditEntry::try_from).collect()
    }
}
