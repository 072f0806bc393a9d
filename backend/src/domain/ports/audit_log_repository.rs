//! Port for reading the audit log.
//!
//! Entries are appended by the donation and dish repositories inside their
//! own mutations, so this port only reads.

use async_trait::async_trait;

use crate::domain::{AuditEntry, HistoryLimit, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by audit log adapters.
    pub enum AuditLogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "audit log connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "audit log query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditLogRepository: Send + Sync {
    /// Entries recorded for `user_id`, newest first, at most `limit`.
    async fn history_for(
        &self,
        user_id: &UserId,
        limit: HistoryLimit,
    ) -> Result<Vec<AuditEntry>, AuditLogRepositoryError>;
}
