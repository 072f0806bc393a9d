//! Driving port for the per-user dashboard.

use async_trait::async_trait;

use crate::domain::{AuditEntry, DashboardStats, Error, HistoryLimit, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Statistics scoped by the actor's role; empty when the actor is gone.
    async fn stats(&self, actor: &UserId) -> Result<DashboardStats, Error>;

    /// The actor's audit entries, newest first.
    async fn history(&self, actor: &UserId, limit: HistoryLimit) -> Result<Vec<AuditEntry>, Error>;
}
