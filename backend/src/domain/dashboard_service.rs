//! Dashboard service: role-scoped statistics and audit history.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    AuditLogRepository, AuditLogRepositoryError, DashboardQuery, DishRepository,
    DishRepositoryError, DonationRepository, DonationRepositoryError, UserRepository,
};
use crate::domain::service_support::map_user_repository_error;
use crate::domain::{
    AuditEntry, CookStats, DashboardStats, DistributorStats, Error, HistoryLimit, ProducerStats,
    Role, UserId,
};

fn map_donation_read_error(error: DonationRepositoryError) -> Error {
    match error {
        DonationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("donation repository unavailable: {message}"))
        }
        other => Error::internal(format!("donation statistics failed: {other}")),
    }
}

fn map_dish_read_error(error: DishRepositoryError) -> Error {
    match error {
        DishRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("dish repository unavailable: {message}"))
        }
        other => Error::internal(format!("dish statistics failed: {other}")),
    }
}

fn map_audit_error(error: AuditLogRepositoryError) -> Error {
    match error {
        AuditLogRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("audit log unavailable: {message}"))
        }
        AuditLogRepositoryError::Query { message } => {
            Error::internal(format!("audit log error: {message}"))
        }
    }
}

/// Read-only service implementing [`DashboardQuery`].
#[derive(Clone)]
pub struct DashboardService<U, D, Di, A> {
    users: Arc<U>,
    donations: Arc<D>,
    dishes: Arc<Di>,
    audit: Arc<A>,
}

impl<U, D, Di, A> DashboardService<U, D, Di, A> {
    pub fn new(users: Arc<U>, donations: Arc<D>, dishes: Arc<Di>, audit: Arc<A>) -> Self {
        Self {
            users,
            donations,
            dishes,
            audit,
        }
    }
}

#[async_trait]
impl<U, D, Di, A> DashboardQuery for DashboardService<U, D, Di, A>
where
    U: UserRepository,
    D: DonationRepository,
    Di: DishRepository,
    A: AuditLogRepository,
{
    async fn stats(&self, actor: &UserId) -> Result<DashboardStats, Error> {
        let Some(user) = self
            .users
            .find_by_id(actor)
            .await
            .map_err(map_user_repository_error)?
        else {
            return Ok(DashboardStats::empty());
        };

        let stats = match user.role() {
            Role::Producer => {
                let counts = self
                    .donations
                    .producer_counts(actor)
                    .await
                    .map_err(map_donation_read_error)?;
                DashboardStats::Producer(ProducerStats::from(counts))
            }
            Role::Cook => {
                let accepted = self
                    .donations
                    .count_accepted_by(actor)
                    .await
                    .map_err(map_donation_read_error)?;
                let dishes = self
                    .dishes
                    .cook_counts(actor)
                    .await
                    .map_err(map_dish_read_error)?;
                DashboardStats::Cook(CookStats::new(accepted, dishes))
            }
            Role::Distributor => {
                let dishes_distributed = self
                    .dishes
                    .count_distributed_by(actor)
                    .await
                    .map_err(map_dish_read_error)?;
                DashboardStats::Distributor(DistributorStats { dishes_distributed })
            }
        };
        Ok(stats)
    }

    async fn history(&self, actor: &UserId, limit: HistoryLimit) -> Result<Vec<AuditEntry>, Error> {
        self.audit
            .history_for(actor, limit)
            .await
            .map_err(map_audit_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockAuditLogRepository, MockDishRepository, MockDonationRepository, MockUserRepository,
    };
    use crate::domain::{DishCounts, DonationCounts, EmailAddress, ErrorCode, User};
    use crate::test_support::fixtures::profile;
    use chrono::Utc;
    use rstest::rstest;

    type Service = DashboardService<
        MockUserRepository,
        MockDonationRepository,
        MockDishRepository,
        MockAuditLogRepository,
    >;

    fn users_returning(role: Option<Role>) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |id| {
            Ok(role.map(|role| {
                User::new(
                    *id,
                    EmailAddress::new("someone@example.com").expect("email"),
                    profile("Someone"),
                    role,
                    Utc::now(),
                )
            }))
        });
        users
    }

    fn service(
        users: MockUserRepository,
        donations: MockDonationRepository,
        dishes: MockDishRepository,
        audit: MockAuditLogRepository,
    ) -> Service {
        DashboardService::new(
            Arc::new(users),
            Arc::new(donations),
            Arc::new(dishes),
            Arc::new(audit),
        )
    }

    #[tokio::test]
    async fn producer_stats_count_own_donations() {
        let mut donations = MockDonationRepository::new();
        donations.expect_producer_counts().return_once(|_| {
            Ok(DonationCounts {
                total: 4,
                accepted: 1,
                finalized: 1,
            })
        });

        let stats = service(
            users_returning(Some(Role::Producer)),
            donations,
            MockDishRepository::new(),
            MockAuditLogRepository::new(),
        )
        .stats(&UserId::random())
        .await
        .expect("stats");

        let DashboardStats::Producer(producer) = stats else {
            panic!("expected producer stats, got {stats:?}");
        };
        assert_eq!(producer.available_donations, 2);
    }

    #[tokio::test]
    async fn cook_stats_combine_donations_and_dishes() {
        let mut donations = MockDonationRepository::new();
        donations.expect_count_accepted_by().return_once(|_| Ok(3));
        let mut dishes = MockDishRepository::new();
        dishes.expect_cook_counts().return_once(|_| {
            Ok(DishCounts {
                created: 2,
                distributed: 1,
            })
        });

        let stats = service(
            users_returning(Some(Role::Cook)),
            donations,
            dishes,
            MockAuditLogRepository::new(),
        )
        .stats(&UserId::random())
        .await
        .expect("stats");

        assert_eq!(
            stats,
            DashboardStats::Cook(CookStats {
                accepted_donations: 3,
                dishes_created: 2,
                dishes_distributed: 1,
                dishes_available: 1,
            })
        );
    }

    #[tokio::test]
    async fn distributor_stats_count_distributions() {
        let mut dishes = MockDishRepository::new();
        dishes.expect_count_distributed_by().return_once(|_| Ok(5));
        let stats = service(
            users_returning(Some(Role::Distributor)),
            MockDonationRepository::new(),
            dishes,
            MockAuditLogRepository::new(),
        )
        .stats(&UserId::random())
        .await
        .expect("stats");
        assert_eq!(
            stats,
            DashboardStats::Distributor(DistributorStats {
                dishes_distributed: 5
            })
        );
    }

    #[tokio::test]
    async fn missing_user_gets_empty_stats() {
        let stats = service(
            users_returning(None),
            MockDonationRepository::new(),
            MockDishRepository::new(),
            MockAuditLogRepository::new(),
        )
        .stats(&UserId::random())
        .await
        .expect("stats");
        assert_eq!(stats, DashboardStats::empty());
    }

    #[rstest]
    #[case(AuditLogRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
    #[case(AuditLogRepositoryError::query("bad"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn history_maps_audit_failures(
        #[case] failure: AuditLogRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut audit = MockAuditLogRepository::new();
        audit
            .expect_history_for()
            .return_once(move |_, _| Err(failure));
        let err = service(
            MockUserRepository::new(),
            MockDonationRepository::new(),
            MockDishRepository::new(),
            audit,
        )
        .history(&UserId::random(), HistoryLimit::default())
        .await
        .expect_err("audit failure");
        assert_eq!(err.code(), expected);
    }

    #[tokio::test]
    async fn history_passes_limit_through() {
        let mut audit = MockAuditLogRepository::new();
        audit
            .expect_history_for()
            .withf(|_, limit| limit.get() == 10)
            .times(1)
            .return_once(|_, _| Ok(Vec::new()));
        let entries = service(
            MockUserRepository::new(),
            MockDonationRepository::new(),
            MockDishRepository::new(),
            audit,
        )
        .history(&UserId::random(), HistoryLimit::new(10))
        .await
        .expect("history");
        assert!(entries.is_empty());
    }
}
