//! Dashboard handlers: role-scoped statistics and the caller's audit trail.

use actix_web::{get, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{AuditEntry, DashboardStats, HistoryLimit};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::schemas::{DashboardStatsSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;

/// Optional page size for the history listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Entries to return; clamped to `1..=50`, default 50.
    #[param(minimum = 1, maximum = 50)]
    pub limit: Option<u32>,
}

impl HistoryQuery {
    fn limit(&self) -> HistoryLimit {
        self.limit.map(HistoryLimit::new).unwrap_or_default()
    }
}

/// One audit entry as shown to its actor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntryResponse {
    pub id: String,
    pub user_id: String,
    #[schema(example = "accepted")]
    pub action: String,
    #[schema(example = "donation")]
    pub entity_type: String,
    pub entity_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<AuditEntry> for HistoryEntryResponse {
    fn from(entry: AuditEntry) -> Self {
        Self {
            id: entry.id.to_string(),
            user_id: entry.user_id.to_string(),
            action: entry.action.as_str().to_owned(),
            entity_type: entry.entity_type.as_str().to_owned(),
            entity_id: entry.entity_id.to_string(),
            created_at: entry.created_at,
        }
    }
}

/// Counters for the caller's role.
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "Role-scoped statistics", body = DashboardStatsSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "dashboardStats"
)]
#[get("/dashboard/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
) -> ApiResult<web::Json<DashboardStats>> {
    let stats = state.dashboard.stats(auth.user_id()).await?;
    Ok(web::Json(stats))
}

/// The caller's most recent actions, newest first.
#[utoipa::path(
    get,
    path = "/api/dashboard/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Audit entries", body = [HistoryEntryResponse]),
        (status = 400, description = "Malformed limit", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "dashboardHistory"
)]
#[get("/dashboard/history")]
pub async fn history(
    state: web::Data<HttpState>,
    auth: AuthenticatedUser,
    query: web::Query<HistoryQuery>,
) -> ApiResult<web::Json<Vec<HistoryEntryResponse>>> {
    let entries = state.dashboard.history(auth.user_id(), query.limit()).await?;
    Ok(web::Json(
        entries.into_iter().map(HistoryEntryResponse::from).collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuditAction, AuditSubject, CookStats, DishCounts, DishId, Error, UserId};
    use crate::inbound::http::test_utils::{MockPorts, TOKEN, at, bearer, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn get_json(ports: MockPorts, uri: &str) -> (StatusCode, Value) {
        let app = actix_test::init_service(test_app(ports)).await;
        let request = actix_test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(TOKEN))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        (status, actix_test::read_body_json(response).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn stats_serialise_the_role_counters() {
        let cook = UserId::random();
        let mut ports = MockPorts::authorising(cook);
        ports
            .dashboard
            .expect_stats()
            .withf(move |actor| *actor == cook)
            .returning(|_| {
                Ok(DashboardStats::Cook(CookStats::new(
                    3,
                    DishCounts {
                        created: 2,
                        distributed: 1,
                    },
                )))
            });

        let (status, body) = get_json(ports, "/api/dashboard/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "acceptedDonations": 3,
                "dishesCreated": 2,
                "dishesDistributed": 1,
                "dishesAvailable": 1,
            })
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn stats_for_vanished_users_are_empty() {
        let mut ports = MockPorts::authorising(UserId::random());
        ports
            .dashboard
            .expect_stats()
            .returning(|_| Ok(DashboardStats::empty()));

        let (status, body) = get_json(ports, "/api/dashboard/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
    }

    #[rstest]
    #[case("/api/dashboard/history", 50)]
    #[case("/api/dashboard/history?limit=5", 5)]
    #[case("/api/dashboard/history?limit=0", 1)]
    #[case("/api/dashboard/history?limit=500", 50)]
    #[actix_web::test]
    async fn history_limit_is_clamped(#[case] uri: &str, #[case] expected: u32) {
        let distributor = UserId::random();
        let dish = DishId::random();
        let mut ports = MockPorts::authorising(distributor);
        ports
            .dashboard
            .expect_history()
            .withf(move |actor, limit| *actor == distributor && limit.get() == expected)
            .times(1)
            .returning(move |actor, _| {
                Ok(vec![AuditEntry::record(
                    *actor,
                    AuditAction::Distributed,
                    AuditSubject::Dish(dish),
                    at(12, 0),
                )])
            });

        let (status, body) = get_json(ports, uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["action"], "distributed");
        assert_eq!(body[0]["entityType"], "dish");
        assert_eq!(body[0]["entityId"], dish.to_string());
        assert_eq!(body[0]["userId"], distributor.to_string());
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_limits_are_invalid_requests() {
        let ports = MockPorts::authorising(UserId::random());

        let (status, body) = get_json(ports, "/api/dashboard/history?limit=-1").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
    }

    #[rstest]
    #[actix_web::test]
    async fn store_outages_are_service_unavailable() {
        let mut ports = MockPorts::authorising(UserId::random());
        ports
            .dashboard
            .expect_history()
            .returning(|_, _| Err(Error::service_unavailable("store unavailable")));

        let (status, body) = get_json(ports, "/api/dashboard/history").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "service_unavailable");
    }
}
