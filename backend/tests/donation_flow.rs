//! End-to-end flow: a donation travels from producer to cook to distributor.

mod support;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use serde_json::{Value, json};

use support::{Harness, Session, text};

async fn stats(harness: &Harness, session: &Session) -> Value {
    let (status, body) = harness
        .send_as(session, TestRequest::get().uri("/api/dashboard/stats"))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body
}

#[actix_web::test]
async fn donation_becomes_a_distributed_dish() {
    let harness = Harness::new();
    let producer = harness
        .register("padaria@example.com", "Padaria Sol", "producer")
        .await;
    let cook = harness
        .register("rita@example.com", "Chef Rita", "cook")
        .await;
    let distributor = harness
        .register("ana@example.com", "Ana Lima", "distributor")
        .await;

    let donation_id = harness.offer(&producer, "Bread", "10 loaves").await;

    let (status, available) = harness
        .send_as(&cook, TestRequest::get().uri("/api/donations"))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(available[0]["id"], donation_id.as_str());
    assert_eq!(available[0]["producerName"], "Padaria Sol");
    assert_eq!(available[0]["quantity"], "10 loaves");

    let accepted = harness.accept_donation(&cook, &donation_id).await;
    assert_eq!(accepted["status"], "accepted");
    assert_eq!(accepted["cookId"], cook.user_id.as_str());
    assert_eq!(accepted["cookName"], "Chef Rita");
    assert!(accepted["acceptedAt"].is_string());

    let dish_id = harness.cook(&cook, &donation_id, "Bread pudding").await;

    let (_, mine) = harness
        .send_as(
            &producer,
            TestRequest::get().uri("/api/donations/my-donations"),
        )
        .await;
    assert_eq!(mine[0]["status"], "finalized");

    let (_, ready) = harness
        .send_as(&distributor, TestRequest::get().uri("/api/dishes"))
        .await;
    assert_eq!(ready[0]["id"], dish_id.as_str());
    assert_eq!(ready[0]["status"], "ready");
    assert_eq!(ready[0]["donationId"], donation_id.as_str());

    let (status, distributed) = harness
        .send_as(
            &distributor,
            TestRequest::post().uri(&format!("/api/dishes/{dish_id}/accept")),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{distributed}");
    assert_eq!(distributed["status"], "distributed");
    assert_eq!(distributed["distributorId"], distributor.user_id.as_str());
    assert_eq!(distributed["distributorName"], "Ana Lima");

    let (status, history) = harness
        .send_as(
            &distributor,
            TestRequest::get().uri("/api/dashboard/history"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        history.as_array().map(Vec::len),
        Some(1),
        "distributor history: {history}"
    );
    assert_eq!(history[0]["action"], "distributed");
    assert_eq!(history[0]["entityType"], "dish");
    assert_eq!(history[0]["entityId"], dish_id.as_str());
}

#[actix_web::test]
async fn history_lists_the_callers_actions_newest_first() {
    let harness = Harness::new();
    let producer = harness
        .register("padaria@example.com", "Padaria Sol", "producer")
        .await;
    let cook = harness
        .register("rita@example.com", "Chef Rita", "cook")
        .await;
    let donation_id = harness.offer(&producer, "Rice", "5 kg").await;
    harness.accept_donation(&cook, &donation_id).await;
    let dish_id = harness.cook(&cook, &donation_id, "Rice and beans").await;

    let (_, history) = harness
        .send_as(&cook, TestRequest::get().uri("/api/dashboard/history"))
        .await;
    let entries: Vec<(String, String, String)> = history
        .as_array()
        .expect("history array")
        .iter()
        .map(|entry| {
            (
                text(entry, "action"),
                text(entry, "entityType"),
                text(entry, "entityId"),
            )
        })
        .collect();
    assert_eq!(
        entries,
        vec![
            ("created".to_owned(), "dish".to_owned(), dish_id),
            ("accepted".to_owned(), "donation".to_owned(), donation_id),
        ]
    );

    let (_, limited) = harness
        .send_as(
            &cook,
            TestRequest::get().uri("/api/dashboard/history?limit=1"),
        )
        .await;
    assert_eq!(limited.as_array().map(Vec::len), Some(1));
    assert_eq!(limited[0]["action"], "created");
}

#[actix_web::test]
async fn dashboard_counts_follow_the_flow() {
    let harness = Harness::new();
    let producer = harness
        .register("padaria@example.com", "Padaria Sol", "producer")
        .await;
    let cook = harness
        .register("rita@example.com", "Chef Rita", "cook")
        .await;
    let distributor = harness
        .register("ana@example.com", "Ana Lima", "distributor")
        .await;

    let bread = harness.offer(&producer, "Bread", "10 loaves").await;
    let _rice = harness.offer(&producer, "Rice", "5 kg").await;
    let beans = harness.offer(&producer, "Beans", "3 kg").await;
    harness.accept_donation(&cook, &bread).await;
    harness.accept_donation(&cook, &beans).await;
    let pudding = harness.cook(&cook, &bread, "Bread pudding").await;
    let (status, _) = harness
        .send_as(
            &distributor,
            TestRequest::post().uri(&format!("/api/dishes/{pudding}/accept")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(
        stats(&harness, &producer).await,
        json!({
            "totalDonations": 3,
            "acceptedDonations": 1,
            "finalizedDonations": 1,
            "availableDonations": 1,
        })
    );
    assert_eq!(
        stats(&harness, &cook).await,
        json!({
            "acceptedDonations": 2,
            "dishesCreated": 1,
            "dishesDistributed": 1,
            "dishesAvailable": 0,
        })
    );
    assert_eq!(
        stats(&harness, &distributor).await,
        json!({ "dishesDistributed": 1 })
    );
}

#[actix_web::test]
async fn listings_only_show_the_requested_status() {
    let harness = Harness::new();
    let producer = harness
        .register("padaria@example.com", "Padaria Sol", "producer")
        .await;
    let cook = harness
        .register("rita@example.com", "Chef Rita", "cook")
        .await;
    let first = harness.offer(&producer, "Bread", "10 loaves").await;
    let second = harness.offer(&producer, "Rice", "5 kg").await;
    harness.accept_donation(&cook, &first).await;

    let ids = |body: &Value| -> Vec<String> {
        body.as_array()
            .expect("array")
            .iter()
            .map(|item| text(item, "id"))
            .collect()
    };

    let (_, available) = harness
        .send_as(&cook, TestRequest::get().uri("/api/donations"))
        .await;
    assert_eq!(ids(&available), vec![second]);

    let (_, accepted) = harness
        .send_as(
            &cook,
            TestRequest::get().uri("/api/donations?status=accepted"),
        )
        .await;
    assert_eq!(ids(&accepted), vec![first.clone()]);

    let (_, mine) = harness
        .send_as(&cook, TestRequest::get().uri("/api/donations/accepted"))
        .await;
    assert_eq!(ids(&mine), vec![first]);
}
