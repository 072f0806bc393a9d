//! Tests for donation handlers.

use super::*;
use crate::domain::{DisplayName, Donation, Role, UserId};
use crate::inbound::http::test_utils::{MockPorts, TOKEN, at, bearer, test_app};
use crate::test_support::fixtures::donation_content;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

fn name(raw: &str) -> Option<DisplayName> {
    DisplayName::new(raw).ok()
}

fn available_view(producer: UserId) -> DonationView {
    DonationView {
        donation: Donation::offer(
            DonationId::random(),
            producer,
            donation_content("Bread", "10 loaves"),
            at(9, 0),
        ),
        producer_name: name("Padaria Sol"),
        cook_name: None,
    }
}

fn accepted_view(producer: UserId, cook: UserId) -> DonationView {
    DonationView {
        donation: Donation::from_parts(
            DonationId::random(),
            producer,
            donation_content("Bread", "10 loaves"),
            DonationState::Accepted {
                cook_id: cook,
                accepted_at: at(9, 30),
            },
            at(9, 0),
        ),
        producer_name: name("Padaria Sol"),
        cook_name: name("Chef Rita"),
    }
}

async fn send(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports)).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    (status, actix_test::read_body_json(response).await)
}

fn get(uri: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::get()
        .uri(uri)
        .insert_header(bearer(TOKEN))
}

fn post(uri: &str) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri(uri)
        .insert_header(bearer(TOKEN))
}

#[rstest]
#[case("/api/donations", DonationStatus::Available)]
#[case("/api/donations?status=available", DonationStatus::Available)]
#[case("/api/donations?status=accepted", DonationStatus::Accepted)]
#[case("/api/donations?status=finalized", DonationStatus::Finalized)]
#[actix_web::test]
async fn listing_filters_by_status(#[case] uri: &str, #[case] expected: DonationStatus) {
    let producer = UserId::random();
    let mut ports = MockPorts::authorising(UserId::random());
    ports
        .donations_query
        .expect_list_by_status()
        .withf(move |status| *status == expected)
        .times(1)
        .returning(move |_| Ok(vec![available_view(producer)]));

    let (status, body) = send(ports, get(uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["producerId"], producer.to_string());
    assert_eq!(body[0]["producerName"], "Padaria Sol");
    assert_eq!(body[0]["status"], "available");
    assert_eq!(body[0]["cookId"], Value::Null);
}

#[rstest]
#[actix_web::test]
async fn unknown_status_filters_are_rejected() {
    let ports = MockPorts::authorising(UserId::random());

    let (status, body) = send(ports, get("/api/donations?status=cancelled")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "status");
    assert_eq!(body["details"]["value"], "cancelled");
}

#[rstest]
#[actix_web::test]
async fn listing_requires_a_token() {
    let request = actix_test::TestRequest::get().uri("/api/donations");

    let (status, body) = send(MockPorts::default(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn create_returns_the_new_donation() {
    let producer = UserId::random();
    let mut ports = MockPorts::acting_as(producer, Role::Producer);
    ports
        .donations
        .expect_create()
        .withf(move |actor, content| {
            *actor == producer
                && content.title.as_str() == "Bread"
                && content.quantity.as_str() == "10 loaves"
        })
        .times(1)
        .returning(move |_, _| Ok(available_view(producer)));
    let body = json!({
        "title": "  Bread ",
        "description": "Whole-grain loaves",
        "quantity": "10 loaves",
    });

    let (status, response) = send(ports, post("/api/donations").set_json(&body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["title"], "Bread");
    assert_eq!(response["status"], "available");
}

#[rstest]
#[case(json!({"title": "", "description": "d", "quantity": "1"}), "title", "empty")]
#[case(json!({"title": "t", "description": " ", "quantity": "1"}), "description", "empty")]
#[case(json!({"title": "t", "description": "d", "quantity": "x".repeat(101)}), "quantity", "too_long")]
#[actix_web::test]
async fn create_validates_content(
    #[case] body: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let ports = MockPorts::acting_as(UserId::random(), Role::Producer);

    let (status, response) = send(ports, post("/api/donations").set_json(&body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["details"], json!({ "field": field, "code": code }));
}

#[rstest]
#[case(Role::Cook, json!({"title": "Bread", "description": "d", "quantity": "1"}))]
#[case(Role::Distributor, json!({"title": "Bread", "description": "d", "quantity": "1"}))]
#[case(Role::Cook, json!({"title": "  ", "description": "d", "quantity": "1"}))]
#[actix_web::test]
async fn create_by_non_producers_is_forbidden_before_validation(
    #[case] role: Role,
    #[case] body: Value,
) {
    let mut ports = MockPorts::acting_as(UserId::random(), role);
    ports.donations.expect_create().never();

    let (status, response) = send(ports, post("/api/donations").set_json(&body)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(response["code"], "forbidden");
}

#[rstest]
#[actix_web::test]
async fn accept_returns_the_accepting_cook() {
    let cook = UserId::random();
    let view = accepted_view(UserId::random(), cook);
    let donation_id = view.donation.id();
    let mut ports = MockPorts::acting_as(cook, Role::Cook);
    ports
        .donations
        .expect_accept()
        .withf(move |actor, id| *actor == cook && *id == donation_id)
        .times(1)
        .returning(move |_, _| Ok(view.clone()));

    let uri = format!("/api/donations/{donation_id}/accept");
    let (status, body) = send(ports, post(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["cookId"], cook.to_string());
    assert_eq!(body["cookName"], "Chef Rita");
    assert_eq!(body["acceptedAt"], "2026-01-15T09:30:00Z");
}

#[rstest]
#[case(Error::invalid_state("donation is not available"), StatusCode::BAD_REQUEST, "invalid_state")]
#[case(Error::not_found("donation not found"), StatusCode::NOT_FOUND, "not_found")]
#[case(Error::forbidden("only cooks can accept donations"), StatusCode::FORBIDDEN, "forbidden")]
#[actix_web::test]
async fn accept_failures_map_to_statuses(
    #[case] error: Error,
    #[case] expected: StatusCode,
    #[case] code: &str,
) {
    let mut ports = MockPorts::acting_as(UserId::random(), Role::Cook);
    ports
        .donations
        .expect_accept()
        .returning(move |_, _| Err(error.clone()));

    let uri = format!("/api/donations/{}/accept", DonationId::random());
    let (status, body) = send(ports, post(&uri)).await;

    assert_eq!(status, expected);
    assert_eq!(body["code"], code);
}

#[rstest]
#[actix_web::test]
async fn accept_rejects_malformed_ids() {
    let ports = MockPorts::acting_as(UserId::random(), Role::Cook);

    let (status, body) = send(ports, post("/api/donations/not-a-uuid/accept")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_uuid");
}

#[rstest]
#[actix_web::test]
async fn accept_by_producers_is_forbidden_even_with_malformed_ids() {
    let mut ports = MockPorts::acting_as(UserId::random(), Role::Producer);
    ports.donations.expect_accept().never();

    let (status, body) = send(ports, post("/api/donations/not-a-uuid/accept")).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");
}

#[rstest]
#[actix_web::test]
async fn my_donations_are_scoped_to_the_caller() {
    let producer = UserId::random();
    let mut ports = MockPorts::authorising(producer);
    ports
        .donations_query
        .expect_my_donations()
        .withf(move |actor| *actor == producer)
        .times(1)
        .returning(move |_| Ok(vec![available_view(producer)]));

    let (status, body) = send(ports, get("/api/donations/my-donations")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}

#[rstest]
#[actix_web::test]
async fn accepted_donations_are_scoped_to_the_caller() {
    let cook = UserId::random();
    let mut ports = MockPorts::authorising(cook);
    ports
        .donations_query
        .expect_accepted_by()
        .withf(move |actor| *actor == cook)
        .times(1)
        .returning(move |_| Ok(vec![accepted_view(UserId::random(), cook)]));

    let (status, body) = send(ports, get("/api/donations/accepted")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["cookId"], cook.to_string());
}
