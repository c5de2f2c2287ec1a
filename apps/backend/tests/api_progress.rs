//! Progress and session API tests.

mod common;

use axum::http::{header::AUTHORIZATION, StatusCode};
use chrono::Local;
use serde_json::Value;

use common::fixtures;
use common::TestContext;

/// Test a new learner has an empty report.
#[tokio::test]
async fn test_progress_of_new_user() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let user = ctx.create_test_user().await;

    let response = server
        .get("/api/progress")
        .add_header(AUTHORIZATION, common::bearer(&user.token))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["words_total"], 0);
    assert_eq!(body["exercises_total"], 0);
    assert_eq!(body["accuracy"], 0.0);
    assert_eq!(body["sessions_total"], 0);
    assert_eq!(body["current_streak"], 0);
    assert_eq!(body["longest_streak"], 0);
    assert!(body["last_practice_date"].is_null());
}

/// Test progress after one batch and two checks.
#[tokio::test]
async fn test_progress_after_practice() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let user = ctx.create_test_user().await;
    let auth = common::bearer(&user.token);
    ctx.add_words(&user, &["perro", "gato"]).await;

    let response = server
        .post("/api/generate")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&fixtures::generate_request(5, 2))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let first = body["sentences"][0].as_str().unwrap().to_string();
    let second = body["sentences"][1].as_str().unwrap().to_string();

    for (sentence, answer) in [(&first, "The dog eats."), (&second, "The cat eats.")] {
        server
            .post("/api/check")
            .add_header(AUTHORIZATION, auth.clone())
            .json(&fixtures::check_request(sentence, answer))
            .await
            .assert_status_ok();
    }

    let response = server
        .get("/api/progress")
        .add_header(AUTHORIZATION, auth)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["words_total"], 2);
    assert_eq!(body["exercises_total"], 5);
    assert_eq!(body["attempts_total"], 2);
    assert_eq!(body["correct_total"], 1);
    assert_eq!(body["accuracy"], 0.5);
    assert_eq!(body["sessions_total"], 1);
    assert_eq!(body["days_practiced"], 1);
    assert_eq!(body["current_streak"], 1);
    assert_eq!(body["longest_streak"], 1);
    assert_eq!(
        body["last_practice_date"],
        Local::now().date_naive().format("%Y-%m-%d").to_string()
    );
}

/// Test starting a session makes later batches attach to it.
#[tokio::test]
async fn test_new_session_receives_next_batch() {
    let ctx = TestContext::new();
    let server = ctx.server();
    let user = ctx.create_test_user().await;
    let auth = common::bearer(&user.token);

    let response = server
        .post("/api/generate")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&fixtures::generate_request(5, 5))
        .await;
    let first_session = response.json::<Value>()["session"]["id"].as_i64().unwrap();

    let response = server
        .post("/api/sessions")
        .add_header(AUTHORIZATION, auth.clone())
        .await;
    response.assert_status_ok();
    let started: Value = response.json();
    let new_session = started["id"].as_i64().unwrap();
    assert_ne!(new_session, first_session);
    assert!(started["exercises"].as_array().unwrap().is_empty());

    let response = server
        .post("/api/generate")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&fixtures::generate_request(5, 5))
        .await;
    assert_eq!(response.json::<Value>()["session"]["id"], new_session);

    let response = server
        .get("/api/sessions/current")
        .add_header(AUTHORIZATION, auth.clone())
        .await;
    response.assert_status_ok();
    let current: Value = response.json();
    assert_eq!(current["id"], new_session);
    assert_eq!(current["exercises"].as_array().unwrap().len(), 5);

    let response = server
        .get("/api/progress")
        .add_header(AUTHORIZATION, auth)
        .await;
    let body: Value = response.json();
    assert_eq!(body["sessions_total"], 2);
    assert_eq!(body["days_practiced"], 1);
}

/// Test progress requires authentication.
#[tokio::test]
async fn test_progress_requires_auth() {
    let ctx = TestContext::new();
    let server = ctx.server();

    server
        .get("/api/progress")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}
