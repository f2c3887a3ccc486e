// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook ingress tests over the in-process HTTP surface.
//!
//! Uses `axum_test::TestServer` — no real TCP needed.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use murmur_relay::events::OutboundFrame;
use murmur_relay::registry::ConnectionRecord;
use murmur_relay::state::RelayState;
use murmur_relay::test_support::{test_config, test_state, StubVerifier, TEST_WEBHOOK_SECRET};
use murmur_relay::transport::build_router;

fn test_server(state: Arc<RelayState>) -> TestServer {
    TestServer::new(build_router(state)).expect("failed to create test server")
}

/// Register a connection directly and keep its receiving end.
fn attach(state: &RelayState, connection_id: &str, user_id: &str) -> mpsc::Receiver<OutboundFrame> {
    let (tx, rx) = mpsc::channel(8);
    state.registry.put(ConnectionRecord {
        connection_id: connection_id.to_owned(),
        user_id: user_id.to_owned(),
        session_id: format!("sess-{connection_id}"),
        tx,
    });
    rx
}

fn valid_body() -> serde_json::Value {
    json!({
        "secret": TEST_WEBHOOK_SECRET,
        "userId": "u42",
        "event": "new_message",
        "data": {"conversationId": 7},
    })
}

#[tokio::test]
async fn missing_fields_return_400() -> anyhow::Result<()> {
    let server = test_server(test_state(StubVerifier::new()));

    for field in ["secret", "userId", "event", "data"] {
        let mut body = valid_body();
        if let Some(map) = body.as_object_mut() {
            map.remove(field);
        }
        let resp = server.post("/webhook").json(&body).await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = resp.json();
        assert_eq!(body["message"], "Missing required fields", "missing {field}");
    }
    Ok(())
}

#[tokio::test]
async fn wrong_secret_returns_403_and_forwards_nothing() -> anyhow::Result<()> {
    let state = test_state(StubVerifier::new());
    let mut rx = attach(&state, "c1", "u42");
    let server = test_server(Arc::clone(&state));

    let mut body = valid_body();
    body["secret"] = json!("not-the-secret");
    let resp = server.post("/webhook").json(&body).await;
    resp.assert_status(StatusCode::FORBIDDEN);

    let body: serde_json::Value = resp.json();
    assert_eq!(body["error"], "Invalid or missing secret");
    assert!(rx.try_recv().is_err(), "nothing may be forwarded on a secret mismatch");
    Ok(())
}

#[tokio::test]
async fn unconfigured_secret_refuses_all_pushes() -> anyhow::Result<()> {
    let mut config = test_config();
    config.webhook_secret = None;
    let state = Arc::new(RelayState::new(
        config,
        Arc::new(StubVerifier::new()),
        CancellationToken::new(),
    ));
    let server = test_server(state);

    let resp = server.post("/webhook").json(&valid_body()).await;
    resp.assert_status(StatusCode::FORBIDDEN);
    let body: serde_json::Value = resp.json();
    assert_eq!(body["error"], "Invalid or missing secret");
    Ok(())
}

#[tokio::test]
async fn secret_is_checked_before_event_allow_list() -> anyhow::Result<()> {
    let server = test_server(test_state(StubVerifier::new()));

    let mut body = valid_body();
    body["secret"] = json!("wrong");
    body["event"] = json!("definitely_not_allowed");
    let resp = server.post("/webhook").json(&body).await;
    resp.assert_status(StatusCode::FORBIDDEN);

    let body: serde_json::Value = resp.json();
    assert_eq!(body["error"], "Invalid or missing secret");
    Ok(())
}

#[tokio::test]
async fn disallowed_event_returns_403_naming_it() -> anyhow::Result<()> {
    let server = test_server(test_state(StubVerifier::new()));

    let mut body = valid_body();
    body["event"] = json!("typing");
    let resp = server.post("/webhook").json(&body).await;
    resp.assert_status(StatusCode::FORBIDDEN);

    let body: serde_json::Value = resp.json();
    assert_eq!(body["error"], "Event 'typing' is not allowed via webhook.");
    Ok(())
}

#[tokio::test]
async fn no_live_recipient_returns_success_shaped_200() -> anyhow::Result<()> {
    let server = test_server(test_state(StubVerifier::new()));

    let resp = server.post("/webhook").json(&valid_body()).await;
    resp.assert_status(StatusCode::OK);

    let body: serde_json::Value = resp.json();
    assert_eq!(body["message"], "User u42 not connected");
    assert!(body.get("success").is_none());
    Ok(())
}

#[tokio::test]
async fn delivers_to_every_connection_of_target_user() -> anyhow::Result<()> {
    let state = test_state(StubVerifier::new());
    let mut phone_rx = attach(&state, "c1", "u42");
    let mut laptop_rx = attach(&state, "c2", "u42");
    let mut bystander_rx = attach(&state, "c3", "u43");
    let server = test_server(Arc::clone(&state));

    let resp = server.post("/webhook").json(&valid_body()).await;
    resp.assert_status(StatusCode::OK);

    let body: serde_json::Value = resp.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Message sent");

    for rx in [&mut phone_rx, &mut laptop_rx] {
        let frame = rx.try_recv().expect("target connection receives push");
        assert_eq!(frame.event, "new_message");
        assert_eq!(frame.from, None);
        assert_eq!(frame.data, json!({"conversationId": 7}));
        assert!(rx.try_recv().is_err(), "received more than once");
    }
    assert!(bystander_rx.try_recv().is_err());
    Ok(())
}

#[tokio::test]
async fn health_reports_connection_count() -> anyhow::Result<()> {
    let state = test_state(StubVerifier::new());
    let _rx1 = attach(&state, "c1", "u42");
    let _rx2 = attach(&state, "c2", "u43");
    let server = test_server(Arc::clone(&state));

    let resp = server.get("/api/v1/health").await;
    resp.assert_status(StatusCode::OK);

    let body: serde_json::Value = resp.json();
    assert_eq!(body["status"], "running");
    assert_eq!(body["connection_count"], 2);
    Ok(())
}

#[tokio::test]
async fn connections_listing_requires_bearer_secret() -> anyhow::Result<()> {
    let state = test_state(StubVerifier::new());
    let _rx1 = attach(&state, "c1", "u42");
    let _rx2 = attach(&state, "c2", "u42");
    let server = test_server(Arc::clone(&state));

    let resp = server.get("/api/v1/connections").await;
    resp.assert_status(StatusCode::UNAUTHORIZED);

    let resp = server
        .get("/api/v1/connections")
        .add_header("authorization", format!("Bearer {TEST_WEBHOOK_SECRET}"))
        .await;
    resp.assert_status(StatusCode::OK);

    let list: Vec<serde_json::Value> = resp.json();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["user_id"], "u42");
    assert_eq!(list[0]["connections"], 2);
    Ok(())
}
