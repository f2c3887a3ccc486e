// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP diagnostics for the relay.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::state::RelayState;
use crate::transport::auth;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub connection_count: usize,
}

#[derive(Debug, Serialize)]
pub struct UserConnections {
    pub user_id: String,
    pub connections: usize,
}

/// `GET /api/v1/health`
pub async fn health(State(s): State<Arc<RelayState>>) -> impl IntoResponse {
    Json(HealthResponse { status: "running".to_owned(), connection_count: s.registry.len() })
}

/// `GET /api/v1/connections` — per-user live-connection counts.
///
/// Gated by the webhook shared secret as a bearer token; this surface exists
/// for the application's moderation dashboard, not for end users.
pub async fn connections(State(s): State<Arc<RelayState>>, headers: HeaderMap) -> Response {
    if let Err(code) = auth::validate_bearer(&headers, s.config.webhook_secret.as_deref()) {
        return code.to_http_response("unauthorized").into_response();
    }

    let mut list: Vec<UserConnections> = s
        .registry
        .user_counts()
        .into_iter()
        .map(|(user_id, connections)| UserConnections { user_id, connections })
        .collect();
    list.sort_by(|a, b| a.user_id.cmp(&b.user_id));
    Json(list).into_response()
}
