// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP + WebSocket transport for the relay.

pub mod auth;
pub mod http;
pub mod webhook;
pub mod ws;

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::config::RelayConfig;
use crate::state::RelayState;

/// Build the axum `Router` with all relay routes.
pub fn build_router(state: Arc<RelayState>) -> Router {
    let cors = cors_layer(&state.config);
    Router::new()
        // Health (no auth)
        .route("/api/v1/health", get(http::health))
        // Diagnostics for the application's moderation dashboard
        .route("/api/v1/connections", get(http::connections))
        // Trusted backend ingress
        .route("/webhook", post(webhook::webhook))
        // Client socket endpoint
        .route("/ws", get(ws::ws_handler))
        .layer(cors)
        .with_state(state)
}

/// CORS policy: exactly the configured origin, or permissive when none is set.
fn cors_layer(config: &RelayConfig) -> CorsLayer {
    match config.cors_origin.as_deref() {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(value) => CorsLayer::new().allow_origin(value).allow_methods(Any).allow_headers(Any),
            Err(_) => {
                tracing::warn!(origin, "invalid CORS origin, falling back to permissive");
                CorsLayer::permissive()
            }
        },
        None => CorsLayer::permissive(),
    }
}
