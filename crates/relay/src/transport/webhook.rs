// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook ingress: the application backend pushes server-originated events
//! to a user's live connections over plain HTTP.
//!
//! Authentication is the shared secret alone; the identity provider is never
//! consulted on this path.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::events::WebhookEventKind;
use crate::relay;
use crate::state::RelayState;
use crate::transport::auth;

// -- Request/Response types ---------------------------------------------------

/// `POST /webhook` request body.
///
/// Every field is optional at the serde layer so absence maps to the 400
/// response below instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    pub secret: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub event: Option<String>,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct WebhookSent {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookMessage {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct WebhookRejection {
    pub error: String,
}

// -- Handler ------------------------------------------------------------------

/// `POST /webhook` — push an event to all of a user's live connections.
///
/// Validation order is fixed: field presence, then the secret, then the
/// event allow-list. A target with no live connections is a success-shaped
/// outcome, not an error.
pub async fn webhook(
    State(state): State<Arc<RelayState>>,
    Json(req): Json<WebhookRequest>,
) -> Response {
    let (Some(secret), Some(user_id), Some(event), Some(data)) =
        (req.secret, req.user_id, req.event, req.data)
    else {
        return (
            StatusCode::BAD_REQUEST,
            Json(WebhookMessage { message: "Missing required fields".to_owned() }),
        )
            .into_response();
    };

    let authorized = state
        .config
        .webhook_secret
        .as_deref()
        .is_some_and(|expected| auth::constant_time_eq(&secret, expected));
    if !authorized {
        return (
            StatusCode::FORBIDDEN,
            Json(WebhookRejection { error: "Invalid or missing secret".to_owned() }),
        )
            .into_response();
    }

    let Some(kind) = WebhookEventKind::from_name(&event) else {
        return (
            StatusCode::FORBIDDEN,
            Json(WebhookRejection {
                error: format!("Event '{event}' is not allowed via webhook."),
            }),
        )
            .into_response();
    };

    let addressed =
        relay::forward_to_user(&state.registry, &user_id, kind.as_str(), None, &data, None);

    if addressed > 0 {
        tracing::debug!(
            user_id = %user_id,
            event = kind.as_str(),
            connections = addressed,
            "webhook event forwarded"
        );
        (
            StatusCode::OK,
            Json(WebhookSent { success: true, message: "Message sent".to_owned() }),
        )
            .into_response()
    } else {
        (StatusCode::OK, Json(WebhookMessage { message: format!("User {user_id} not connected") }))
            .into_response()
    }
}
