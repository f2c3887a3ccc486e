// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client WebSocket handler: handshake authentication, registration, and the
//! per-connection event loop.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::identity::VerifiedIdentity;
use crate::registry::ConnectionRecord;
use crate::relay;
use crate::state::RelayState;

/// Query parameters for the WebSocket upgrade.
#[derive(Debug, Clone, Deserialize)]
pub struct WsQuery {
    /// Identity-provider bearer token.
    pub token: Option<String>,
}

/// `GET /ws` — authenticated WebSocket upgrade.
///
/// The token is verified before the upgrade completes; a missing or rejected
/// token refuses the handshake outright and the client must reconnect with a
/// fresh token. A reconnect is always a brand-new connection identity.
pub async fn ws_handler(
    State(state): State<Arc<RelayState>>,
    Query(query): Query<WsQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let token = match query.token {
        Some(ref token) if !token.is_empty() => token.clone(),
        _ => {
            return crate::error::RelayError::Unauthorized
                .to_http_response("missing token")
                .into_response();
        }
    };

    let identity = match state.verifier.verify(&token).await {
        Ok(identity) => identity,
        Err(code) => return code.to_http_response("authentication failed").into_response(),
    };

    ws.on_upgrade(move |socket| handle_socket(state, socket, identity)).into_response()
}

/// Per-connection task: register, pump frames both ways, deregister.
async fn handle_socket(state: Arc<RelayState>, socket: WebSocket, identity: VerifiedIdentity) {
    let connection_id = uuid::Uuid::new_v4().to_string();
    let (tx, mut outbound_rx) = mpsc::channel(state.config.outbound_queue);

    let record = ConnectionRecord {
        connection_id: connection_id.clone(),
        user_id: identity.user_id,
        session_id: identity.session_id,
        tx,
    };
    state.registry.put(record.clone());
    tracing::info!(
        user_id = %record.user_id,
        session_id = %record.session_id,
        connection_id = %connection_id,
        connections = state.registry.len(),
        "client connected"
    );

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            _ = state.shutdown.cancelled() => break,

            // Deliver queued frames to this client.
            frame = outbound_rx.recv() => {
                let Some(frame) = frame else { break };
                let Ok(json) = serde_json::to_string(&frame) else { continue };
                if ws_tx.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }

            // Handle frames from this client.
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        relay::dispatch_client_frame(&state.registry, &record, &text);
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    // Binary frames and pings carry no relay semantics.
                    _ => {}
                }
            }
        }
    }

    // Every exit path lands here, so a dead connection never lingers in the
    // registry.
    state.registry.remove(&connection_id);
    tracing::info!(
        user_id = %record.user_id,
        connection_id = %connection_id,
        connections = state.registry.len(),
        "client disconnected"
    );
}
