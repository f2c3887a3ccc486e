// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared helpers for integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::identity::{IdentityVerifier, VerifiedIdentity};
use crate::state::RelayState;
use crate::transport::build_router;

/// Shared secret used by test configs for the webhook ingress.
pub const TEST_WEBHOOK_SECRET: &str = "test-webhook-secret";

/// Identity verifier backed by a static token table.
#[derive(Debug, Default)]
pub struct StubVerifier {
    identities: HashMap<String, VerifiedIdentity>,
}

impl StubVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: &str, user_id: &str, session_id: &str) -> Self {
        self.identities.insert(
            token.to_owned(),
            VerifiedIdentity { user_id: user_id.to_owned(), session_id: session_id.to_owned() },
        );
        self
    }
}

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, RelayError> {
        self.identities.get(token).cloned().ok_or(RelayError::Unauthorized)
    }
}

/// Relay config for tests; the identity URL is never dialed because tests
/// inject a [`StubVerifier`].
pub fn test_config() -> RelayConfig {
    RelayConfig {
        host: "127.0.0.1".to_owned(),
        port: 0,
        cors_origin: None,
        identity_url: "http://127.0.0.1:9".to_owned(),
        identity_api_key: None,
        webhook_secret: Some(TEST_WEBHOOK_SECRET.to_owned()),
        outbound_queue: 8,
    }
}

pub fn test_state(verifier: StubVerifier) -> Arc<RelayState> {
    Arc::new(RelayState::new(test_config(), Arc::new(verifier), CancellationToken::new()))
}

/// Spawn the relay router on an OS-assigned port for real-socket tests.
pub async fn spawn_server(
    state: Arc<RelayState>,
) -> anyhow::Result<(std::net::SocketAddr, tokio::task::JoinHandle<()>)> {
    // reqwest is built with `rustls-no-provider`; install the ring provider as
    // the process default so test clients can build. Idempotent across tests.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    Ok((addr, handle))
}
