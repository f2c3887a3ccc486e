// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Murmur relay: realtime presence and event relay for murmur clients.
//!
//! Tracks which users currently hold live WebSocket connections and forwards
//! allow-listed events between them, either peer-to-peer or pushed from the
//! application backend through `/webhook`. All state is in-memory; a restart
//! starts from an empty registry.

pub mod config;
pub mod error;
pub mod events;
pub mod identity;
pub mod registry;
pub mod relay;
pub mod state;
pub mod test_support;
pub mod transport;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::RelayConfig;
use crate::identity::{HttpIdentityVerifier, IdentityVerifier};
use crate::state::RelayState;
use crate::transport::build_router;

/// Run the relay server until shutdown.
pub async fn run(config: RelayConfig) -> anyhow::Result<()> {
    // reqwest is built with `rustls-no-provider`; install the ring provider as
    // the process default before any HTTP client is constructed.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();

    let verifier: Arc<dyn IdentityVerifier> = Arc::new(HttpIdentityVerifier::new(
        config.identity_url.clone(),
        config.identity_api_key.clone(),
    ));
    let state = Arc::new(RelayState::new(config, verifier, shutdown.clone()));

    // Cancel the token on SIGINT so in-flight socket tasks unwind and
    // deregister before the process exits.
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received");
                shutdown.cancel();
            }
        });
    }

    let has_webhook = state.config.webhook_secret.is_some();
    if has_webhook {
        tracing::info!("murmur relay listening on {addr}");
    } else {
        tracing::info!("murmur relay listening on {addr} (webhook ingress disabled)");
    }

    let router = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    Ok(())
}
