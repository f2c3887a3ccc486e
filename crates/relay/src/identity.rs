// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity-provider token verification for the connection handshake.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::RelayError;

/// Verified claims for an admitted connection.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedIdentity {
    pub user_id: String,
    pub session_id: String,
}

/// Verifies a client bearer token and yields the identity behind it.
///
/// Injected into shared state as a trait object so tests can substitute a
/// static table for the provider round-trip.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, RelayError>;
}

/// HTTP verifier backed by the identity provider's token-verification endpoint.
pub struct HttpIdentityVerifier {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpIdentityVerifier {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { base_url, api_key, client }
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    /// `POST {base}/v1/tokens/verify` with the client token in the body and
    /// the service API key as bearer auth. Any non-success verdict rejects
    /// the handshake; the client must reconnect with a fresh token.
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, RelayError> {
        let req = self
            .client
            .post(format!("{}/v1/tokens/verify", self.base_url))
            .json(&serde_json::json!({ "token": token }));
        let req = match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        };

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(err = %e, "identity provider unreachable");
            RelayError::Internal
        })?;

        if !resp.status().is_success() {
            return Err(RelayError::Unauthorized);
        }

        resp.json::<VerifiedIdentity>().await.map_err(|e| {
            tracing::warn!(err = %e, "identity provider returned malformed claims");
            RelayError::Unauthorized
        })
    }
}
