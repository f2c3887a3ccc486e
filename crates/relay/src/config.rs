// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Configuration for the murmur relay.
#[derive(Debug, Clone, clap::Parser)]
pub struct RelayConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "MURMUR_RELAY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 4100, env = "MURMUR_RELAY_PORT")]
    pub port: u16,

    /// Allowed CORS origin for browser clients. Permissive when unset.
    #[arg(long, env = "MURMUR_RELAY_CORS_ORIGIN")]
    pub cors_origin: Option<String>,

    /// Base URL of the identity provider that verifies connection tokens.
    #[arg(long, env = "MURMUR_RELAY_IDENTITY_URL")]
    pub identity_url: String,

    /// API key presented to the identity provider.
    #[arg(long, env = "MURMUR_RELAY_IDENTITY_API_KEY")]
    pub identity_api_key: Option<String>,

    /// Shared secret gating the `/webhook` ingress. Pushes are refused when unset.
    #[arg(long, env = "MURMUR_RELAY_WEBHOOK_SECRET")]
    pub webhook_secret: Option<String>,

    /// Per-connection outbound queue capacity. Frames to a full queue are dropped.
    #[arg(long, default_value_t = 64, env = "MURMUR_RELAY_OUTBOUND_QUEUE")]
    pub outbound_queue: usize,
}
