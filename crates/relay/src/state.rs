// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::RelayConfig;
use crate::identity::IdentityVerifier;
use crate::registry::ConnectionRegistry;

/// Shared relay state.
pub struct RelayState {
    pub config: RelayConfig,
    pub registry: ConnectionRegistry,
    pub verifier: Arc<dyn IdentityVerifier>,
    pub shutdown: CancellationToken,
}

impl RelayState {
    pub fn new(
        config: RelayConfig,
        verifier: Arc<dyn IdentityVerifier>,
        shutdown: CancellationToken,
    ) -> Self {
        Self { config, registry: ConnectionRegistry::new(), verifier, shutdown }
    }
}
