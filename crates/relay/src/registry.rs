// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live-connection registry.
//!
//! The only shared mutable state in the process. One record per open socket;
//! a user may own any number of records at once (multi-tab, multi-device).
//! Records exist exactly as long as their transport connection: the socket
//! task inserts on admission and removes on every exit path.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::events::OutboundFrame;

/// One live connection bound to a verified identity.
#[derive(Debug, Clone)]
pub struct ConnectionRecord {
    /// Transport-assigned id, unique for the connection's lifetime.
    pub connection_id: String,
    /// Identity-provider user id, immutable after the handshake.
    pub user_id: String,
    /// Identity-provider session id for this login.
    pub session_id: String,
    /// Write half of the connection's bounded outbound queue.
    pub tx: mpsc::Sender<OutboundFrame>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    by_conn: HashMap<String, ConnectionRecord>,
    by_user: HashMap<String, HashSet<String>>,
}

/// Concurrent connection store with a reverse user index.
///
/// Every operation takes the lock once, so put/remove/find are individually
/// atomic with respect to each other. No cross-operation transactions exist
/// or are needed.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    inner: RwLock<RegistryInner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record. The transport guarantees `connection_id` uniqueness.
    pub fn put(&self, record: ConnectionRecord) {
        let mut inner = self.inner.write();
        inner
            .by_user
            .entry(record.user_id.clone())
            .or_default()
            .insert(record.connection_id.clone());
        inner.by_conn.insert(record.connection_id.clone(), record);
    }

    /// Remove a record. Idempotent: an absent id is a no-op, not an error.
    pub fn remove(&self, connection_id: &str) -> bool {
        let mut inner = self.inner.write();
        let Some(record) = inner.by_conn.remove(connection_id) else {
            return false;
        };
        if let Some(set) = inner.by_user.get_mut(&record.user_id) {
            set.remove(connection_id);
            if set.is_empty() {
                inner.by_user.remove(&record.user_id);
            }
        }
        true
    }

    /// All live records for a user. Empty when the user has no connections.
    pub fn find_by_user(&self, user_id: &str) -> Vec<ConnectionRecord> {
        let inner = self.inner.read();
        let Some(ids) = inner.by_user.get(user_id) else {
            return Vec::new();
        };
        ids.iter().filter_map(|id| inner.by_conn.get(id).cloned()).collect()
    }

    /// Total live connections.
    pub fn len(&self) -> usize {
        self.inner.read().by_conn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Per-user live-connection counts, for diagnostics.
    pub fn user_counts(&self) -> HashMap<String, usize> {
        self.inner.read().by_user.iter().map(|(user, set)| (user.clone(), set.len())).collect()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod registry_tests;
