// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event forwarding between connections.
//!
//! Delivery is best-effort and at-most-once: a frame is handed to each live
//! target queue exactly once, and nothing is retried, queued for offline
//! users, or reported back to the sender.

use crate::events::{OutboundFrame, RelayEventKind};
use crate::registry::{ConnectionRecord, ConnectionRegistry};

/// Handle a text frame from an authenticated client connection.
///
/// The sender identity comes from the connection's own record; any sender
/// field inside the payload is ignored. Malformed frames and names outside
/// the relay allow-list are dropped without an error frame.
pub fn dispatch_client_frame(
    registry: &ConnectionRegistry,
    sender: &ConnectionRecord,
    text: &str,
) {
    let Ok(msg) = serde_json::from_str::<serde_json::Value>(text) else {
        return;
    };

    let Some(event) = msg.get("event").and_then(|v| v.as_str()) else {
        return;
    };
    let Some(kind) = RelayEventKind::from_name(event) else {
        tracing::debug!(event, connection_id = %sender.connection_id, "dropping event outside relay set");
        return;
    };

    let Some(target) = msg.get("userId").and_then(|v| v.as_str()) else {
        return;
    };
    let Some(data) = msg.get("data") else {
        return;
    };

    forward_to_user(
        registry,
        target,
        kind.as_str(),
        Some(&sender.user_id),
        data,
        Some(&sender.connection_id),
    );
}

/// Forward an event to every live connection of `target_user_id`, except an
/// optionally excluded connection (the relay never echoes a frame back to
/// its originating socket).
///
/// Returns the number of connections the frame was addressed to. Queues that
/// are full or already closing count as addressed — the frame is simply lost,
/// which is within the delivery contract.
pub fn forward_to_user(
    registry: &ConnectionRegistry,
    target_user_id: &str,
    event: &str,
    from: Option<&str>,
    data: &serde_json::Value,
    exclude_connection: Option<&str>,
) -> usize {
    let targets = registry.find_by_user(target_user_id);
    let mut addressed = 0;

    for record in &targets {
        if exclude_connection == Some(record.connection_id.as_str()) {
            continue;
        }
        addressed += 1;

        let frame = OutboundFrame {
            event: event.to_owned(),
            from: from.map(str::to_owned),
            data: data.clone(),
        };
        match record.tx.try_send(frame) {
            Ok(()) => {}
            Err(tokio::sync::mpsc::error::TrySendError::Full(_)) => {
                tracing::debug!(
                    connection_id = %record.connection_id,
                    event,
                    "outbound queue full, dropping frame"
                );
            }
            // Receiver is tearing down; registry cleanup is imminent.
            Err(tokio::sync::mpsc::error::TrySendError::Closed(_)) => {}
        }
    }

    addressed
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod relay_tests;
