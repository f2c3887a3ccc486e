// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event vocabularies and wire frames.
//!
//! Both vocabularies are closed sets: a name that does not map to a variant
//! is not forwarded, ever. Client-to-client and server-to-client events are
//! deliberately separate enums — the webhook may not push peer events and
//! clients may not emit server events.

use serde::{Deserialize, Serialize};

/// Client-originated events the relay forwards between peers.
///
/// These are ephemeral signals; nothing here is persisted or acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayEventKind {
    Typing,
    StopTyping,
    MessageSeen,
}

impl RelayEventKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "typing" => Some(Self::Typing),
            "stop_typing" => Some(Self::StopTyping),
            "message_seen" => Some(Self::MessageSeen),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Typing => "typing",
            Self::StopTyping => "stop_typing",
            Self::MessageSeen => "message_seen",
        }
    }
}

/// Server-originated events accepted by the webhook ingress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookEventKind {
    NewMessage,
    Notification,
    NewFollower,
}

impl WebhookEventKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "new_message" => Some(Self::NewMessage),
            "notification" => Some(Self::Notification),
            "new_follower" => Some(Self::NewFollower),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewMessage => "new_message",
            Self::Notification => "notification",
            Self::NewFollower => "new_follower",
        }
    }
}

/// A frame queued for delivery to a single connection.
///
/// `from` carries the authenticated sender on peer-relayed frames and is
/// absent on webhook pushes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundFrame {
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    pub data: serde_json::Value,
}
