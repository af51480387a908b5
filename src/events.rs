//! Event hooks and the inbound chat message type.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tmi_proto::ModeChange;

use crate::context::Context;
use crate::error::HookResult;

/// One chat message relayed into the joined channel.
#[derive(Clone, Debug)]
pub struct ChatMessage {
    /// Message text.
    pub content: String,
    /// Login name of the sender.
    pub author: String,
    /// When the message was read off the connection.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Capture a message at the current instant.
    pub fn new(content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            author: author.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Hooks invoked by the read loop.
///
/// Every hook defaults to a no-op, so implementations override only what
/// they need. Hooks run to completion before the next line is read, and a
/// hook error is logged at the dispatch boundary without stopping the
/// loop.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Fired once after the login handshake, before the first read.
    async fn ready(&self, _ctx: &Context) -> HookResult {
        Ok(())
    }

    /// Fired for every decoded line, before classification.
    async fn raw_line(&self, _ctx: &Context, _line: &str) -> HookResult {
        Ok(())
    }

    /// Fired for each chat message, before command routing.
    async fn message(&self, _ctx: &Context, _message: &ChatMessage) -> HookResult {
        Ok(())
    }

    /// Fired when a participant joins the channel.
    async fn user_join(&self, _ctx: &Context, _user: &str) -> HookResult {
        Ok(())
    }

    /// Fired when a participant leaves the channel.
    async fn user_leave(&self, _ctx: &Context, _user: &str) -> HookResult {
        Ok(())
    }

    /// Fired when operator status is granted or removed.
    async fn user_mode(&self, _ctx: &Context, _change: ModeChange, _user: &str) -> HookResult {
        Ok(())
    }
}

/// The default hook set; every event is ignored.
pub struct NoopEvents;

#[async_trait]
impl EventHandler for NoopEvents {}
