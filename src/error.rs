//! Unified error handling for the bot framework.

use thiserror::Error;

use crate::commands::{BindError, RegistryError};
use crate::config::ConfigError;
use crate::player::PlayerError;

/// Errors surfaced by the bot framework.
#[derive(Debug, Error)]
pub enum BotError {
    /// Configuration could not be loaded.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Transport or line-level protocol failure.
    #[error("protocol error: {0}")]
    Protocol(#[from] tmi_proto::ProtocolError),

    /// Command registration was rejected.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Argument binding failed for a routed command.
    #[error(transparent)]
    Bind(#[from] BindError),

    /// An audio playback collaborator failed.
    #[error("player error: {0}")]
    Player(#[from] PlayerError),

    /// The outbound write path has shut down.
    #[error("connection closed")]
    ConnectionClosed,

    /// Application-level failure raised inside a hook or command handler.
    #[error("handler failed: {0}")]
    Handler(Box<dyn std::error::Error + Send + Sync>),
}

impl BotError {
    /// Wrap an application-level failure for propagation out of a hook or
    /// command handler.
    pub fn handler(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        BotError::Handler(error.into())
    }
}

/// Result type for event hooks and command handlers.
pub type HookResult = Result<(), BotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_wrapping() {
        let err = BotError::handler("playlist file missing");
        assert_eq!(err.to_string(), "handler failed: playlist file missing");
    }

    #[test]
    fn test_bind_errors_pass_through_transparently() {
        let bind = BindError::Coerce {
            value: "abc".to_string(),
            expected: "integer",
        };
        let err: BotError = bind.into();
        assert_eq!(err.to_string(), r#"invalid value "abc", integer expected"#);
    }
}
