//! Capability surface handed to event hooks and command handlers.

use std::sync::{Arc, OnceLock};

use tmi_proto::ClientMessage;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::commands::{Command, CommandRegistry};
use crate::config::BotConfig;
use crate::error::BotError;
use crate::player::Player;

/// What hooks and command handlers may do while the bot runs.
///
/// Cloning is cheap; a clone can be moved into an application-spawned
/// task and used to send messages concurrently with the read loop.
#[derive(Clone)]
pub struct Context {
    config: Arc<BotConfig>,
    registry: Arc<CommandRegistry>,
    outbox: mpsc::UnboundedSender<ClientMessage>,
    cancel: CancellationToken,
    player: Arc<OnceLock<Player>>,
}

impl Context {
    pub(crate) fn new(
        config: Arc<BotConfig>,
        registry: Arc<CommandRegistry>,
        outbox: mpsc::UnboundedSender<ClientMessage>,
        cancel: CancellationToken,
        player: Arc<OnceLock<Player>>,
    ) -> Self {
        Self {
            config,
            registry,
            outbox,
            cancel,
            player,
        }
    }

    /// The bot configuration.
    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Registered top-level commands, in registration order.
    pub fn commands(&self) -> &[Command] {
        self.registry.commands()
    }

    /// Whether `user` is in the configured admin set.
    pub fn is_admin(&self, user: &str) -> bool {
        self.config.is_admin(user)
    }

    /// Send chat text to the joined channel.
    ///
    /// The write is queued for the writer task; this never waits on the
    /// socket. Fails only once the connection has shut down.
    pub fn say(&self, text: impl Into<String>) -> Result<(), BotError> {
        self.send(ClientMessage::privmsg(self.config.channel_name(), text))
    }

    /// Queue one raw protocol line, sent as-is.
    pub fn send_raw(&self, line: impl Into<String>) -> Result<(), BotError> {
        self.send(ClientMessage::Raw(line.into()))
    }

    pub(crate) fn send(&self, message: ClientMessage) -> Result<(), BotError> {
        self.outbox.send(message).map_err(|_| BotError::ConnectionClosed)
    }

    /// The audio player, started on first use.
    pub fn player(&self) -> &Player {
        self.player.get_or_init(Player::spawn)
    }

    /// Stop the bot: kill any in-flight playback, cancel the read loop,
    /// and, with `exit`, terminate the process immediately.
    pub async fn stop(&self, exit: bool) {
        info!(exit, "stop requested");
        if let Some(player) = self.player.get() {
            player.shutdown().await;
        }
        self.cancel.cancel();
        if exit {
            std::process::exit(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> (Context, mpsc::UnboundedReceiver<ClientMessage>) {
        let (outbox, replies) = mpsc::unbounded_channel();
        let config = BotConfig {
            channel: "dallas".to_string(),
            admins: vec!["dallas".to_string()],
            ..BotConfig::default()
        };
        let ctx = Context::new(
            Arc::new(config),
            Arc::new(CommandRegistry::new()),
            outbox,
            CancellationToken::new(),
            Arc::new(OnceLock::new()),
        );
        (ctx, replies)
    }

    #[test]
    fn test_say_targets_the_joined_channel() {
        let (ctx, mut replies) = context();
        ctx.say("HeyGuys").unwrap();
        assert_eq!(
            replies.try_recv().unwrap(),
            ClientMessage::privmsg("#dallas", "HeyGuys")
        );
    }

    #[test]
    fn test_send_raw_passes_lines_through() {
        let (ctx, mut replies) = context();
        ctx.send_raw("CAP LS 302").unwrap();
        assert_eq!(
            replies.try_recv().unwrap(),
            ClientMessage::Raw("CAP LS 302".to_string())
        );
    }

    #[test]
    fn test_say_fails_once_the_writer_is_gone() {
        let (ctx, replies) = context();
        drop(replies);
        assert!(matches!(ctx.say("hi"), Err(BotError::ConnectionClosed)));
    }

    #[test]
    fn test_admin_lookup() {
        let (ctx, _replies) = context();
        assert!(ctx.is_admin("dallas"));
        assert!(!ctx.is_admin("ronni"));
    }

    #[tokio::test]
    async fn test_stop_cancels_the_run_loop() {
        let (ctx, _replies) = context();
        ctx.stop(false).await;
        assert!(ctx.cancel.is_cancelled());
    }
}
