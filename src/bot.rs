//! Bot assembly and the single-task read loop.

use std::sync::{Arc, OnceLock};

use tmi_proto::{ClientMessage, ServerEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::commands::{Command, CommandRegistry, RegistryError};
use crate::config::BotConfig;
use crate::conn::Connection;
use crate::context::Context;
use crate::error::BotError;
use crate::events::{ChatMessage, EventHandler, NoopEvents};
use crate::player::Player;

/// Assembles a [`Bot`]: configuration, hooks, and the command set.
pub struct BotBuilder {
    config: BotConfig,
    events: Arc<dyn EventHandler>,
    registry: CommandRegistry,
}

impl std::fmt::Debug for BotBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BotBuilder {
    /// Install the event hooks. Defaults to [`NoopEvents`].
    pub fn events(mut self, events: impl EventHandler + 'static) -> Self {
        self.events = Arc::new(events);
        self
    }

    /// Register a top-level command.
    pub fn command(mut self, command: Command) -> Result<Self, RegistryError> {
        self.registry.register(command)?;
        Ok(self)
    }

    /// Finish assembly.
    pub fn build(self) -> Bot {
        Bot {
            config: self.config,
            events: self.events,
            registry: self.registry,
        }
    }
}

/// A fully assembled bot, ready to connect.
pub struct Bot {
    config: BotConfig,
    events: Arc<dyn EventHandler>,
    registry: CommandRegistry,
}

impl Bot {
    /// Start assembling a bot for `config`.
    pub fn builder(config: BotConfig) -> BotBuilder {
        BotBuilder {
            config,
            events: Arc::new(NoopEvents),
            registry: CommandRegistry::new(),
        }
    }

    /// Connect, log in, and process lines until the server closes the
    /// connection or a handler requests a stop.
    ///
    /// Lines are processed one at a time: every hook and routed command
    /// runs to completion before the next read. Outbound writes go
    /// through a writer task, so handlers never wait on the socket. The
    /// audio player task is started lazily on first use.
    pub async fn run(self) -> Result<(), BotError> {
        let Bot {
            config,
            events,
            registry,
        } = self;
        let config = Arc::new(config);
        let registry = Arc::new(registry);

        let connection = Connection::open(&config).await?;
        let (mut reader, mut writer) = connection.into_parts();

        let (outbox, mut outbox_rx) = mpsc::unbounded_channel::<ClientMessage>();
        let cancel = CancellationToken::new();
        let player: Arc<OnceLock<Player>> = Arc::new(OnceLock::new());

        // Writer task: drains the outbox until cancellation or EOF.
        let writer_cancel = cancel.clone();
        let writer_task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = writer_cancel.cancelled() => break,
                    message = outbox_rx.recv() => match message {
                        Some(message) => {
                            if let Err(e) = writer.send(message).await {
                                error!(error = %e, "write failed, dropping outbound messages");
                                break;
                            }
                        }
                        None => break,
                    },
                }
            }
        });

        let ctx = Context::new(
            Arc::clone(&config),
            Arc::clone(&registry),
            outbox,
            cancel.clone(),
            Arc::clone(&player),
        );

        if let Err(e) = events.ready(&ctx).await {
            error!(hook = "ready", error = %e, "event hook failed");
        }

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("stop requested, leaving the read loop");
                    break;
                }
                result = reader.read_line() => match result {
                    Ok(Some(line)) => dispatch_line(events.as_ref(), &registry, &ctx, &line).await,
                    Ok(None) => {
                        info!("server closed the connection");
                        break;
                    }
                    Err(e) => {
                        error!(error = %e, "transport error");
                        break;
                    }
                },
            }
        }

        // Teardown: stop the writer, kill any in-flight playback.
        cancel.cancel();
        if let Some(player) = player.get() {
            player.shutdown().await;
        }
        let _ = writer_task.await;
        info!("disconnected");
        Ok(())
    }
}

/// Dispatch one decoded line: raw hook, classification, specific hook,
/// then command routing. Hook and command errors are logged here and
/// never stop the loop.
async fn dispatch_line(
    events: &dyn EventHandler,
    registry: &CommandRegistry,
    ctx: &Context,
    line: &str,
) {
    debug!(line = %line, "received");

    if let Err(e) = events.raw_line(ctx, line).await {
        error!(hook = "raw_line", error = %e, "event hook failed");
    }

    let event = match line.parse::<ServerEvent>() {
        Ok(event) => event,
        Err(e) => {
            // A keyword matched but its fields were unusable.
            trace!(error = %e, line = %line, "discarding malformed line");
            return;
        }
    };

    match event {
        ServerEvent::Ping { token } => {
            debug!(token = %token, "answering ping");
            if let Err(e) = ctx.send(ClientMessage::Pong(token)) {
                error!(error = %e, "failed to queue pong");
            }
        }
        ServerEvent::Message { sender, text } => {
            let message = ChatMessage::new(text, sender);
            if let Err(e) = events.message(ctx, &message).await {
                error!(hook = "message", error = %e, "event hook failed");
            }
            if !registry.is_empty() {
                if let Err(e) = registry.route(ctx, &message).await {
                    error!(content = %message.content, error = %e, "command failed");
                }
            }
        }
        ServerEvent::Join { user } => {
            if let Err(e) = events.user_join(ctx, &user).await {
                error!(hook = "user_join", error = %e, "event hook failed");
            }
        }
        ServerEvent::Part { user } => {
            if let Err(e) = events.user_leave(ctx, &user).await {
                error!(hook = "user_leave", error = %e, "event hook failed");
            }
        }
        ServerEvent::Mode { change, user } => {
            if let Err(e) = events.user_mode(ctx, change, &user).await {
                error!(hook = "user_mode", error = %e, "event hook failed");
            }
        }
        ServerEvent::Unknown { raw } => {
            debug!(line = %raw, "unknown event");
        }
        other => {
            debug!(event = ?other, "unhandled event kind");
        }
    }
}
