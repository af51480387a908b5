//! # tmibot
//!
//! An async bot framework for Twitch chat (TMI, the IRC dialect spoken by
//! `irc.twitch.tv`). A bot owns one connection: it authenticates, joins a
//! single channel, and converts protocol lines into typed events
//! dispatched to an [`EventHandler`]. An optional command layer routes
//! prefixed chat through a registered command tree (aliases, admin
//! gating, nested subcommands) and binds whitespace-separated argument
//! tokens to each handler's declared parameters.
//!
//! Wire-level concerns live in the `tmi-proto` crate; this crate adds the
//! run loop, hooks, routing, and audio playback via external `ffprobe`,
//! `ffplay`, and `yt-dlp` processes through [`Player`].
//!
//! ## Quick start
//!
//! ```no_run
//! use tmibot::commands::{Arg, Command, CommandHandler, ParamKind};
//! use tmibot::{Bot, BotConfig, ChatMessage, Context, HookResult};
//!
//! struct Echo;
//!
//! #[async_trait::async_trait]
//! impl CommandHandler for Echo {
//!     async fn run(&self, ctx: &Context, _message: &ChatMessage, args: Vec<Arg>) -> HookResult {
//!         let text = args.first().map(ToString::to_string).unwrap_or_default();
//!         ctx.say(text)?;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BotConfig::load("songbot.toml")?;
//!     let bot = Bot::builder(config)
//!         .command(Command::new("echo", Echo).param("text", ParamKind::Text))?
//!         .build();
//!     bot.run().await?;
//!     Ok(())
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod bot;
pub mod commands;
pub mod config;
pub mod conn;
pub mod context;
pub mod error;
pub mod events;
pub mod player;
pub mod telemetry;

pub use self::bot::{Bot, BotBuilder};
pub use self::config::{BotConfig, ConfigError};
pub use self::conn::Connection;
pub use self::context::Context;
pub use self::error::{BotError, HookResult};
pub use self::events::{ChatMessage, EventHandler, NoopEvents};
pub use self::player::{Player, PlayerError};

pub use tmi_proto::{ClientMessage, ModeChange, ServerEvent};
