//! Song-request chat bot built on the tmibot framework.
//!
//! Reads `songbot.toml` (or the path given as the first argument), joins
//! the configured channel, and serves song requests backed by `yt-dlp`
//! and `ffplay`.

use anyhow::Result;
use async_trait::async_trait;
use tmibot::commands::{Arg, Command, CommandHandler, ParamKind};
use tmibot::{Bot, BotConfig, ChatMessage, Context, EventHandler, HookResult};
use tracing::{error, info};

struct SongbotEvents;

#[async_trait]
impl EventHandler for SongbotEvents {
    async fn ready(&self, ctx: &Context) -> HookResult {
        info!(channel = %ctx.config().channel_name(), "songbot ready");
        ctx.say("songbot online, try !help")?;
        Ok(())
    }

    async fn user_join(&self, _ctx: &Context, user: &str) -> HookResult {
        info!(user = %user, "joined the channel");
        Ok(())
    }
}

/// Queues the requested song; shared by `!song` and `!playlist add`.
struct Song;

#[async_trait]
impl CommandHandler for Song {
    async fn run(&self, ctx: &Context, message: &ChatMessage, args: Vec<Arg>) -> HookResult {
        let query = args.first().map(ToString::to_string).unwrap_or_default();
        info!(user = %message.author, query = %query, "song request");
        ctx.player().enqueue(query.clone());
        ctx.say(format!("queued: {query}"))?;
        Ok(())
    }
}

/// Falls back when no `playlist` subcommand matches.
struct PlaylistUsage;

#[async_trait]
impl CommandHandler for PlaylistUsage {
    async fn run(&self, ctx: &Context, _message: &ChatMessage, _args: Vec<Arg>) -> HookResult {
        ctx.say("usage: !playlist add <query> | !playlist clear")?;
        Ok(())
    }
}

struct PlaylistClear;

#[async_trait]
impl CommandHandler for PlaylistClear {
    async fn run(&self, ctx: &Context, _message: &ChatMessage, _args: Vec<Arg>) -> HookResult {
        ctx.player().stop();
        ctx.say("playlist cleared")?;
        Ok(())
    }
}

struct Help;

#[async_trait]
impl CommandHandler for Help {
    async fn run(&self, ctx: &Context, _message: &ChatMessage, _args: Vec<Arg>) -> HookResult {
        let prefix = &ctx.config().prefix;
        let listed: Vec<String> = ctx
            .commands()
            .iter()
            .filter(|command| command.is_listed())
            .map(|command| format!("{prefix}{}", command.name()))
            .collect();
        ctx.say(format!("commands: {}", listed.join(", ")))?;
        Ok(())
    }
}

struct Shutdown;

#[async_trait]
impl CommandHandler for Shutdown {
    async fn run(&self, ctx: &Context, message: &ChatMessage, _args: Vec<Arg>) -> HookResult {
        info!(user = %message.author, "shutdown requested");
        ctx.say("going offline")?;
        ctx.stop(false).await;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tmibot::telemetry::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "songbot.toml".to_string());
    let config = BotConfig::load(&path).map_err(|e| {
        error!(path = %path, error = %e, "failed to load config");
        e
    })?;

    let bot = Bot::builder(config)
        .events(SongbotEvents)
        .command(
            Command::new("song", Song)
                .alias("sr")
                .describe("queue a song by name or link")
                .param("query", ParamKind::Text),
        )?
        .command(
            Command::new("playlist", PlaylistUsage)
                .describe("manage the request queue")
                .subcommand(
                    Command::new("add", Song)
                        .describe("queue a song")
                        .param("query", ParamKind::Text),
                )
                .subcommand(
                    Command::new("clear", PlaylistClear)
                        .describe("drop the queue and stop playback")
                        .admin(),
                ),
        )?
        .command(Command::new("help", Help).describe("list commands"))?
        .command(
            Command::new("shutdown", Shutdown)
                .describe("stop the bot")
                .admin()
                .unlisted(),
        )?
        .build();

    bot.run().await?;
    Ok(())
}
