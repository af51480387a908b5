//! In-process mock chat server for bot integration tests.
//!
//! The bot under test connects to a local listener; tests script the
//! server side of the conversation and assert on the lines the bot
//! writes back.

#![allow(dead_code)] // not every test binary uses every helper

use std::time::Duration;

use anyhow::bail;
use tmibot::BotConfig;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

/// Upper bound for any single expected line.
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Window in which an unexpected line would have to arrive.
pub const SILENCE_WINDOW: Duration = Duration::from_millis(250);

/// A listener playing the server side of the chat protocol.
pub struct MockTmiServer {
    listener: TcpListener,
}

impl MockTmiServer {
    pub async fn bind() -> anyhow::Result<Self> {
        Ok(Self {
            listener: TcpListener::bind("127.0.0.1:0").await?,
        })
    }

    /// Bot configuration pointing at this server: credentialed login,
    /// channel `dallas`, and `dallas` as the only admin.
    pub fn config(&self) -> anyhow::Result<BotConfig> {
        let addr = self.listener.local_addr()?;
        Ok(BotConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            oauth: Some("oauth:sekrit".to_string()),
            username: Some("songbot".to_string()),
            channel: "dallas".to_string(),
            prefix: "!".to_string(),
            admins: vec!["dallas".to_string()],
        })
    }

    /// Accept the bot's connection.
    pub async fn accept(&self) -> anyhow::Result<ServerConn> {
        let (stream, _) = timeout(READ_TIMEOUT, self.listener.accept()).await??;
        Ok(ServerConn::new(stream))
    }
}

/// The server end of one bot connection.
pub struct ServerConn {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl ServerConn {
    fn new(stream: TcpStream) -> Self {
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    /// Next line written by the bot, terminator stripped.
    pub async fn read_line(&mut self) -> anyhow::Result<String> {
        let mut line = String::new();
        let n = timeout(READ_TIMEOUT, self.reader.read_line(&mut line)).await??;
        if n == 0 {
            bail!("bot closed the connection");
        }
        Ok(line.trim_end().to_string())
    }

    /// Assert the next line from the bot.
    pub async fn expect_line(&mut self, expected: &str) -> anyhow::Result<()> {
        let line = self.read_line().await?;
        if line != expected {
            bail!("expected {expected:?}, got {line:?}");
        }
        Ok(())
    }

    /// Assert the bot writes nothing for [`SILENCE_WINDOW`].
    pub async fn expect_silence(&mut self) -> anyhow::Result<()> {
        let mut line = String::new();
        match timeout(SILENCE_WINDOW, self.reader.read_line(&mut line)).await {
            Err(_) => Ok(()),
            Ok(Ok(0)) => bail!("bot closed the connection"),
            Ok(Ok(_)) => bail!("expected silence, got {:?}", line.trim_end()),
            Ok(Err(e)) => Err(e.into()),
        }
    }

    /// Send one protocol line to the bot.
    pub async fn send_line(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        Ok(())
    }

    /// Relay chat text from `user` into the channel.
    pub async fn send_chat(&mut self, user: &str, text: &str) -> anyhow::Result<()> {
        self.send_line(&format!(
            ":{user}!{user}@{user}.tmi.twitch.tv PRIVMSG #dallas :{text}"
        ))
        .await
    }

    /// Read the five fixed-order login lines sent under the credentialed
    /// config.
    pub async fn complete_handshake(&mut self) -> anyhow::Result<Vec<String>> {
        let mut lines = Vec::with_capacity(5);
        for _ in 0..5 {
            lines.push(self.read_line().await?);
        }
        Ok(lines)
    }
}
