//! Connection management: TCP connect plus the fixed-order login
//! handshake.

use rand::Rng;
use tmi_proto::{ClientMessage, Transport, TransportReader, TransportWriter};
use tracing::{debug, info};

use crate::config::BotConfig;
use crate::error::BotError;

/// Capabilities requested after joining. `membership` restores JOIN, PART,
/// and MODE events for the channel; `commands` adds the dialect's notice
/// extensions.
const CAPABILITIES: [&str; 2] = ["twitch.tv/membership", "twitch.tv/commands"];

/// An authenticated connection to the chat server.
pub struct Connection {
    transport: Transport,
}

impl Connection {
    /// Connect and log in: `PASS`, `NICK`, `JOIN`, then one `CAP REQ` per
    /// capability, in that order. Without both credentials the login is
    /// anonymous and `PASS` is skipped.
    pub async fn open(config: &BotConfig) -> Result<Self, BotError> {
        info!(host = %config.host, port = config.port, "connecting");
        let mut transport = Transport::connect(&config.host, config.port).await?;

        let (nick, login) = login_sequence(config);
        for message in login {
            debug!(line = %message, "handshake");
            transport.send(message).await?;
        }
        info!(nick = %nick, channel = %config.channel_name(), "logged in");

        Ok(Self { transport })
    }

    /// Read the next decoded line, or `None` at end of stream.
    pub async fn read_line(&mut self) -> Result<Option<String>, BotError> {
        Ok(self.transport.read_line().await?)
    }

    /// Write one message, fire and forget.
    pub async fn send(&mut self, message: ClientMessage) -> Result<(), BotError> {
        Ok(self.transport.send(message).await?)
    }

    /// Split into read and write halves for the run loop.
    pub fn into_parts(self) -> (TransportReader, TransportWriter) {
        self.transport.into_split()
    }

    /// Drop the transport, closing the socket.
    pub fn disconnect(self) {}
}

/// The login messages in send order, plus the nickname used.
fn login_sequence(config: &BotConfig) -> (String, Vec<ClientMessage>) {
    let mut messages = Vec::with_capacity(3 + CAPABILITIES.len());

    let nick = match (&config.oauth, &config.username) {
        (Some(oauth), Some(username)) => {
            messages.push(ClientMessage::Pass(oauth.clone()));
            username.clone()
        }
        // The dialect accepts a throwaway nickname for read-only use.
        _ => anonymous_nick(),
    };
    messages.push(ClientMessage::Nick(nick.clone()));
    messages.push(ClientMessage::Join(config.channel_name()));
    messages.extend(CAPABILITIES.iter().map(|cap| ClientMessage::CapReq(cap.to_string())));

    (nick, messages)
}

fn anonymous_nick() -> String {
    format!("justinfan{}", rand::thread_rng().gen_range(10_000..100_000))
}
