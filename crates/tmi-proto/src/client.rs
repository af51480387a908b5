//! Outbound client messages.
//!
//! Each variant serializes to exactly one protocol line, without the
//! trailing CRLF (the codec appends it).

use std::fmt;

/// One outbound protocol line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClientMessage {
    /// `PASS <token>`: present the bearer token before `NICK`.
    Pass(String),
    /// `NICK <name>`: choose the login name.
    Nick(String),
    /// `JOIN <#channel>`: join a channel (wire form, `#` included).
    Join(String),
    /// `PART <#channel>`: leave a channel.
    Part(String),
    /// `PONG :<token>`: answer a liveness probe.
    Pong(String),
    /// `PRIVMSG <#channel> :<text>`: send chat text.
    Privmsg {
        /// Target channel in wire form.
        channel: String,
        /// Message text.
        text: String,
    },
    /// `CAP REQ :<capability>`: request a capability.
    CapReq(String),
    /// Raw passthrough line, sent as-is.
    Raw(String),
}

impl ClientMessage {
    /// Build a `PRIVMSG` for a channel.
    pub fn privmsg(channel: impl Into<String>, text: impl Into<String>) -> Self {
        ClientMessage::Privmsg {
            channel: channel.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientMessage::Pass(token) => write!(f, "PASS {}", token),
            ClientMessage::Nick(name) => write!(f, "NICK {}", name),
            ClientMessage::Join(channel) => write!(f, "JOIN {}", channel),
            ClientMessage::Part(channel) => write!(f, "PART {}", channel),
            ClientMessage::Pong(token) => write!(f, "PONG :{}", token),
            ClientMessage::Privmsg { channel, text } => {
                write!(f, "PRIVMSG {} :{}", channel, text)
            }
            ClientMessage::CapReq(cap) => write!(f, "CAP REQ :{}", cap),
            ClientMessage::Raw(line) => write!(f, "{}", line),
        }
    }
}
