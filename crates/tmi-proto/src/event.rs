//! Classification of inbound server lines.
//!
//! [`ServerEvent`] implements [`FromStr`] over one decoded line. The
//! parser is structural rather than a full IRC grammar: it recognizes the
//! handful of command keywords the chat dialect actually delivers and
//! extracts their fields. Lines with an unrecognized keyword classify as
//! [`ServerEvent::Unknown`]; only a recognized keyword with unusable
//! fields is an error.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::prefix::SenderPrefix;

/// Direction of an operator mode change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeChange {
    /// `+o`: operator status granted.
    Op,
    /// `-o`: operator status removed.
    Deop,
}

impl fmt::Display for ModeChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeChange::Op => write!(f, "+o"),
            ModeChange::Deop => write!(f, "-o"),
        }
    }
}

/// One server line, classified.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ServerEvent {
    /// Liveness probe; must be answered with a `PONG` echoing the token.
    Ping {
        /// Token to echo back, leading `:` stripped.
        token: String,
    },
    /// Chat message relayed into the joined channel.
    Message {
        /// Login name of the author.
        sender: String,
        /// Message text after the channel marker.
        text: String,
    },
    /// A participant joined the channel.
    Join {
        /// Login name of the participant.
        user: String,
    },
    /// A participant left the channel.
    Part {
        /// Login name of the participant.
        user: String,
    },
    /// Operator status changed for a participant.
    Mode {
        /// Grant or removal.
        change: ModeChange,
        /// Login name of the affected participant.
        user: String,
    },
    /// A line with a command keyword this dialect does not handle.
    Unknown {
        /// The full line as received.
        raw: String,
    },
}

impl FromStr for ServerEvent {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(ParseError::EmptyLine);
        }

        // Optional prefix token, then command keyword, then parameters.
        let (prefix, rest) = if line.starts_with(':') {
            match line.split_once(' ') {
                Some((prefix, rest)) => (Some(prefix), rest),
                None => (Some(line), ""),
            }
        } else {
            (None, line)
        };

        let (command, params) = match rest.split_once(' ') {
            Some((command, params)) => (command, params),
            None => (rest, ""),
        };

        match command {
            "" => Err(ParseError::MissingCommand),
            "PING" => parse_ping(params),
            "PRIVMSG" => parse_privmsg(prefix, params),
            "JOIN" => Ok(ServerEvent::Join {
                user: sender_name(prefix)?,
            }),
            "PART" => Ok(ServerEvent::Part {
                user: sender_name(prefix)?,
            }),
            "MODE" => parse_mode(params),
            _ => Ok(ServerEvent::Unknown {
                raw: line.to_string(),
            }),
        }
    }
}

fn parse_ping(params: &str) -> Result<ServerEvent, ParseError> {
    let token = params.strip_prefix(':').unwrap_or(params);
    if token.is_empty() {
        return Err(ParseError::MissingPingToken);
    }
    Ok(ServerEvent::Ping {
        token: token.to_string(),
    })
}

fn parse_privmsg(prefix: Option<&str>, params: &str) -> Result<ServerEvent, ParseError> {
    let sender = sender_name(prefix)?;

    // Parameters are `#channel :text`, text running to end of line.
    let (target, trailing) = params.split_once(' ').ok_or(ParseError::MissingText)?;
    if !target.starts_with('#') {
        return Err(ParseError::MissingText);
    }
    let text = trailing.strip_prefix(':').ok_or(ParseError::MissingText)?;
    if text.is_empty() {
        return Err(ParseError::MissingText);
    }

    Ok(ServerEvent::Message {
        sender,
        text: text.to_string(),
    })
}

// MODE lines arrive with a server prefix, so only the parameters matter.
fn parse_mode(params: &str) -> Result<ServerEvent, ParseError> {
    let invalid = || ParseError::InvalidModeArgs(params.to_string());

    let mut parts = params.split_whitespace();
    let channel = parts.next().ok_or_else(invalid)?;
    if !channel.starts_with('#') {
        return Err(invalid());
    }

    let change = match parts.next() {
        Some("+o") => ModeChange::Op,
        Some("-o") => ModeChange::Deop,
        _ => return Err(invalid()),
    };

    let user = parts.next().ok_or_else(invalid)?;
    Ok(ServerEvent::Mode {
        change,
        user: user.to_string(),
    })
}

fn sender_name(prefix: Option<&str>) -> Result<String, ParseError> {
    let prefix = prefix.ok_or(ParseError::MissingPrefix)?;
    Ok(SenderPrefix::parse(prefix)?.name.to_string())
}
