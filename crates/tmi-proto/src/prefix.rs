//! Sender prefixes on relayed chat lines.
//!
//! Lines relayed on behalf of a chat participant carry a prefix of the
//! form `:<name>!<name>@<name>.<host-suffix>`, with the same login name
//! repeated in all three positions (e.g.
//! `:ronni!ronni@ronni.tmi.twitch.tv`). Server-originated lines use other
//! prefixes and do not pass this parser.

use crate::error::ParseError;

/// A validated sender prefix, borrowed from the input line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SenderPrefix<'a> {
    /// Login name repeated in the nick, user, and host positions.
    pub name: &'a str,
    /// Host suffix after `<name>.` (e.g. `tmi.twitch.tv`).
    pub host_suffix: &'a str,
    /// Raw prefix without the leading `:`.
    pub raw: &'a str,
}

impl<'a> SenderPrefix<'a> {
    /// Parse a prefix token, with or without the leading `:`.
    ///
    /// All three name positions must agree, the name must be non-empty
    /// ASCII alphanumerics or underscores, and a non-empty host suffix
    /// must follow the third name.
    pub fn parse(s: &'a str) -> Result<Self, ParseError> {
        let raw = s.strip_prefix(':').unwrap_or(s);
        let invalid = || ParseError::InvalidPrefix(raw.to_string());

        let bang = raw.find('!').ok_or_else(invalid)?;
        let at = raw.find('@').ok_or_else(invalid)?;
        if at < bang {
            return Err(invalid());
        }

        let name = &raw[..bang];
        let user = &raw[bang + 1..at];
        let host = &raw[at + 1..];

        if !is_login_name(name) || user != name {
            return Err(invalid());
        }

        let dot = host.find('.').ok_or_else(invalid)?;
        let host_suffix = &host[dot + 1..];
        if &host[..dot] != name || host_suffix.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            name,
            host_suffix,
            raw,
        })
    }
}

/// Login names are non-empty ASCII alphanumerics or underscores.
pub(crate) fn is_login_name(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
