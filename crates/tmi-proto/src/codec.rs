//! TMI message codec for tokio.
//!
//! This module provides a codec that decodes raw server lines and encodes
//! [`ClientMessage`] values using the tokio codec framework.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::client::ClientMessage;
use crate::error;
use crate::line::LineCodec;

/// Tokio codec for TMI connections.
///
/// Wraps [`LineCodec`]: inbound lines are surfaced raw (terminator
/// stripped) so callers can log them before classification; outbound
/// [`ClientMessage`] values are serialized and terminated.
pub struct TmiCodec {
    inner: LineCodec,
}

impl TmiCodec {
    /// Create a new codec with the default line limit.
    pub fn new() -> Self {
        Self {
            inner: LineCodec::new(),
        }
    }

    /// Reject outgoing data that would break line framing.
    pub fn sanitize(data: &str) -> error::Result<()> {
        for ch in data.chars() {
            if ch == '\r' || ch == '\n' || ch == '\0' {
                return Err(error::ProtocolError::IllegalControlChar(ch));
            }
        }
        Ok(())
    }
}

impl Default for TmiCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for TmiCodec {
    type Item = String;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        self.inner.decode(src)
    }
}

impl Encoder<ClientMessage> for TmiCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: ClientMessage, dst: &mut BytesMut) -> error::Result<()> {
        let line = msg.to_string();
        Self::sanitize(&line)?;
        self.inner.encode(line, dst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_terminates_line() {
        let mut codec = TmiCodec::new();
        let mut buf = BytesMut::new();

        codec
            .encode(ClientMessage::privmsg("#dallas", "hello"), &mut buf)
            .unwrap();
        assert_eq!(&buf[..], b"PRIVMSG #dallas :hello\r\n");
    }

    #[test]
    fn test_encode_rejects_injected_newline() {
        let mut codec = TmiCodec::new();
        let mut buf = BytesMut::new();

        let result = codec.encode(
            ClientMessage::privmsg("#dallas", "hello\r\nJOIN #other"),
            &mut buf,
        );
        assert!(matches!(
            result,
            Err(error::ProtocolError::IllegalControlChar(_))
        ));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_surfaces_raw_line() {
        let mut codec = TmiCodec::new();
        let mut buf = BytesMut::from(":jtv MODE #dallas +o ronni\r\n");

        let result = codec.decode(&mut buf).unwrap();
        assert_eq!(result, Some(":jtv MODE #dallas +o ronni".to_string()));
    }
}
