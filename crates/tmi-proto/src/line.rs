//! Line-based codec for tokio.
//!
//! This module provides a codec that reads and writes CRLF-terminated
//! lines. Decoded lines are returned with the terminator stripped.

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::error;

/// Default maximum line length in bytes, terminator included.
pub const MAX_LINE_LEN: usize = 1024;

/// Line-based codec that handles newline-terminated messages.
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    /// Maximum line length
    max_len: usize,
}

impl LineCodec {
    /// Create a new codec with the default line limit.
    pub fn new() -> Self {
        Self {
            next_index: 0,
            max_len: MAX_LINE_LEN,
        }
    }

    /// Create a new codec with a custom max line length.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
        }
    }

    /// Validate that a stripped line contains no illegal control characters.
    fn validate_line(s: &str) -> error::Result<()> {
        for ch in s.chars() {
            if ch == '\0' || ch == '\r' {
                return Err(error::ProtocolError::IllegalControlChar(ch));
            }
        }
        Ok(())
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = error::ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<String>> {
        // Look for newline starting from where we left off
        if let Some(offset) = src[self.next_index..].iter().position(|b| *b == b'\n') {
            let line = src.split_to(self.next_index + offset + 1);
            self.next_index = 0;

            if line.len() > self.max_len {
                return Err(error::ProtocolError::MessageTooLong {
                    actual: line.len(),
                    limit: self.max_len,
                });
            }

            let mut data = String::from_utf8(line.to_vec()).map_err(|e| {
                error::ProtocolError::InvalidUtf8 {
                    byte_pos: e.utf8_error().valid_up_to(),
                    details: e.utf8_error().to_string(),
                }
            })?;

            // Strip the terminator
            let stripped = data.trim_end_matches(['\r', '\n']).len();
            data.truncate(stripped);

            Self::validate_line(&data)?;

            Ok(Some(data))
        } else {
            // No complete line yet - remember where we stopped
            self.next_index = src.len();

            // Check if partial line already exceeds limit
            if src.len() > self.max_len {
                return Err(error::ProtocolError::MessageTooLong {
                    actual: src.len(),
                    limit: self.max_len,
                });
            }

            Ok(None)
        }
    }
}

impl Encoder<String> for LineCodec {
    type Error = error::ProtocolError;

    fn encode(&mut self, msg: String, dst: &mut BytesMut) -> error::Result<()> {
        dst.reserve(msg.len() + 2);
        dst.extend(msg.into_bytes());
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}
