//! Error types for the TMI protocol library.
//!
//! This module defines error types for transport-level failures and for
//! server lines that matched a known shape but could not be decomposed.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Top-level protocol errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 bytes in a received line.
    #[error("invalid UTF-8 in line at byte {byte_pos}: {details}")]
    InvalidUtf8 {
        /// Byte position where UTF-8 validation failed.
        byte_pos: usize,
        /// Detailed error message from the UTF-8 decoder.
        details: String,
    },

    /// Line exceeded maximum allowed length.
    #[error("message too long: {actual} bytes (limit: {limit})")]
    MessageTooLong {
        /// Actual line length.
        actual: usize,
        /// Maximum allowed length.
        limit: usize,
    },

    /// Illegal control character in a line.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),

    /// Failed to parse a server line.
    #[error("invalid line: {line}")]
    InvalidLine {
        /// The offending line.
        line: String,
        /// The underlying parse error.
        #[source]
        cause: ParseError,
    },
}

/// Errors encountered when classifying server lines.
///
/// These are raised only when a line matched a recognized command keyword
/// but its fields could not be extracted. Lines with an unrecognized
/// keyword parse to [`crate::ServerEvent::Unknown`] instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// Line was empty.
    #[error("empty line")]
    EmptyLine,

    /// Line had a prefix but no command keyword after it.
    #[error("missing command")]
    MissingCommand,

    /// PING carried no token to echo.
    #[error("ping without token")]
    MissingPingToken,

    /// Command requires a sender prefix but the line had none.
    #[error("missing sender prefix")]
    MissingPrefix,

    /// Sender prefix did not match the `name!name@name.host` shape.
    #[error("invalid sender prefix: {0}")]
    InvalidPrefix(String),

    /// PRIVMSG had no `#channel :text` section.
    #[error("missing message text")]
    MissingText,

    /// MODE arguments were not `#channel +o user` or `#channel -o user`.
    #[error("invalid mode arguments: {0}")]
    InvalidModeArgs(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProtocolError::MessageTooLong {
            actual: 2048,
            limit: 1024,
        };
        assert_eq!(
            format!("{}", err),
            "message too long: 2048 bytes (limit: 1024)"
        );

        let err = ParseError::InvalidPrefix("jtv".to_string());
        assert_eq!(format!("{}", err), "invalid sender prefix: jtv");
    }

    #[test]
    fn test_error_source_chaining() {
        let cause = ParseError::MissingText;
        let err = ProtocolError::InvalidLine {
            line: "PRIVMSG #chan".to_string(),
            cause: cause.clone(),
        };

        let source = std::error::Error::source(&err);
        assert!(source.is_some());
        assert_eq!(source.unwrap().to_string(), cause.to_string());
    }

    #[test]
    fn test_error_conversion() {
        let io_err =
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let protocol_err: ProtocolError = io_err.into();

        match protocol_err {
            ProtocolError::Io(_) => {}
            _ => panic!("Expected Io variant"),
        }
    }
}
