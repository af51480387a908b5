//! # tmi-proto
//!
//! A Rust library for the line-oriented chat protocol spoken by Twitch
//! chat (TMI), covering the client side: parsing server lines into typed
//! events, serializing outbound client messages, and framing both over a
//! TCP connection.
//!
//! ## Features
//!
//! - Classification of server lines into chat events (`PRIVMSG`, `JOIN`,
//!   `PART`, `MODE`, `PING`)
//! - Sender prefix validation for the `name!name@name.host` shape
//! - Single-line serialization of outbound client messages
//! - Optional Tokio integration: CRLF line codec and framed transport

#![deny(clippy::all)]
#![warn(missing_docs)]

//! ## Quick Start
//!
//! ### Parsing server lines
//!
//! ```rust
//! use tmi_proto::ServerEvent;
//!
//! let raw = ":ronni!ronni@ronni.tmi.twitch.tv PRIVMSG #dallas :Kappa";
//! match raw.parse::<ServerEvent>() {
//!     Ok(ServerEvent::Message { sender, text }) => {
//!         assert_eq!(sender, "ronni");
//!         assert_eq!(text, "Kappa");
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```
//!
//! ### Serializing client messages
//!
//! ```rust
//! use tmi_proto::ClientMessage;
//!
//! let msg = ClientMessage::privmsg("#dallas", "HeyGuys");
//! assert_eq!(msg.to_string(), "PRIVMSG #dallas :HeyGuys");
//! ```

pub mod client;
pub mod error;
pub mod event;
pub mod prefix;

#[cfg(feature = "tokio")]
pub mod codec;
#[cfg(feature = "tokio")]
pub mod line;
#[cfg(feature = "tokio")]
pub mod transport;

pub use self::client::ClientMessage;
pub use self::error::{ParseError, ProtocolError};
pub use self::event::{ModeChange, ServerEvent};
pub use self::prefix::SenderPrefix;

#[cfg(feature = "tokio")]
pub use self::codec::TmiCodec;
#[cfg(feature = "tokio")]
pub use self::line::{LineCodec, MAX_LINE_LEN};
#[cfg(feature = "tokio")]
pub use self::transport::{Transport, TransportReader, TransportWriter};
