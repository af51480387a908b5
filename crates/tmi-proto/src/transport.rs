//! Framed TMI transport over TCP.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::warn;

use crate::client::ClientMessage;
use crate::codec::TmiCodec;
use crate::error::ProtocolError;

/// TMI transport over a framed TCP stream.
pub struct Transport {
    framed: Framed<TcpStream, TmiCodec>,
}

impl Transport {
    /// Connect to `host:port` and frame the stream.
    pub async fn connect(host: &str, port: u16) -> Result<Self, ProtocolError> {
        let stream = TcpStream::connect((host, port)).await?;
        Ok(Self::new(stream))
    }

    /// Frame an already connected stream.
    pub fn new(stream: TcpStream) -> Self {
        if let Err(e) = Self::enable_keepalive(&stream) {
            warn!("failed to enable TCP keepalive: {}", e);
        }

        Self {
            framed: Framed::new(stream, TmiCodec::new()),
        }
    }

    fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
        use socket2::{SockRef, TcpKeepalive};
        use std::time::Duration;

        let sock = SockRef::from(stream);
        let keepalive = TcpKeepalive::new()
            .with_time(Duration::from_secs(120))
            .with_interval(Duration::from_secs(30));

        sock.set_tcp_keepalive(&keepalive)?;
        Ok(())
    }

    /// Read the next line from the transport.
    ///
    /// Returns `Ok(None)` when the connection is closed.
    pub async fn read_line(&mut self) -> Result<Option<String>, ProtocolError> {
        match self.framed.next().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }

    /// Write one message to the transport.
    pub async fn send(&mut self, message: ClientMessage) -> Result<(), ProtocolError> {
        self.framed.send(message).await
    }

    /// Split into read and write halves for independent tasks.
    pub fn into_split(self) -> (TransportReader, TransportWriter) {
        let (sink, stream) = self.framed.split();
        (
            TransportReader { inner: stream },
            TransportWriter { inner: sink },
        )
    }
}

/// Read half of a split [`Transport`].
pub struct TransportReader {
    inner: SplitStream<Framed<TcpStream, TmiCodec>>,
}

impl TransportReader {
    /// Read the next line from the transport.
    ///
    /// Returns `Ok(None)` when the connection is closed.
    pub async fn read_line(&mut self) -> Result<Option<String>, ProtocolError> {
        match self.inner.next().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}

/// Write half of a split [`Transport`].
pub struct TransportWriter {
    inner: SplitSink<Framed<TcpStream, TmiCodec>, ClientMessage>,
}

impl TransportWriter {
    /// Write one message to the transport.
    pub async fn send(&mut self, message: ClientMessage) -> Result<(), ProtocolError> {
        self.inner.send(message).await
    }
}
