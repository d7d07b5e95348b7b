/*
[INPUT]:  WebSocket URL, outbound JSON control frames
[OUTPUT]: Raw inbound frames (text, binary, close)
[POS]:    WebSocket layer - transport abstraction and its implementations
[UPDATE]: When changing transport behaviour or the scripted test stub
*/

use std::collections::VecDeque;
use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use flate2::Compression;
use flate2::write::GzEncoder;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info};

use crate::error::{HuobiError, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// One inbound frame as seen by the protocol handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
    /// Closing frame, or the end of the underlying stream.
    Close,
}

impl Frame {
    pub fn is_closing(&self) -> bool {
        matches!(self, Frame::Close)
    }

    /// Plain JSON text frame.
    pub fn json(value: &Value) -> Self {
        Frame::Text(value.to_string())
    }

    /// Gzip-compressed JSON binary frame, the encoding the market stream uses.
    pub fn gzip_json(value: &Value) -> Result<Self> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(value.to_string().as_bytes())
            .map_err(HuobiError::Gzip)?;
        Ok(Frame::Binary(encoder.finish().map_err(HuobiError::Gzip)?))
    }
}

/// Transport capability set consumed by the WebSocket clients.
///
/// A connection is owned by exactly one client. `send` connects first when no socket is open.
#[async_trait]
pub trait Connection: Send {
    /// URL the connection targets; also the signing target for private auth.
    fn url(&self) -> &str;

    /// Open a socket, replacing any existing one.
    async fn connect(&mut self) -> Result<()>;

    /// Serialize `message` as JSON and transmit it as one text frame.
    async fn send(&mut self, message: &Value) -> Result<()>;

    /// Wait for the next inbound frame.
    ///
    /// Fails with [`HuobiError::NotConnected`] if the connection was never opened and with
    /// [`HuobiError::Timeout`] when `timeout` elapses first.
    async fn receive(&mut self, timeout: Option<Duration>) -> Result<Frame>;

    /// Close the socket. Idempotent.
    async fn close(&mut self) -> Result<()>;

    /// `true` before the first connect and after an explicit close.
    fn is_closed(&self) -> bool;
}

/// tokio-tungstenite backed transport.
#[derive(Debug)]
pub struct WsConnection {
    url: String,
    stream: Option<WsStream>,
    opened: bool,
}

impl WsConnection {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            stream: None,
            opened: false,
        }
    }
}

#[async_trait]
impl Connection for WsConnection {
    fn url(&self) -> &str {
        &self.url
    }

    async fn connect(&mut self) -> Result<()> {
        if let Some(mut previous) = self.stream.take() {
            // Peer may already be gone; nothing useful to do with the error.
            if let Err(err) = previous.close(None).await {
                debug!(error = %err, "ws previous socket close failed");
            }
        }

        let (stream, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| HuobiError::WebSocket(e.to_string()))?;
        self.stream = Some(stream);
        self.opened = true;
        info!(url = %self.url, "ws connected");
        Ok(())
    }

    async fn send(&mut self, message: &Value) -> Result<()> {
        if self.stream.is_none() {
            self.connect().await?;
        }
        let stream = self.stream.as_mut().ok_or(HuobiError::NotConnected)?;
        stream
            .send(WsMessage::Text(message.to_string().into()))
            .await
            .map_err(|e| HuobiError::WebSocket(e.to_string()))
    }

    async fn receive(&mut self, timeout: Option<Duration>) -> Result<Frame> {
        let Some(stream) = self.stream.as_mut() else {
            return if self.opened {
                Ok(Frame::Close)
            } else {
                Err(HuobiError::NotConnected)
            };
        };

        loop {
            let incoming = match timeout {
                Some(duration) => tokio::time::timeout(duration, stream.next())
                    .await
                    .map_err(|_| HuobiError::Timeout {
                        duration_ms: duration.as_millis() as u64,
                    })?,
                None => stream.next().await,
            };

            match incoming {
                Some(Ok(WsMessage::Text(text))) => return Ok(Frame::Text(text.as_str().to_owned())),
                Some(Ok(WsMessage::Binary(bytes))) => return Ok(Frame::Binary(bytes.to_vec())),
                // tungstenite queues the pong reply itself
                Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => continue,
                Some(Ok(WsMessage::Frame(_))) => continue,
                Some(Ok(WsMessage::Close(frame))) => {
                    debug!(?frame, "ws close frame received");
                    return Ok(Frame::Close);
                }
                Some(Err(err)) => return Err(HuobiError::WebSocket(err.to_string())),
                None => return Ok(Frame::Close),
            }
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            if let Err(err) = stream.close(None).await {
                debug!(error = %err, "ws close handshake failed");
            }
            info!(url = %self.url, "ws closed");
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.stream.is_none()
    }
}

#[derive(Debug)]
enum ScriptStep {
    Frame(Frame),
    Timeout,
}

/// In-memory transport that replays a fixed frame script and records every sent message.
///
/// Receiving the last scripted frame marks the stub closed, the same way a server hanging up
/// after its final message would. Once the script is exhausted `receive` yields
/// [`Frame::Close`].
#[derive(Debug)]
pub struct ScriptedConnection {
    url: String,
    script: VecDeque<ScriptStep>,
    sent: Vec<Value>,
    closed: bool,
    opened: bool,
    connects: usize,
}

impl ScriptedConnection {
    pub fn new(url: impl Into<String>, frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            url: url.into(),
            script: frames.into_iter().map(ScriptStep::Frame).collect(),
            sent: Vec::new(),
            closed: true,
            opened: false,
            connects: 0,
        }
    }

    /// Append a frame to the end of the script.
    pub fn push_frame(&mut self, frame: Frame) {
        self.script.push_back(ScriptStep::Frame(frame));
    }

    /// Append a receive timeout to the end of the script.
    pub fn push_timeout(&mut self) {
        self.script.push_back(ScriptStep::Timeout);
    }

    /// Messages sent so far, in order.
    pub fn sent(&self) -> &[Value] {
        &self.sent
    }

    /// Number of `connect` calls, reconnects included.
    pub fn connect_count(&self) -> usize {
        self.connects
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    fn url(&self) -> &str {
        &self.url
    }

    async fn connect(&mut self) -> Result<()> {
        self.closed = false;
        self.opened = true;
        self.connects += 1;
        Ok(())
    }

    async fn send(&mut self, message: &Value) -> Result<()> {
        if self.closed {
            self.connect().await?;
        }
        self.sent.push(message.clone());
        Ok(())
    }

    async fn receive(&mut self, timeout: Option<Duration>) -> Result<Frame> {
        if !self.opened {
            return Err(HuobiError::NotConnected);
        }
        let step = self.script.pop_front();
        if self.script.is_empty() {
            self.closed = true;
        }
        match step {
            Some(ScriptStep::Frame(frame)) => Ok(frame),
            Some(ScriptStep::Timeout) => Err(HuobiError::Timeout {
                duration_ms: timeout.map_or(0, |d| d.as_millis() as u64),
            }),
            None => Ok(Frame::Close),
        }
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
