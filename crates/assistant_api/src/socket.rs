use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::command::ChatCommand;
use crate::config::BackendConfig;
use crate::error::AssistantApiError;
use crate::events::{decode_frame, ChatEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// The single chat connection.
///
/// Owns the socket for its whole lifetime: [`ChatSocket::next_event`] yields
/// decoded events until the peer closes, and [`ChatSocket::send`] transmits
/// commands only while the connection is open. There is no reconnect here;
/// once the stream ends the socket is spent and a caller that wants a new
/// session must connect again.
#[derive(Debug)]
pub struct ChatSocket {
    inner: WsStream,
    open: bool,
}

impl ChatSocket {
    /// Establish the connection eagerly.
    pub async fn connect(config: &BackendConfig) -> Result<Self, AssistantApiError> {
        let url = config.socket_url();

        let connect = connect_async(url.clone());
        let (inner, _response) = match config.connect_timeout {
            Some(timeout) => tokio::time::timeout(timeout, connect)
                .await
                .map_err(|_| AssistantApiError::ConnectTimeout { url: url.clone() })?,
            None => connect.await,
        }
        .map_err(|source| AssistantApiError::Connect {
            url: url.clone(),
            source,
        })?;

        debug!(%url, "chat socket connected");
        Ok(Self { inner, open: true })
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Yield the next decoded event.
    ///
    /// Returns `None` once the connection has closed for any reason; a
    /// `Some(Err(..))` is a dropped frame (malformed or unknown), not a
    /// terminated stream, and the caller should keep polling.
    pub async fn next_event(&mut self) -> Option<Result<ChatEvent, AssistantApiError>> {
        if !self.open {
            return None;
        }

        loop {
            let frame = match self.inner.next().await {
                Some(Ok(frame)) => frame,
                Some(Err(error)) => {
                    self.open = false;
                    return Some(Err(AssistantApiError::Transport(error)));
                }
                None => {
                    self.open = false;
                    return None;
                }
            };

            match frame {
                Message::Text(text) => return Some(decode_frame(&text)),
                Message::Close(_) => {
                    debug!("chat socket closed by peer");
                    self.open = false;
                    return None;
                }
                // Pong replies are queued by tungstenite itself.
                Message::Ping(_) | Message::Pong(_) => continue,
                Message::Binary(_) | Message::Frame(_) => {
                    warn!("ignoring non-text frame on chat socket");
                    continue;
                }
            }
        }
    }

    /// Transmit one command frame.
    ///
    /// Returns `Ok(true)` when the frame was handed to the transport and
    /// `Ok(false)` when it was dropped because the connection is not open.
    /// Dropped commands are fire-and-forget: no queueing, no retry.
    pub async fn send(&mut self, command: &ChatCommand) -> Result<bool, AssistantApiError> {
        if !self.open {
            debug!(?command, "dropping command: chat socket is closed");
            return Ok(false);
        }

        let frame = serde_json::to_string(command).map_err(AssistantApiError::Serialize)?;
        match self.inner.send(Message::Text(frame)).await {
            Ok(()) => Ok(true),
            Err(error) => {
                warn!(%error, "dropping command: transport send failed");
                self.open = false;
                Ok(false)
            }
        }
    }
}
