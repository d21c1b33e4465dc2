use std::fmt;

use serde_json::Error as JsonError;
use tokio_tungstenite::tungstenite::Error as WsError;

#[derive(Debug)]
pub enum AssistantApiError {
    Connect { url: String, source: WsError },
    ConnectTimeout { url: String },
    Transport(WsError),
    Decode(JsonError),
    Serialize(JsonError),
}

impl fmt::Display for AssistantApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connect { url, source } => {
                write!(f, "failed to connect to {url}: {source}")
            }
            Self::ConnectTimeout { url } => {
                write!(f, "timed out while connecting to {url}")
            }
            Self::Transport(error) => write!(f, "WebSocket transport error: {error}"),
            Self::Decode(error) => write!(f, "failed to decode event frame: {error}"),
            Self::Serialize(error) => write!(f, "failed to serialize command: {error}"),
        }
    }
}

impl std::error::Error for AssistantApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect { source, .. } => Some(source),
            Self::Transport(error) => Some(error),
            Self::Decode(error) | Self::Serialize(error) => Some(error),
            Self::ConnectTimeout { .. } => None,
        }
    }
}

impl From<WsError> for AssistantApiError {
    fn from(error: WsError) -> Self {
        Self::Transport(error)
    }
}
