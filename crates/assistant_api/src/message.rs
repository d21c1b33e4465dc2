use serde::{Deserialize, Serialize};

/// User verdict attached to a rated bot message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Like,
    Dislike,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }
}

/// One transcript entry.
///
/// `id` is the client-local correlation key (a run id for streamed entries,
/// an epoch-millis stamp for local user echoes). `message_id` is the
/// server-assigned database id, attached only once generation finishes.
/// The same shape travels on the wire as a `chat_load` history snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl ChatMessage {
    pub fn new(
        id: impl Into<String>,
        sender: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            sender: sender.into(),
            message: message.into(),
            message_id: None,
            rating: None,
        }
    }
}
