//! Transport-only assistant backend client primitives.
//!
//! This crate owns the wire contract for the assistant chat backend: the
//! closed set of inbound events, the outbound command envelope, and the
//! WebSocket connection that carries both. It intentionally contains no
//! transcript or session state and no UI coupling; consumers feed decoded
//! [`ChatEvent`] values into their own state machine.
//!
//! One text frame equals one event or one command. Frames that do not decode
//! into the closed event set are reported as [`AssistantApiError::Decode`]
//! so callers can drop them without tearing down the connection.

pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod message;
pub mod socket;
pub mod url;

pub use command::ChatCommand;
pub use config::BackendConfig;
pub use error::AssistantApiError;
pub use events::{decode_frame, ChatEvent, StreamChunk, SummarySections};
pub use message::{ChatMessage, Rating};
pub use socket::ChatSocket;
pub use url::{chat_socket_url, http_base_url};
