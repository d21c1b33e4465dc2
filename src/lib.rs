//! Chat client for the document-assistant backend.
//!
//! Invariant: single event-processing point — every decoded frame goes
//! through [`ChatApp::on_event`], in receipt order, from one task.
//!
//! # Public API Overview
//! - Connect with [`ChatClient::connect`] and drive the socket via
//!   [`ChatClient::run_until_closed`]; issue commands through the cloneable
//!   [`ChatClientHandle`].
//! - Inspect protocol state through [`ChatApp`] and its [`Transcript`].
//! - Manage saved chats and prompt templates with the [`services`]
//!   collaborators.

pub mod app;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod logging;
pub mod services;
pub mod transcript;

pub use crate::app::{
    AuthState, ChatApp, Effect, Session, EXTRACTION_NOTICE, LOCAL_USER_SENDER,
    SUMMARIZATION_NOTICE, THINKING_PLACEHOLDER,
};
pub use crate::client::{ChatClient, ChatClientHandle};
pub use crate::config::{AppConfig, DEFAULT_BOT_NAME};
pub use crate::error::ClientError;
pub use crate::transcript::Transcript;

/// Re-exported transport types callers need alongside the client.
pub use assistant_api::{BackendConfig, ChatCommand, ChatEvent, ChatMessage, Rating};
