use std::time::Duration;

use crate::url::{chat_socket_url, http_base_url};

pub const DEFAULT_BACKEND_HOST: &str = "127.0.0.1";
pub const DEFAULT_BACKEND_PORT: u16 = 8000;

/// Transport configuration for the assistant backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Backend host name or address.
    pub host: String,
    /// Backend port serving both the WebSocket and the HTTP collaborators.
    pub port: u16,
    /// Optional cap on connection establishment.
    pub connect_timeout: Option<Duration>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BACKEND_HOST.to_string(),
            port: DEFAULT_BACKEND_PORT,
            connect_timeout: None,
        }
    }
}

impl BackendConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn socket_url(&self) -> String {
        chat_socket_url(&self.host, self.port)
    }

    pub fn http_base_url(&self) -> String {
        http_base_url(&self.host, self.port)
    }
}
