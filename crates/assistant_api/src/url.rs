/// Build the chat WebSocket endpoint for a backend host and port.
pub fn chat_socket_url(host: &str, port: u16) -> String {
    format!("ws://{}:{port}/ws/chat/", host.trim())
}

/// Build the HTTP base URL shared by the collaborator services.
pub fn http_base_url(host: &str, port: u16) -> String {
    format!("http://{}:{port}", host.trim())
}
