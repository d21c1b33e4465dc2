use serde::Deserialize;
use tracing::debug;

use crate::error::{ensure_success, ClientError};

/// One saved conversation as the backend lists it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatSummary {
    pub session_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct ChatListResponse {
    chat_list: Vec<ChatSummary>,
}

/// Thin client for the `/chat/*` management routes.
#[derive(Debug, Clone)]
pub struct ChatListClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatListClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<ChatSummary>, ClientError> {
        let response = self
            .http
            .get(format!("{}/chat/list", self.base_url))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: ChatListResponse = response.json().await?;
        Ok(body.chat_list)
    }

    pub async fn rename(&self, session_id: &str, session_name: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .get(format!("{}/chat/update", self.base_url))
            .query(&[("session_id", session_id), ("session_name", session_name)])
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    pub async fn delete(&self, session_id: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .get(format!("{}/chat/delete", self.base_url))
            .query(&[("session_id", session_id)])
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Cached chat list. Mutations go through the backend first and the cache
/// only changes once the request succeeds, so a failed rename or delete
/// leaves the menu showing what the server still has.
#[derive(Debug, Clone, Default)]
pub struct ChatsMenu {
    chats: Vec<ChatSummary>,
}

impl ChatsMenu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chats(&self) -> &[ChatSummary] {
        &self.chats
    }

    pub async fn refresh(
        &mut self,
        client: &ChatListClient,
        user_id: &str,
    ) -> Result<(), ClientError> {
        self.chats = client.list(user_id).await?;
        debug!(count = self.chats.len(), "chat list refreshed");
        Ok(())
    }

    pub async fn rename(
        &mut self,
        client: &ChatListClient,
        session_id: &str,
        session_name: &str,
    ) -> Result<(), ClientError> {
        client.rename(session_id, session_name).await?;
        if let Some(chat) = self
            .chats
            .iter_mut()
            .find(|chat| chat.session_id == session_id)
        {
            chat.name = session_name.to_owned();
        }
        Ok(())
    }

    pub async fn delete(
        &mut self,
        client: &ChatListClient,
        session_id: &str,
    ) -> Result<(), ClientError> {
        client.delete(session_id).await?;
        self.chats.retain(|chat| chat.session_id != session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_list_response_decodes() {
        let body = r#"{"chat_list":[{"session_id":"s1","name":"Контракт"},{"session_id":"s2","name":"Новый чат"}]}"#;
        let parsed: ChatListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.chat_list.len(), 2);
        assert_eq!(parsed.chat_list[0].session_id, "s1");
        assert_eq!(parsed.chat_list[1].name, "Новый чат");
    }
}
