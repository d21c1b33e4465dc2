use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::error::{ensure_success, ClientError};

/// Maximum length, in characters, of a derived prompt name.
pub const PROMPT_NAME_MAX_CHARS: usize = 50;

/// One saved prompt template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PromptEntry {
    pub prompt_id: String,
    pub name: String,
    pub prompt: String,
}

#[derive(Debug, Deserialize)]
struct PromptLibraryResponse {
    prompt_library: Vec<PromptEntry>,
}

#[derive(Debug, Deserialize)]
struct PromptAddResponse {
    prompt_id: String,
}

/// Thin client for the `/plibrary/*` routes.
#[derive(Debug, Clone)]
pub struct PromptLibraryClient {
    http: reqwest::Client,
    base_url: String,
}

impl PromptLibraryClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<PromptEntry>, ClientError> {
        let response = self
            .http
            .get(format!("{}/plibrary/list", self.base_url))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: PromptLibraryResponse = response.json().await?;
        Ok(body.prompt_library)
    }

    /// Returns the server-assigned prompt id.
    pub async fn add(
        &self,
        user_id: &str,
        name: &str,
        prompt: &str,
    ) -> Result<String, ClientError> {
        let response = self
            .http
            .get(format!("{}/plibrary/add", self.base_url))
            .query(&[("user_id", user_id), ("name", name), ("prompt", prompt)])
            .send()
            .await?;
        let response = ensure_success(response).await?;
        let body: PromptAddResponse = response.json().await?;
        Ok(body.prompt_id)
    }

    pub async fn update(
        &self,
        prompt_id: &str,
        name: &str,
        prompt: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .http
            .get(format!("{}/plibrary/update", self.base_url))
            .query(&[("prompt_id", prompt_id), ("name", name), ("prompt", prompt)])
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    pub async fn delete(&self, prompt_id: &str) -> Result<(), ClientError> {
        let response = self
            .http
            .get(format!("{}/plibrary/delete", self.base_url))
            .query(&[("prompt_id", prompt_id)])
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

/// Derive a display name for a prompt from its text: the first line,
/// truncated on a character boundary.
pub fn derive_prompt_name(prompt: &str) -> String {
    prompt
        .lines()
        .next()
        .unwrap_or("")
        .chars()
        .take(PROMPT_NAME_MAX_CHARS)
        .collect()
}

/// Optimistic local view of the prompt library.
///
/// Add shows the new entry immediately under a temporary id that is swapped
/// for the server's id once the request lands; update and delete apply
/// locally first and roll back to a snapshot if the backend refuses.
#[derive(Debug, Clone, Default)]
pub struct PromptLibrary {
    prompts: Vec<PromptEntry>,
}

impl PromptLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> &[PromptEntry] {
        &self.prompts
    }

    pub async fn refresh(
        &mut self,
        client: &PromptLibraryClient,
        user_id: &str,
    ) -> Result<(), ClientError> {
        self.prompts = client.list(user_id).await?;
        Ok(())
    }

    /// Returns the final prompt id on success.
    pub async fn add(
        &mut self,
        client: &PromptLibraryClient,
        user_id: &str,
        prompt: &str,
    ) -> Result<String, ClientError> {
        let name = derive_prompt_name(prompt);
        let temp_id = Uuid::new_v4().to_string();
        self.prompts.push(PromptEntry {
            prompt_id: temp_id.clone(),
            name: name.clone(),
            prompt: prompt.to_owned(),
        });

        match client.add(user_id, &name, prompt).await {
            Ok(prompt_id) => {
                if let Some(entry) = self
                    .prompts
                    .iter_mut()
                    .find(|entry| entry.prompt_id == temp_id)
                {
                    entry.prompt_id = prompt_id.clone();
                }
                Ok(prompt_id)
            }
            Err(error) => {
                warn!(%error, "prompt add rejected, dropping optimistic entry");
                self.prompts.retain(|entry| entry.prompt_id != temp_id);
                Err(error)
            }
        }
    }

    pub async fn update(
        &mut self,
        client: &PromptLibraryClient,
        prompt_id: &str,
        prompt: &str,
    ) -> Result<(), ClientError> {
        let snapshot = self.prompts.clone();
        let name = derive_prompt_name(prompt);
        if let Some(entry) = self
            .prompts
            .iter_mut()
            .find(|entry| entry.prompt_id == prompt_id)
        {
            entry.name = name.clone();
            entry.prompt = prompt.to_owned();
        }

        if let Err(error) = client.update(prompt_id, &name, prompt).await {
            warn!(%error, "prompt update rejected, restoring previous library");
            self.prompts = snapshot;
            return Err(error);
        }
        Ok(())
    }

    pub async fn delete(
        &mut self,
        client: &PromptLibraryClient,
        prompt_id: &str,
    ) -> Result<(), ClientError> {
        let snapshot = self.prompts.clone();
        self.prompts.retain(|entry| entry.prompt_id != prompt_id);

        if let Err(error) = client.delete(prompt_id).await {
            warn!(%error, "prompt delete rejected, restoring previous library");
            self.prompts = snapshot;
            return Err(error);
        }
        Ok(())
    }
}
