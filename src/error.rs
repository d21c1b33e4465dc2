use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Failure taxonomy for the client core.
///
/// Nothing here is fatal to the process: decode and transport failures
/// degrade the transcript, collaborator failures are surfaced to the caller
/// for user-facing messaging.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] assistant_api::AssistantApiError),

    #[error("request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("collaborator request failed with HTTP {status}: {body}")]
    RequestFailed { status: StatusCode, body: String },

    #[error("I/O error while {operation} at {}: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    #[must_use]
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

/// Map a non-2xx response to [`ClientError::RequestFailed`] with its body.
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::RequestFailed { status, body })
}
