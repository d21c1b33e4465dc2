use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{ensure_success, ClientError};

/// Pause before fetching so transcript updates triggered by the same
/// generation settle first.
pub const DOWNLOAD_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Run the deferred fetch-and-save for a `download` event.
///
/// Fire-and-forget: failures are logged, never retried, and never surfaced
/// as protocol errors.
pub fn spawn_download(
    http: reqwest::Client,
    base_url: String,
    filename: String,
    target_dir: PathBuf,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(DOWNLOAD_SETTLE_DELAY).await;
        match fetch_and_save(&http, &base_url, &filename, &target_dir).await {
            Ok(path) => debug!(path = %path.display(), "file auto-download finished"),
            Err(error) => warn!(%filename, %error, "file auto-download failed"),
        }
    })
}

/// Fetch `filename` from the backend's download route and write it under
/// `target_dir`, stripping any path components the server included.
pub async fn fetch_and_save(
    http: &reqwest::Client,
    base_url: &str,
    filename: &str,
    target_dir: &Path,
) -> Result<PathBuf, ClientError> {
    let response = http
        .get(format!("{base_url}/download"))
        .query(&[("filename", filename)])
        .send()
        .await?;
    let response = ensure_success(response).await?;
    let body = response.bytes().await?;

    let path = target_dir.join(sanitized_file_name(filename));
    tokio::fs::write(&path, &body)
        .await
        .map_err(|source| ClientError::io("writing downloaded file", &path, source))?;

    Ok(path)
}

fn sanitized_file_name(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty() && name != "." && name != "..")
        .unwrap_or_else(|| "download.bin".to_owned())
}
