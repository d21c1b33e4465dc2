use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::error::{ensure_success, ClientError};

/// Upload documents to the backend's summarization pipeline.
///
/// Every file goes into the same multipart form under the repeated `files`
/// field. The backend answers once all parts are stored; summarization is
/// triggered separately over the socket.
pub async fn upload_files(
    http: &reqwest::Client,
    base_url: &str,
    files: &[PathBuf],
) -> Result<(), ClientError> {
    let mut form = Form::new();
    for path in files {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ClientError::io("reading file for upload", path, source))?;
        form = form.part("files", Part::bytes(bytes).file_name(part_file_name(path)));
    }

    let response = http
        .post(format!("{base_url}/upload"))
        .multipart(form)
        .send()
        .await?;
    ensure_success(response).await?;
    debug!(count = files.len(), "upload finished");
    Ok(())
}

fn part_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.bin".to_owned())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::part_file_name;

    #[test]
    fn part_name_drops_directories() {
        assert_eq!(part_file_name(Path::new("/tmp/docs/contract.docx")), "contract.docx");
        assert_eq!(part_file_name(Path::new("contract.docx")), "contract.docx");
    }

    #[test]
    fn degenerate_paths_fall_back() {
        assert_eq!(part_file_name(Path::new("/")), "upload.bin");
    }
}
