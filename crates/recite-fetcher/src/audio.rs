use std::io::Write;
use std::path::{Path, PathBuf};

use recite_core::fetcher::FetchError;
use tempfile::NamedTempFile;

/// A present, non-empty regular file
pub async fn file_ready(path: &Path) -> bool {
    match tokio::fs::metadata(path).await {
        Ok(meta) => meta.is_file() && meta.len() > 0,
        Err(_) => false,
    }
}

/// Download `source` into `target` through a temp file in the same directory,
/// so readers only ever see the old file or the complete new one.
pub async fn download_to_file(
    client: &reqwest::Client,
    source: &str,
    target: &Path,
) -> Result<(), FetchError> {
    let response = client.get(source).send().await?;
    if !response.status().is_success() {
        return Err(FetchError::Status(response.status().as_u16()));
    }
    let bytes = response.bytes().await?;
    if bytes.is_empty() {
        return Err(FetchError::EmptyContent(source.to_string()));
    }

    let target: PathBuf = target.to_path_buf();
    tokio::task::spawn_blocking(move || -> std::io::Result<()> {
        let parent = target.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let mut temp_file = NamedTempFile::new_in(parent)?;
        temp_file.write_all(&bytes)?;
        temp_file.flush()?;
        temp_file.persist(&target)?;
        Ok(())
    })
    .await
    .map_err(std::io::Error::other)??;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn test_download_times_out_without_leaving_a_file() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        Mock::given(method("GET"))
            .and(path("/slow.mp3"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"ID3-audio".to_vec())
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
            .unwrap();
        let target = dir.path().join("en/sl/slow.mp3");

        let err = download_to_file(&client, &format!("{}/slow.mp3", server.uri()), &target)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(ref e) if e.is_timeout()), "{err}");
        assert!(!file_ready(&target).await);
    }

    #[tokio::test]
    async fn test_empty_body_is_rejected() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        Mock::given(method("GET"))
            .and(path("/empty.mp3"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let target = dir.path().join("am/em/empty.mp3");
        let err = download_to_file(&client, &format!("{}/empty.mp3", server.uri()), &target)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::EmptyContent(_)));
        assert!(!target.exists());
    }
}
