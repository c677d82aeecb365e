//! Existence checks for pre-generated Markdown twins.

use crate::error::AssistError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Checks whether a Markdown resource exists. Only success or failure
/// matters; bodies are never read.
#[async_trait]
pub trait MarkdownProbe: Send + Sync {
    async fn probe(&self, url: &str) -> Result<(), AssistError>;
}

/// `HEAD` for http(s) URLs, a metadata lookup for `file://` URLs.
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> Result<Self, AssistError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| AssistError::ProbeFailed(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MarkdownProbe for HttpProbe {
    async fn probe(&self, url: &str) -> Result<(), AssistError> {
        let parsed =
            Url::parse(url).map_err(|e| AssistError::ProbeFailed(format!("{}: {}", url, e)))?;

        if parsed.scheme() == "file" {
            let path = parsed
                .to_file_path()
                .map_err(|_| AssistError::ProbeFailed(format!("not a local path: {}", url)))?;
            let metadata = tokio::fs::metadata(&path)
                .await
                .map_err(|e| AssistError::ProbeFailed(format!("{}: {}", path.display(), e)))?;
            if !metadata.is_file() {
                return Err(AssistError::ProbeFailed(format!("not a file: {}", path.display())));
            }
            return Ok(());
        }

        let response = self
            .client
            .head(parsed)
            .send()
            .await
            .map_err(|e| AssistError::ProbeFailed(e.to_string()))?;

        let status = response.status();
        debug!(url, %status, "Probe response");
        if !status.is_success() {
            return Err(AssistError::ProbeFailed(format!("HTTP {} for {}", status, url)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn probe() -> HttpProbe {
        HttpProbe::new(Duration::from_secs(1)).unwrap()
    }

    #[tokio::test]
    async fn local_twin_is_found() {
        let dir = tempfile::tempdir().unwrap();
        let twin = dir.path().join("page.md");
        fs::write(&twin, "# Page\n").unwrap();
        let url = Url::from_file_path(&twin).unwrap();

        probe().probe(url.as_str()).await.unwrap();
    }

    #[tokio::test]
    async fn missing_local_twin_fails() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_file_path(dir.path().join("absent.md")).unwrap();

        let err = probe().probe(url.as_str()).await.unwrap_err();
        assert!(matches!(err, AssistError::ProbeFailed(_)));
    }

    #[tokio::test]
    async fn directory_is_not_a_twin() {
        let dir = tempfile::tempdir().unwrap();
        let url = Url::from_file_path(dir.path()).unwrap();

        assert!(probe().probe(url.as_str()).await.is_err());
    }

    #[tokio::test]
    async fn unparseable_url_fails() {
        assert!(probe().probe("not a url").await.is_err());
    }
}
