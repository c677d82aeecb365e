//! Loading rendered pages from disk or over HTTP.

use crate::error::AssistError;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// A rendered page and the location it was loaded from.
#[derive(Debug, Clone)]
pub struct Page {
    pub html: String,
    pub location: String,
}

/// Load `source`: an `http(s)://` URL, a `file://` URL or a local path.
/// `location` overrides the page's own URL (for pages saved away from where
/// they are served).
pub async fn load_page(source: &str, location: Option<&str>) -> Result<Page, AssistError> {
    let page = if source.starts_with("http://") || source.starts_with("https://") {
        Page {
            html: fetch_html(source).await?,
            location: source.to_string(),
        }
    } else if source.starts_with("file://") {
        let path = Url::parse(source)
            .ok()
            .and_then(|url| url.to_file_path().ok())
            .ok_or_else(|| AssistError::PageLoad(format!("not a local file URL: {}", source)))?;
        read_local(&path).await?
    } else {
        read_local(Path::new(source)).await?
    };

    Ok(match location {
        Some(location) => Page {
            location: location.to_string(),
            ..page
        },
        None => page,
    })
}

async fn fetch_html(url: &str) -> Result<String, AssistError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| AssistError::PageLoad(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AssistError::PageLoad(format!("{}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AssistError::PageLoad(format!("HTTP {} for {}", status, url)));
    }

    debug!(url, "Fetched page");
    response
        .text()
        .await
        .map_err(|e| AssistError::PageLoad(format!("{}: {}", url, e)))
}

async fn read_local(path: &Path) -> Result<Page, AssistError> {
    let html = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| AssistError::PageLoad(format!("{}: {}", path.display(), e)))?;

    let absolute = tokio::fs::canonicalize(path)
        .await
        .map_err(|e| AssistError::PageLoad(format!("{}: {}", path.display(), e)))?;
    let location = Url::from_file_path(&absolute)
        .map_err(|_| {
            AssistError::PageLoad(format!("not an absolute path: {}", absolute.display()))
        })?
        .to_string();

    debug!(%location, "Read local page");
    Ok(Page { html, location })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn local_page_gets_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intro.html");
        fs::write(&path, "<article>Hi</article>").unwrap();

        let page = load_page(path.to_str().unwrap(), None).await.unwrap();

        assert_eq!(page.html, "<article>Hi</article>");
        assert!(page.location.starts_with("file:///"));
        assert!(page.location.ends_with("/intro.html"));
    }

    #[tokio::test]
    async fn location_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intro.html");
        fs::write(&path, "<article>Hi</article>").unwrap();

        let page = load_page(path.to_str().unwrap(), Some("https://docs.example.com/intro.html"))
            .await
            .unwrap();

        assert_eq!(page.location, "https://docs.example.com/intro.html");
    }

    #[tokio::test]
    async fn file_url_source_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intro.html");
        fs::write(&path, "<article>Hi</article>").unwrap();
        let url = Url::from_file_path(&path).unwrap();

        let page = load_page(url.as_str(), None).await.unwrap();

        assert_eq!(page.html, "<article>Hi</article>");
        assert!(page.location.ends_with("/intro.html"));
    }

    #[tokio::test]
    async fn malformed_file_url_is_page_load_error() {
        let err = load_page("file://remote-host/page.html", None).await.unwrap_err();
        assert!(matches!(err, AssistError::PageLoad(_)));
    }

    #[tokio::test]
    async fn missing_file_is_page_load_error() {
        let err = load_page("/definitely/not/here.html", None).await.unwrap_err();
        assert!(matches!(err, AssistError::PageLoad(_)));
    }
}
