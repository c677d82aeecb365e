//! Chooses how page content reaches a prompt: by pointing at a pre-generated
//! Markdown twin, or by converting the page locally and inlining the result.

use crate::config::Config;
use crate::error::AssistError;
use crate::extract::{extract_content, PageContentRequest};
use crate::markdown::html_to_markdown;
use crate::markdown_url::derive_markdown_url;
use crate::probe::MarkdownProbe;
use scraper::Html;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentReference {
    /// An existing Markdown resource
    Url(String),
    /// The converted page itself
    Inline(String),
}

/// Produce a content reference for `request` against the rendered page.
///
/// The content root is located before anything else, so a page without one
/// fails with `ContentNotFound` before any probe is sent.
pub async fn acquire(
    request: &PageContentRequest,
    page_html: &str,
    config: &Config,
    probe: &dyn MarkdownProbe,
) -> Result<ContentReference, AssistError> {
    let content = extract_content(&Html::parse_document(page_html), &request.selector)?;

    if config.use_pregenerated_markdown {
        let candidate = derive_markdown_url(
            &request.location,
            config.base_url(),
            config.local_root.as_deref(),
        );

        match tokio::time::timeout(config.probe_timeout(), probe.probe(&candidate)).await {
            Ok(Ok(())) => {
                info!(url = %candidate, "Using pre-generated markdown");
                return Ok(ContentReference::Url(candidate));
            }
            Ok(Err(e)) => debug!(error = %e, "Pre-generated markdown not found, converting"),
            Err(_) => debug!(url = %candidate, "Markdown probe timed out, converting"),
        }
    }

    let markdown = html_to_markdown(&content)?;
    debug!(len = markdown.chars().count(), "Markdown generated");
    Ok(ContentReference::Inline(markdown))
}
