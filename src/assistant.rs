//! User-facing flows: copy, ask, view.
//!
//! Every flow goes idle -> working -> success | error. Errors end at this
//! boundary as a [`Notice`]; one flow runs at a time per [`Assistant`].

use crate::acquire::{acquire, ContentReference};
use crate::config::Config;
use crate::error::AssistError;
use crate::extract::{extract_content, PageContentRequest};
use crate::markdown::html_to_markdown;
use crate::page::Page;
use crate::probe::MarkdownProbe;
use crate::prompt::{assemble_prompt, destination_url};
use scraper::Html;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct Assistant {
    config: Config,
    probe: Arc<dyn MarkdownProbe>,
    busy: Mutex<()>,
}

impl Assistant {
    pub fn new(config: Config, probe: Arc<dyn MarkdownProbe>) -> Self {
        Self {
            config,
            probe,
            busy: Mutex::new(()),
        }
    }

    fn request(&self, page: &Page) -> PageContentRequest {
        PageContentRequest {
            selector: self.config.content_selector.clone(),
            location: page.location.clone(),
        }
    }

    /// Convert the page to Markdown. Never probes for a pre-generated twin.
    pub async fn copy_markdown(&self, page: &Page) -> Result<String, AssistError> {
        if !self.config.features.markdown_export {
            return Err(AssistError::FeatureDisabled("markdown_export"));
        }
        let _working = self.busy.lock().await;

        let request = self.request(page);
        debug!(selector = %request.selector, "Looking for content");
        let content = extract_content(&Html::parse_document(&page.html), &request.selector)?;
        let markdown = html_to_markdown(&content)?;
        info!(len = markdown.chars().count(), "Markdown generated");
        Ok(markdown)
    }

    /// Destination URL that opens `provider_key` seeded with this page.
    pub async fn chat_destination(
        &self,
        page: &Page,
        provider_key: &str,
    ) -> Result<String, AssistError> {
        if !self.config.features.ai_chat {
            return Err(AssistError::FeatureDisabled("ai_chat"));
        }
        let provider = self
            .config
            .providers
            .get(provider_key)
            .filter(|p| p.enabled)
            .ok_or_else(|| AssistError::ProviderMissing(provider_key.to_string()))?;

        let _working = self.busy.lock().await;
        info!(provider = provider_key, "Preparing AI chat");

        let reference = acquire(
            &self.request(page),
            &page.html,
            &self.config,
            self.probe.as_ref(),
        )
        .await?;
        let prompt = assemble_prompt(
            &reference,
            provider,
            self.config.max_content_length,
            &page.location,
        );
        Ok(destination_url(provider, &prompt))
    }

    /// The Markdown twin's URL when it exists, else the converted page.
    pub async fn view_markdown(&self, page: &Page) -> Result<ContentReference, AssistError> {
        if !self.config.features.view_markdown {
            return Err(AssistError::FeatureDisabled("view_markdown"));
        }
        let _working = self.busy.lock().await;
        acquire(
            &self.request(page),
            &page.html,
            &self.config,
            self.probe.as_ref(),
        )
        .await
    }
}

/// Short message shown once a flow settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub is_error: bool,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }
}

impl From<&AssistError> for Notice {
    fn from(err: &AssistError) -> Self {
        Self {
            message: err.notice(),
            is_error: true,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error {
            write!(f, "error: {}", self.message)
        } else {
            f.write_str(&self.message)
        }
    }
}
