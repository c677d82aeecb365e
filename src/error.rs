use thiserror::Error;

/// Failures of a single copy/ask/view flow.
///
/// Every variant is caught at the flow boundary and shown as a short notice;
/// none of them should take the process down with a panic.
#[derive(Debug, Error)]
pub enum AssistError {
    /// The content selector matched nothing on the page.
    #[error("no element matches content selector `{selector}`")]
    ContentNotFound { selector: String },

    #[error("invalid content selector `{selector}`: {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// The Markdown twin could not be confirmed. Always recovered by inline
    /// conversion, never shown to the user.
    #[error("markdown probe failed: {0}")]
    ProbeFailed(String),

    #[error("markdown conversion failed: {0}")]
    ConversionFailed(String),

    #[error("delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("provider `{0}` is not configured")]
    ProviderMissing(String),

    #[error("feature `{0}` is disabled in the configuration")]
    FeatureDisabled(&'static str),

    #[error("failed to load page: {0}")]
    PageLoad(String),
}

impl AssistError {
    /// User-facing message for the transient notice.
    pub fn notice(&self) -> String {
        match self {
            AssistError::ContentNotFound { .. } | AssistError::InvalidSelector { .. } => {
                "Could not find page content to convert".to_string()
            }
            AssistError::ProbeFailed(_) | AssistError::ConversionFailed(_) => {
                "Failed to convert page to markdown".to_string()
            }
            AssistError::DeliveryFailed(_) => "Failed to deliver the result".to_string(),
            AssistError::ProviderMissing(_) => "AI provider configuration not found".to_string(),
            AssistError::FeatureDisabled(name) => format!("The {} feature is disabled", name),
            AssistError::PageLoad(_) => "Could not load the page".to_string(),
        }
    }
}
