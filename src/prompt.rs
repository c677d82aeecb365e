//! Prompt assembly and provider destination URLs.

use crate::acquire::ContentReference;
use crate::config::ProviderConfig;
use tracing::warn;

pub const DEFAULT_PROMPT_TEMPLATE: &str = "Read {url} so I can ask questions about it.";

const PREAMBLE: &str = "Here is documentation content:";
const POSTAMBLE: &str = "I have questions about this.";

/// Build the prompt text for `reference`.
///
/// URL references go through the provider's prompt template and are never
/// bounded. Inline Markdown longer than `max_len` characters is cut to
/// `max_len` and followed by a notice pointing at `page_url`.
pub fn assemble_prompt(
    reference: &ContentReference,
    provider: &ProviderConfig,
    max_len: usize,
    page_url: &str,
) -> String {
    match reference {
        ContentReference::Url(url) => provider
            .prompt_template
            .as_deref()
            .unwrap_or(DEFAULT_PROMPT_TEMPLATE)
            .replace("{url}", url),
        ContentReference::Inline(markdown) => {
            let body = bounded_content(markdown, max_len, page_url);
            format!("{}\n\n{}\n\n{}", PREAMBLE, body, POSTAMBLE)
        }
    }
}

fn bounded_content(markdown: &str, max_len: usize, page_url: &str) -> String {
    let len = markdown.chars().count();
    if len <= max_len {
        return markdown.to_string();
    }

    warn!(from = len, to = max_len, "Content truncated");
    let truncated: String = markdown.chars().take(max_len).collect();
    format!(
        "{}\n\n[Content truncated after {} of {} characters. Full version: {}]",
        truncated, max_len, len, page_url
    )
}

/// Percent-encode `prompt` into the provider's `{prompt}` placeholder.
pub fn destination_url(provider: &ProviderConfig, prompt: &str) -> String {
    provider
        .url_template
        .replace("{prompt}", &urlencoding::encode(prompt))
}
