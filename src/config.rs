//! Configuration for page2md.
//!
//! Loaded once from TOML and passed by reference to every component:
//! - `--config <FILE>` when given
//! - `./page2md.toml` when present
//! - built-in defaults otherwise
//!
//! Missing keys fall back to the defaults below. A `[providers]` table, when
//! present, replaces the default provider set as a whole.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_CONFIG_FILE: &str = "page2md.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CSS selector of the page's exportable content root
    pub content_selector: String,
    pub features: Features,
    pub providers: BTreeMap<String, ProviderConfig>,
    /// Look for a pre-generated `.md` twin before converting locally
    pub use_pregenerated_markdown: bool,
    /// Upper bound, in characters, for Markdown inlined into a prompt
    pub max_content_length: usize,
    pub probe_timeout_ms: u64,
    /// Public site root, used for `file://` pages and llms.txt
    pub base_url: Option<String>,
    /// Local directory that `base_url` is served from
    pub local_root: Option<String>,
    pub generate: GenerateConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_selector: default_content_selector(),
            features: Features::default(),
            providers: default_providers(),
            use_pregenerated_markdown: true,
            max_content_length: default_max_content_length(),
            probe_timeout_ms: default_probe_timeout_ms(),
            base_url: None,
            local_root: None,
            generate: GenerateConfig::default(),
        }
    }
}

fn default_content_selector() -> String {
    "article".to_string()
}

fn default_max_content_length() -> usize {
    4000
}

fn default_probe_timeout_ms() -> u64 {
    3000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub markdown_export: bool,
    pub view_markdown: bool,
    pub ai_chat: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            markdown_export: true,
            view_markdown: true,
            ai_chat: true,
        }
    }
}

/// An AI chat destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub label: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    /// Destination URL, with a `{prompt}` placeholder
    pub url_template: String,
    /// Prompt used when a Markdown URL is available, with a `{url}` placeholder
    #[serde(default)]
    pub prompt_template: Option<String>,
}

fn default_enabled() -> bool {
    true
}

fn default_providers() -> BTreeMap<String, ProviderConfig> {
    let provider =
        |label: &str, enabled: bool, icon: &str, url: &str, prompt: &str| ProviderConfig {
            label: label.to_string(),
            enabled,
            description: Some("Open AI chat with this page context".to_string()),
            icon: Some(icon.to_string()),
            url_template: url.to_string(),
            prompt_template: Some(prompt.to_string()),
        };

    let mut providers = BTreeMap::new();
    providers.insert(
        "claude".to_string(),
        provider(
            "Ask Claude",
            true,
            "claude.svg",
            "https://claude.ai/new?q={prompt}",
            "Hi! Please read this documentation page: {url}\n\nI have questions about it.",
        ),
    );
    providers.insert(
        "chatgpt".to_string(),
        provider(
            "Ask ChatGPT",
            true,
            "chatgpt.svg",
            "https://chatgpt.com/?q={prompt}",
            "Read {url} so I can ask questions about it.",
        ),
    );
    providers.insert(
        "custom".to_string(),
        provider(
            "Custom AI",
            false,
            "comment-discussion.svg",
            "https://your-ai.com/chat?q={prompt}",
            "Read {url} and answer my questions about it.",
        ),
    );
    providers
}

/// Build-time Markdown generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Pages whose relative path contains any of these are skipped
    pub exclude_patterns: Vec<String>,
    pub llms_txt: bool,
    /// Used in the llms.txt heading
    pub project: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            exclude_patterns: vec![
                "genindex".to_string(),
                "search".to_string(),
                "py-modindex".to_string(),
            ],
            llms_txt: true,
            project: "Documentation".to_string(),
        }
    }
}

impl Config {
    /// Load from an explicit path, `./page2md.toml`, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                debug!("No config file, using defaults");
                Self::default()
            }
        };
        config.check();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    fn check(&self) {
        for (key, provider) in self.enabled_providers() {
            if !provider.url_template.contains("{prompt}") {
                warn!(provider = key, "url_template has no {{prompt}} placeholder");
            }
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn enabled_providers(&self) -> impl Iterator<Item = (&str, &ProviderConfig)> {
        self.providers
            .iter()
            .filter(|(_, p)| p.enabled)
            .map(|(k, p)| (k.as_str(), p))
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|b| !b.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.content_selector, "article");
        assert_eq!(config.max_content_length, 4000);
        assert!(config.use_pregenerated_markdown);
        assert!(config.base_url().is_none());

        let enabled: Vec<_> = config.enabled_providers().map(|(k, _)| k).collect();
        assert_eq!(enabled, vec!["chatgpt", "claude"]);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = Config::from_toml(
            r#"
            content_selector = "div[role=main]"
            max_content_length = 10

            [features]
            ai_chat = false
            "#,
        )
        .unwrap();

        assert_eq!(config.content_selector, "div[role=main]");
        assert_eq!(config.max_content_length, 10);
        assert!(!config.features.ai_chat);
        assert!(config.features.markdown_export);
        assert_eq!(config.probe_timeout(), Duration::from_millis(3000));
        assert_eq!(config.providers.len(), 3);
    }

    #[test]
    fn providers_table_replaces_defaults() {
        let config = Config::from_toml(
            r#"
            [providers.perplexity]
            label = "Ask Perplexity"
            url_template = "https://www.perplexity.ai/?q={prompt}"
            "#,
        )
        .unwrap();

        assert_eq!(config.providers.len(), 1);
        let provider = &config.providers["perplexity"];
        assert!(provider.enabled);
        assert!(provider.prompt_template.is_none());
    }

    #[test]
    fn blank_base_url_is_none() {
        let config = Config::from_toml("base_url = \"  \"").unwrap();
        assert!(config.base_url().is_none());
    }
}
