//! Locates the content root of a rendered page and strips presentation-only
//! elements from a detached copy of it.

use crate::error::AssistError;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Removed from every extracted region before conversion. `.page2md-container`
/// is the widget's own markup.
const DENYLIST: &[&str] = &[
    ".headerlink",
    ".page2md-container",
    "script",
    "style",
    ".sidebar",
    "nav",
];

/// Fallback content roots for whole-site generation, tried after the
/// configured selector.
pub const FALLBACK_SELECTORS: &[&str] = &[
    r#"article[role="main"]"#,
    r#"div[role="main"]"#,
    "div.document",
    "main",
    "div.body",
];

/// What to export from a page: the content selector and where the page lives.
#[derive(Debug, Clone)]
pub struct PageContentRequest {
    pub selector: String,
    pub location: String,
}

/// Cleaned inner HTML of the content root.
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    html: String,
}

impl ExtractedContent {
    pub fn html(&self) -> &str {
        &self.html
    }
}

fn parse_selector(selector: &str) -> Result<Selector, AssistError> {
    Selector::parse(selector).map_err(|e| AssistError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Find the first element matching `selector` and return a cleaned copy.
///
/// The parsed `document` is left untouched.
pub fn extract_content(document: &Html, selector: &str) -> Result<ExtractedContent, AssistError> {
    let root_selector = parse_selector(selector)?;
    let root = document
        .select(&root_selector)
        .next()
        .ok_or_else(|| AssistError::ContentNotFound {
            selector: selector.to_string(),
        })?;

    debug!(selector, "Found content element");
    Ok(clean_copy(document, root))
}

/// Try the configured selector first, then the common documentation themes.
pub fn extract_with_fallbacks(
    document: &Html,
    selector: &str,
) -> Result<ExtractedContent, AssistError> {
    match extract_content(document, selector) {
        Err(AssistError::ContentNotFound { .. }) => {}
        other => return other,
    }

    for fallback in FALLBACK_SELECTORS {
        if let Ok(content) = extract_content(document, fallback) {
            debug!(selector = fallback, "Using fallback content root");
            return Ok(content);
        }
    }

    Err(AssistError::ContentNotFound {
        selector: selector.to_string(),
    })
}

fn clean_copy(document: &Html, root: ElementRef<'_>) -> ExtractedContent {
    let root_id = (*root).id();

    let mut doomed = Vec::new();
    for pattern in DENYLIST {
        // Denylist entries are static and known to parse.
        let Ok(selector) = Selector::parse(pattern) else {
            continue;
        };
        doomed.extend(
            root.select(&selector)
                .map(|el| (*el).id())
                .filter(|id| *id != root_id),
        );
    }

    let mut copy = document.clone();
    for id in &doomed {
        if let Some(mut node) = copy.tree.get_mut(*id) {
            node.detach();
        }
    }

    let html = copy
        .tree
        .get(root_id)
        .and_then(ElementRef::wrap)
        .map(|el| el.inner_html())
        .unwrap_or_default();

    debug!(removed = doomed.len(), "Cleaned content");
    ExtractedContent { html }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"
        <html><body>
          <nav class="top">Site menu</nav>
          <article>
            <h1>Install<a class="headerlink" href="#install">¶</a></h1>
            <nav>On this page</nav>
            <div class="page2md-container"><button>Copy page</button></div>
            <script>track();</script>
            <style>p { color: red; }</style>
            <aside class="sidebar">Related topics</aside>
            <p>Run the installer.</p>
          </article>
        </body></html>
    "##;

    #[test]
    fn strips_denylisted_elements() {
        let document = Html::parse_document(PAGE);
        let content = extract_content(&document, "article").unwrap();
        let html = content.html();

        assert!(html.contains("Run the installer."));
        assert!(html.contains("Install"));
        for gone in [
            "¶",
            "On this page",
            "Copy page",
            "track()",
            "color: red",
            "Related topics",
        ] {
            assert!(!html.contains(gone), "{gone} should have been removed");
        }
    }

    #[test]
    fn source_document_is_not_mutated() {
        let document = Html::parse_document(PAGE);
        let before = document.html();
        extract_content(&document, "article").unwrap();
        assert_eq!(document.html(), before);
    }

    #[test]
    fn missing_root_is_content_not_found() {
        let document = Html::parse_document("<html><body><p>hi</p></body></html>");
        let err = extract_content(&document, "article").unwrap_err();
        assert!(matches!(
            err,
            AssistError::ContentNotFound { ref selector } if selector == "article"
        ));
    }

    #[test]
    fn bad_selector_is_reported() {
        let document = Html::parse_document(PAGE);
        let err = extract_content(&document, "article[").unwrap_err();
        assert!(matches!(err, AssistError::InvalidSelector { .. }));
    }

    #[test]
    fn fallbacks_find_sphinx_body() {
        let document = Html::parse_document(
            r#"<html><body><div class="document"><p>Classic theme</p></div></body></html>"#,
        );
        let content = extract_with_fallbacks(&document, "article").unwrap();
        assert!(content.html().contains("Classic theme"));
    }

    #[test]
    fn first_match_wins() {
        let document = Html::parse_document(
            "<html><body><article>one</article><article>two</article></body></html>",
        );
        let content = extract_content(&document, "article").unwrap();
        assert_eq!(content.html(), "one");
    }
}
