//! Where the pre-generated Markdown twin of a page would live.

const FILE_SCHEME: &str = "file://";

/// Derive the Markdown URL for `page_url`. Pure string work, never fails.
///
/// Rules, first match wins:
/// 1. `file://` page with a base URL: the page's path below the local site
///    root, `.html` swapped for `.md`, joined to the base URL
/// 2. `.html` suffix: swapped for `.md`
/// 3. trailing `/`: `index.md` appended
/// 4. anything else: `.md` appended
///
/// Query and fragment are dropped first.
pub fn derive_markdown_url(
    page_url: &str,
    base_url: Option<&str>,
    local_root: Option<&str>,
) -> String {
    let page = strip_query_and_fragment(page_url);

    if let Some(base) = base_url.filter(|b| !b.trim().is_empty()) {
        if let Some(relative) = page
            .strip_prefix(FILE_SCHEME)
            .and_then(|path| site_relative_path(path, local_root))
            .and_then(|rel| rel.strip_suffix(".html"))
        {
            return format!("{}/{}.md", base.trim_end_matches('/'), relative);
        }
    }

    if let Some(stem) = page.strip_suffix(".html") {
        format!("{}.md", stem)
    } else if page.ends_with('/') {
        format!("{}index.md", page)
    } else {
        format!("{}.md", page)
    }
}

fn strip_query_and_fragment(url: &str) -> &str {
    let url = url.split_once('#').map_or(url, |(head, _)| head);
    url.split_once('?').map_or(url, |(head, _)| head)
}

/// Path of a local page relative to the built site. Without a configured
/// root, the first directory is taken to be the site's output directory.
fn site_relative_path<'a>(path: &'a str, local_root: Option<&str>) -> Option<&'a str> {
    let relative = match local_root.filter(|r| !r.is_empty()) {
        Some(root) => path
            .strip_prefix(root.trim_end_matches('/'))
            .filter(|rest| rest.starts_with('/'))?,
        None => {
            let trimmed = path.trim_start_matches('/');
            trimmed.split_once('/').map_or(trimmed, |(_, rest)| rest)
        }
    };
    let relative = relative.trim_start_matches('/');
    (!relative.is_empty()).then_some(relative)
}
