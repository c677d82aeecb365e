use crate::config::Config;
use crate::generate::{files_with_extension, relative};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub const LLMS_TXT: &str = "llms.txt";

/// Write `site_dir/llms.txt` listing every Markdown file in the site.
/// Returns the number of pages listed; nothing is written for a site
/// without Markdown files.
pub fn write_llms_txt(site_dir: &Path, config: &Config) -> Result<usize> {
    let pages: Vec<String> = files_with_extension(site_dir, "md")?
        .iter()
        .map(|path| relative(site_dir, path))
        .collect();

    if pages.is_empty() {
        return Ok(0);
    }

    let listing = render(&config.generate.project, config.base_url(), &pages);
    let path = site_dir.join(LLMS_TXT);
    fs::write(&path, listing).with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(pages.len())
}

fn render(project: &str, base_url: Option<&str>, pages: &[String]) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {} Documentation\n\n", project));
    out.push_str("This file lists all available documentation pages in markdown format.\n");
    out.push_str("Generated by page2md.\n\n");

    for page in pages {
        match base_url {
            Some(base) => out.push_str(&format!("{}/{}\n", base.trim_end_matches('/'), page)),
            None => out.push_str(&format!("{}\n", page)),
        }
    }

    out
}
