//! Build-time generation of Markdown twins for a whole rendered site.

use crate::config::Config;
use crate::extract::extract_with_fallbacks;
use crate::llms_txt;
use crate::markdown::html_to_markdown;
use anyhow::{Context, Result};
use glob::{glob, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use scraper::Html;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub generated: usize,
    pub skipped: usize,
}

/// Write `<page>.md` next to every `<page>.html` under `site_dir`, then
/// llms.txt when enabled.
pub fn generate_site(site_dir: &Path, config: &Config) -> Result<GenerateStats> {
    let html_files = files_with_extension(site_dir, "html")?;
    info!(count = html_files.len(), "Generating markdown files");

    let (pages, excluded): (Vec<_>, Vec<_>) = html_files
        .into_iter()
        .partition(|path| !is_excluded(site_dir, path, &config.generate.exclude_patterns));

    let pb = ProgressBar::new(pages.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})")?
            .progress_chars("=> "),
    );

    let results: Vec<bool> = pages
        .par_iter()
        .map(|path| {
            let outcome = generate_page(path, &config.content_selector);
            pb.inc(1);
            match outcome {
                Ok(()) => true,
                Err(e) => {
                    warn!("Skipping {}: {:#}", relative(site_dir, path), e);
                    false
                }
            }
        })
        .collect();
    pb.finish_and_clear();

    let generated = results.iter().filter(|ok| **ok).count();
    let stats = GenerateStats {
        generated,
        skipped: excluded.len() + results.len() - generated,
    };
    eprintln!(
        "Generated {} markdown files, skipped {}",
        stats.generated, stats.skipped
    );

    if config.generate.llms_txt {
        let listed = llms_txt::write_llms_txt(site_dir, config)?;
        info!(pages = listed, "Generated llms.txt");
    }

    Ok(stats)
}

fn generate_page(path: &Path, selector: &str) -> Result<()> {
    let html = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let content = extract_with_fallbacks(&Html::parse_document(&html), selector)?;
    let markdown = html_to_markdown(&content)?;

    let md_path = path.with_extension("md");
    fs::write(&md_path, markdown)
        .with_context(|| format!("Failed to write {}", md_path.display()))?;
    Ok(())
}

fn is_excluded(site_dir: &Path, path: &Path, patterns: &[String]) -> bool {
    let rel = relative(site_dir, path);
    patterns.iter().any(|pattern| rel.contains(pattern.as_str()))
}

/// `path` relative to `root`, with `/` separators.
pub fn relative(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// All files below `dir` with the given extension, sorted. Files reached
/// through a symlinked directory are left out, so link loops end the walk.
pub fn files_with_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        anyhow::bail!("Not a directory: {}", dir.display());
    }

    let pattern = format!("{}/**/*.{}", Pattern::escape(&dir.to_string_lossy()), ext);
    let mut found = Vec::new();
    for entry in glob(&pattern)? {
        match entry {
            Ok(path) if !through_symlinked_dir(dir, &path) => found.push(path),
            Ok(_) => {}
            Err(e) => warn!("Skipping unreadable path: {}", e),
        }
    }

    found.sort();
    found.dedup();
    Ok(found)
}

fn through_symlinked_dir(root: &Path, path: &Path) -> bool {
    let Some(parent) = path.strip_prefix(root).ok().and_then(Path::parent) else {
        return false;
    };
    let mut current = root.to_path_buf();
    parent.components().any(|component| {
        current.push(component);
        fs::symlink_metadata(&current)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(true)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "index.html",
            r#"<html><body><article><h1>Home</h1><p>Welcome.</p></article></body></html>"#,
        );
        write(
            dir.path(),
            "guide/setup.html",
            r#"<html><body><div role="main"><p>Setup steps.</p>
            <pre><code class="language-bash">pip install x</code></pre></div></body></html>"#,
        );
        write(dir.path(), "genindex.html", "<article>Index</article>");
        write(dir.path(), "broken.html", "<html><body><p>No content root</p></body></html>");
        dir
    }

    #[test]
    fn writes_twins_next_to_pages() {
        let dir = site();
        let config = Config::default();

        let stats = generate_site(dir.path(), &config).unwrap();

        assert_eq!(stats, GenerateStats { generated: 2, skipped: 2 });
        let home = fs::read_to_string(dir.path().join("index.md")).unwrap();
        assert!(home.contains("Welcome."));
        let setup = fs::read_to_string(dir.path().join("guide/setup.md")).unwrap();
        assert!(setup.contains("```bash\npip install x\n```"));
        assert!(!dir.path().join("genindex.md").exists());
        assert!(!dir.path().join("broken.md").exists());
    }

    #[test]
    fn llms_txt_lists_generated_twins() {
        let dir = site();
        let config = Config {
            base_url: Some("https://docs.example.com/".to_string()),
            ..Config::default()
        };

        generate_site(dir.path(), &config).unwrap();

        let listing = fs::read_to_string(dir.path().join("llms.txt")).unwrap();
        assert!(listing.contains("https://docs.example.com/guide/setup.md\n"));
        assert!(listing.contains("https://docs.example.com/index.md\n"));
    }

    #[test]
    fn llms_txt_can_be_disabled() {
        let dir = site();
        let mut config = Config::default();
        config.generate.llms_txt = false;

        generate_site(dir.path(), &config).unwrap();

        assert!(!dir.path().join("llms.txt").exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_loops_are_not_followed() {
        let dir = site();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("guide/loop")).unwrap();

        let found = files_with_extension(dir.path(), "html").unwrap();
        let rel: Vec<String> = found.iter().map(|p| relative(dir.path(), p)).collect();
        assert_eq!(rel, ["broken.html", "genindex.html", "guide/setup.html", "index.html"]);

        let stats = generate_site(dir.path(), &Config::default()).unwrap();
        assert_eq!(stats, GenerateStats { generated: 2, skipped: 2 });
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/site");
        assert_eq!(relative(root, &root.join("a").join("b.html")), "a/b.html");
    }

    #[test]
    fn missing_site_dir_is_an_error() {
        assert!(generate_site(Path::new("/no/such/site"), &Config::default()).is_err());
    }
}
