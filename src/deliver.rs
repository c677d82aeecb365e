//! Delivery targets: files, stdout and the system browser.

use crate::error::AssistError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, PartialEq, Eq)]
pub enum Delivery {
    Written(PathBuf),
    Printed,
    Opened,
}

/// Write Markdown to `output`, or to stdout when no path is given.
pub fn write_markdown(markdown: &str, output: Option<&Path>) -> Result<Delivery, AssistError> {
    let Some(path) = output else {
        print_to(&mut io::stdout().lock(), markdown)?;
        return Ok(Delivery::Printed);
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| AssistError::DeliveryFailed(format!("{}: {}", parent.display(), e)))?;
        }
    }

    fs::write(path, markdown)
        .map_err(|e| AssistError::DeliveryFailed(format!("{}: {}", path.display(), e)))?;
    Ok(Delivery::Written(path.to_path_buf()))
}

/// Open `url` in the default browser. When that is not possible, or when
/// `print_only` is set, the URL is printed instead.
pub fn open_url(url: &str, print_only: bool) -> Result<Delivery, AssistError> {
    if !print_only {
        let preview: String = url.chars().take(100).collect();
        info!(url = %preview, "Opening URL");
        match open::that(url) {
            Ok(()) => return Ok(Delivery::Opened),
            Err(e) => warn!(error = %e, "Could not open a browser, printing the URL instead"),
        }
    }

    print_to(&mut io::stdout().lock(), url)?;
    Ok(Delivery::Printed)
}

fn print_to(out: &mut impl Write, text: &str) -> Result<(), AssistError> {
    let mut write = || -> io::Result<()> {
        out.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            out.write_all(b"\n")?;
        }
        out.flush()
    };
    write().map_err(|e| AssistError::DeliveryFailed(e.to_string()))
}
