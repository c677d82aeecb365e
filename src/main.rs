mod acquire;
mod assistant;
mod cli;
mod config;
mod deliver;
mod error;
mod extract;
mod generate;
mod llms_txt;
mod markdown;
mod markdown_url;
mod page;
mod probe;
mod prompt;

use acquire::ContentReference;
use anyhow::Result;
use assistant::{Assistant, Notice};
use clap::Parser;
use cli::{Cli, Command};
use config::Config;
use deliver::Delivery;
use error::AssistError;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::error;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::MarkdownUrl { url } => {
            let md_url = markdown_url::derive_markdown_url(
                &url,
                config.base_url(),
                config.local_root.as_deref(),
            );
            println!("{}", md_url);
            Ok(ExitCode::SUCCESS)
        }
        Command::Providers => {
            for (key, provider) in config.enabled_providers() {
                let description = provider.description.as_deref().unwrap_or("");
                println!("{:<12} {:<20} {}", key, provider.label, description);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Generate { site_dir } => {
            generate::generate_site(&site_dir, &config)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Copy { page, url, output } => {
            let assistant = assistant(config)?;
            Ok(settle(copy(&assistant, &page, url.as_deref(), output.as_deref()).await))
        }
        Command::Ask {
            page,
            provider,
            url,
            print,
        } => {
            let assistant = assistant(config)?;
            Ok(settle(ask(&assistant, &page, &provider, url.as_deref(), print).await))
        }
        Command::View { page, url } => {
            let assistant = assistant(config)?;
            Ok(settle(view(&assistant, &page, url.as_deref()).await))
        }
    }
}

fn assistant(config: Config) -> Result<Assistant> {
    let probe = Arc::new(probe::HttpProbe::new(config.probe_timeout())?);
    Ok(Assistant::new(config, probe))
}

/// Flow boundary: every outcome ends as a notice on stderr.
fn settle(outcome: Result<Notice, AssistError>) -> ExitCode {
    let notice = outcome.unwrap_or_else(|e| {
        error!("{}", e);
        Notice::from(&e)
    });
    eprintln!("{}", notice);
    if notice.is_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn copy(
    assistant: &Assistant,
    source: &str,
    url: Option<&str>,
    output: Option<&Path>,
) -> Result<Notice, AssistError> {
    let page = page::load_page(source, url).await?;
    let markdown = assistant.copy_markdown(&page).await?;
    Ok(match deliver::write_markdown(&markdown, output)? {
        Delivery::Written(path) => {
            Notice::success(format!("Markdown written to {}", path.display()))
        }
        _ => Notice::success("Markdown copied"),
    })
}

async fn ask(
    assistant: &Assistant,
    source: &str,
    provider: &str,
    url: Option<&str>,
    print_only: bool,
) -> Result<Notice, AssistError> {
    let page = page::load_page(source, url).await?;
    let destination = assistant.chat_destination(&page, provider).await?;
    Ok(match deliver::open_url(&destination, print_only)? {
        Delivery::Opened => Notice::success(format!("Opened {} chat", provider)),
        _ => Notice::success("Chat URL printed"),
    })
}

async fn view(
    assistant: &Assistant,
    source: &str,
    url: Option<&str>,
) -> Result<Notice, AssistError> {
    let page = page::load_page(source, url).await?;
    match assistant.view_markdown(&page).await? {
        ContentReference::Url(md_url) => {
            deliver::open_url(&md_url, false)?;
            Ok(Notice::success(format!("Markdown at {}", md_url)))
        }
        ContentReference::Inline(markdown) => {
            deliver::write_markdown(&markdown, None)?;
            Ok(Notice::success("No pre-generated markdown, converted locally"))
        }
    }
}
