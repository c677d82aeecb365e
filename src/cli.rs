use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Copy rendered documentation pages as Markdown and hand them to AI chat tools
#[derive(Parser, Debug)]
#[command(name = "page2md", version, about)]
pub struct Cli {
    /// Configuration file. Defaults to ./page2md.toml when present.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert a page to Markdown
    Copy {
        /// Rendered HTML page: a local path or an http(s) URL
        page: String,

        /// Public URL of the page, when it differs from where it was loaded
        #[arg(long)]
        url: Option<String>,

        /// Write the Markdown here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Open an AI chat seeded with a page
    Ask {
        /// Rendered HTML page: a local path or an http(s) URL
        page: String,

        /// Provider key from the configuration (e.g. claude, chatgpt)
        #[arg(short, long)]
        provider: String,

        /// Public URL of the page, when it differs from where it was loaded
        #[arg(long)]
        url: Option<String>,

        /// Print the chat URL instead of opening a browser
        #[arg(long, default_value_t = false)]
        print: bool,
    },
    /// Open the page's pre-generated Markdown, or print a fresh conversion
    View {
        /// Rendered HTML page: a local path or an http(s) URL
        page: String,

        /// Public URL of the page, when it differs from where it was loaded
        #[arg(long)]
        url: Option<String>,
    },
    /// Print where a page's Markdown twin would live
    MarkdownUrl {
        /// Page URL
        url: String,
    },
    /// List enabled AI providers
    Providers,
    /// Write a Markdown twin next to every page of a built site
    Generate {
        /// Root directory of the rendered HTML site
        site_dir: PathBuf,
    },
    /// Print the resolved configuration as JSON
    Config,
}
