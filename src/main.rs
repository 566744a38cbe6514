//! # typecho-publish CLI (`typub`)
//!
//! The `typub` binary drives the Markdown → Typecho publish pipeline. It
//! provides commands for workspace bootstrap, pending-document listing,
//! batch publishing, and category inspection.
//!
//! ## Usage
//!
//! ```bash
//! typub --config ./typub.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `typub init` | Write a default config file and create the workspace directories |
//! | `typub status` | List pending documents per flavor |
//! | `typub publish <flavor>` | Publish pending documents (`plain`, `hexo`, or `all`) |
//! | `typub categories` | List the blog's existing categories |
//!
//! ## Examples
//!
//! ```bash
//! # Bootstrap a workspace in the current directory
//! typub init
//!
//! # See what would be uploaded without touching the network
//! typub publish hexo --dry-run
//!
//! # Publish everything pending
//! typub publish all
//! ```

mod archive;
mod blog;
mod config;
mod discover;
mod frontmatter;
mod image_host;
mod images;
mod models;
mod prompt;
mod publish;
mod status;
mod typecho;
mod workspace;
mod xmlrpc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::blog::BlogSession;
use crate::image_host::ImgbbHost;
use crate::models::Flavor;
use crate::prompt::ConsolePrompter;
use crate::typecho::TypechoClient;
use crate::workspace::Workspace;

/// typecho-publish CLI — batch-import local Markdown articles into a
/// Typecho blog.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file with the blog credentials, image-host key, and workspace layout.
#[derive(Parser)]
#[command(
    name = "typub",
    about = "typecho-publish — batch-import local Markdown articles into a Typecho blog",
    version,
    long_about = "typecho-publish discovers Markdown articles in a workspace (plain ones under \
    md/, Hexo front-mattered ones under hexo_md/), uploads their local images to an image host, \
    rewrites the references, publishes each article over the MetaWeblog XML-RPC API, and archives \
    successfully published sources under ok_md/."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./typub.toml`. Blog credentials, the image-host API
    /// key, and the workspace layout are read from this file.
    #[arg(long, global = true, default_value = "./typub.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Bootstrap the workspace.
    ///
    /// Writes a default config file (unless one exists) and creates the
    /// pending and archive directories. Idempotent.
    Init,

    /// List pending documents per flavor.
    ///
    /// Counts Markdown files in each pending directory. No network access.
    Status,

    /// Publish pending documents.
    ///
    /// Runs the pipeline for each discovered document: upload and rewrite
    /// local images, extract or prompt for metadata, reconcile categories
    /// against the blog, submit the post, and archive the source on
    /// success. A failed document stays in place for the next run.
    Publish {
        /// Which pending directory to process: `plain`, `hexo`, or `all`.
        flavor: String,

        /// List documents and image references without any network calls
        /// or file moves.
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of documents to process per flavor.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// List the blog's existing categories.
    Categories,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // `init` must work before a config file exists.
    if let Commands::Init = cli.command {
        if config::write_default_config(&cli.config)? {
            println!("wrote {}", cli.config.display());
        } else {
            println!("{} already exists, left unchanged", cli.config.display());
        }
        let cfg = config::load_config(&cli.config)?;
        Workspace::new(&cfg.workspace).ensure_layout()?;
        println!("workspace ready");
        return Ok(());
    }

    let cfg = config::load_config(&cli.config)?;
    let workspace = Workspace::new(&cfg.workspace);

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Status => {
            status::show_status(&workspace)?;
        }
        Commands::Publish {
            flavor,
            dry_run,
            limit,
        } => {
            let flavors: Vec<Flavor> = match flavor.as_str() {
                "all" => vec![Flavor::Plain, Flavor::Hexo],
                other => vec![other.parse()?],
            };

            if dry_run {
                for flavor in flavors {
                    publish::run_dry_run(&workspace, flavor, limit)?;
                }
                return Ok(());
            }

            let platform = TypechoClient::new(&cfg.blog)?;
            let session = BlogSession::start(&platform).await?;
            let host = ImgbbHost::new(&cfg.image_host)?;
            let prompter = ConsolePrompter;

            for flavor in flavors {
                publish::run_publish(&workspace, flavor, &session, &host, &prompter, limit)
                    .await?;
            }
        }
        Commands::Categories => {
            let platform = TypechoClient::new(&cfg.blog)?;
            let session = BlogSession::start(&platform).await?;
            println!("CATEGORY");
            for category in session.categories() {
                println!("{}", category.name);
            }
        }
    }

    Ok(())
}
