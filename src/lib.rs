//! # typecho-publish
//!
//! A batch importer that publishes locally-authored Markdown articles to a
//! Typecho blog over the MetaWeblog XML-RPC API, rewriting embedded local
//! image references to hosted URLs before submission.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────────────────┐   ┌───────────┐
//! │  Discovery   │──▶│      Publish pipeline      │──▶│  Typecho  │
//! │ md/ hexo_md/ │   │ images → metadata → submit │   │ (XML-RPC) │
//! └──────────────┘   └──────────┬─────────────────┘   └───────────┘
//!                               │
//!                    ┌──────────┴──────────┐
//!                    ▼                     ▼
//!              ┌──────────┐          ┌──────────┐
//!              │  imgbb   │          │ archive  │
//!              │ (images) │          │  ok_md/  │
//!              └──────────┘          └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! typub init                 # write typub.toml, create workspace dirs
//! typub status               # list pending documents per flavor
//! typub publish hexo         # publish front-mattered documents
//! typub publish plain        # publish plain documents (interactive)
//! typub categories           # list remote categories
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`workspace`] | Pending/archive directory layout |
//! | [`discover`] | Pending-document discovery |
//! | [`frontmatter`] | Hexo front-matter extraction and stripping |
//! | [`images`] | Image-link rewriting |
//! | [`image_host`] | Image-hosting upload capability (imgbb) |
//! | [`xmlrpc`] | XML-RPC wire format |
//! | [`blog`] | Blog platform capability and category reconciliation |
//! | [`typecho`] | Typecho MetaWeblog client |
//! | [`prompt`] | Interactive prompting capability |
//! | [`archive`] | Post-publish source relocation |
//! | [`publish`] | Batch pipeline orchestration |
//! | [`status`] | Pending-document listing |

pub mod archive;
pub mod blog;
pub mod config;
pub mod discover;
pub mod frontmatter;
pub mod image_host;
pub mod images;
pub mod models;
pub mod prompt;
pub mod publish;
pub mod status;
pub mod typecho;
pub mod workspace;
pub mod xmlrpc;
