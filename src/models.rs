//! Core data models used throughout typecho-publish.
//!
//! These types represent the documents, metadata, and outcomes that flow
//! through the publish pipeline.

use chrono::{DateTime, Utc};

/// Which metadata convention a source document follows.
///
/// `Plain` documents carry no structured metadata; title, category, and
/// tags are collected interactively. `Hexo` documents start with a
/// front-matter block that supplies them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Plain,
    Hexo,
}

impl Flavor {
    /// Directory name used both for the pending folder and the archive
    /// subfolder of this flavor.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Flavor::Plain => "md",
            Flavor::Hexo => "hexo_md",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Flavor::Plain => "plain",
            Flavor::Hexo => "hexo",
        }
    }
}

impl std::str::FromStr for Flavor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain" => Ok(Flavor::Plain),
            "hexo" => Ok(Flavor::Hexo),
            other => anyhow::bail!("unknown flavor: '{}'. Available: plain, hexo", other),
        }
    }
}

/// Metadata extracted from (or prompted for) a document before publishing.
///
/// `date` is `None` when the source carried no parseable timestamp; the
/// workflow substitutes the current time at submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostMetadata {
    pub title: String,
    pub date: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

/// A remote category as reported by the blog platform.
#[derive(Debug, Clone)]
pub struct Category {
    pub name: String,
}

/// A fully assembled post, ready for submission.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    /// Post body with the raw-HTML passthrough marker already prepended.
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    /// Publish immediately rather than saving a draft.
    pub publish: bool,
}

/// What happened to the source file after a successful publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    Moved,
    Skipped,
}

/// Per-document result recorded in the batch ledger.
///
/// The ledger reflects the publish outcome; the archive move is reported
/// separately and never turns a published document into a failure.
#[derive(Debug)]
pub enum PublishOutcome {
    Published {
        post_id: String,
        archive: ArchiveOutcome,
    },
    Failed {
        reason: anyhow::Error,
    },
}

/// Counters printed at the end of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub processed: u64,
    pub published: u64,
    pub failed: u64,
    pub archived: u64,
    pub archive_skipped: u64,
}
