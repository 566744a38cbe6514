//! Publish pipeline orchestration.
//!
//! Coordinates the full batch flow per document: image rewrite →
//! metadata (extracted or prompted) → category reconciliation → submit →
//! archive. One document's failure never aborts the batch; failed
//! documents stay in their pending directory and are re-offered by the
//! next run.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;

use crate::archive::archive_document;
use crate::blog::BlogSession;
use crate::discover::find_documents;
use crate::frontmatter;
use crate::image_host::ImageHost;
use crate::images::{reference_counts, rewrite_images};
use crate::models::{ArchiveOutcome, BatchSummary, Flavor, NewPost, PublishOutcome};
use crate::prompt::Prompter;
use crate::typecho::MARKDOWN_FLAG;
use crate::workspace::Workspace;

/// Run the batch pipeline for one flavor.
pub async fn run_publish(
    workspace: &Workspace,
    flavor: Flavor,
    session: &BlogSession<'_>,
    host: &dyn ImageHost,
    prompter: &dyn Prompter,
    limit: Option<usize>,
) -> Result<BatchSummary> {
    let pending_dir = workspace.pending_dir(flavor);
    let mut documents = find_documents(&pending_dir)?;
    if let Some(lim) = limit {
        documents.truncate(lim);
    }

    let mut summary = BatchSummary::default();

    if documents.is_empty() {
        println!(
            "no pending {} documents in {}",
            flavor.label(),
            pending_dir.display()
        );
        return Ok(summary);
    }

    let archive_dir = workspace.archive_dir(flavor);

    for (idx, path) in documents.iter().enumerate() {
        println!("\n[{}/{}] {}", idx + 1, documents.len(), path.display());
        summary.processed += 1;

        match process_document(path, flavor, &archive_dir, session, host, prompter).await {
            Ok(PublishOutcome::Published { post_id, archive }) => {
                summary.published += 1;
                println!("  [published] post {}", post_id);
                match archive {
                    ArchiveOutcome::Moved => summary.archived += 1,
                    ArchiveOutcome::Skipped => summary.archive_skipped += 1,
                }
            }
            Ok(PublishOutcome::Failed { reason }) => {
                summary.failed += 1;
                println!("  [publish failed] {:#}", reason);
            }
            Err(err) => {
                summary.failed += 1;
                println!("  [failed] {:#}", err);
            }
        }
    }

    println!("\npublish {}", flavor.label());
    println!("  processed: {}", summary.processed);
    println!("  published: {}", summary.published);
    println!("  failed: {}", summary.failed);
    println!(
        "  archived: {} (skipped: {})",
        summary.archived, summary.archive_skipped
    );
    println!("ok");

    Ok(summary)
}

/// Process a single document through the pipeline.
///
/// `Err` means the document could not even be prepared (unreadable file,
/// prompt unavailable); `Ok(Failed)` means the platform rejected the
/// submit. Both leave the source file in place.
pub async fn process_document(
    path: &Path,
    flavor: Flavor,
    archive_dir: &Path,
    session: &BlogSession<'_>,
    host: &dyn ImageHost,
    prompter: &dyn Prompter,
) -> Result<PublishOutcome> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;
    let document_dir = path.parent().unwrap_or(Path::new("."));

    let (rewritten, stats) = rewrite_images(&text, document_dir, host).await;
    if stats.replaced + stats.missing + stats.failed > 0 {
        println!(
            "  images: {} uploaded, {} missing, {} failed",
            stats.replaced, stats.missing, stats.failed
        );
    }

    let (body, title, date, categories, tags) = match flavor {
        Flavor::Hexo => {
            let (meta, body) = frontmatter::extract(&rewritten);
            let title = if meta.title.is_empty() {
                prompter.ask_required("Article title")?
            } else {
                meta.title
            };
            (body, title, meta.date, meta.categories, meta.tags)
        }
        Flavor::Plain => {
            let title = prompter.ask_required("Article title")?;
            let category = prompter.ask("Category")?;
            let categories = if category.is_empty() {
                Vec::new()
            } else {
                vec![category]
            };
            let tags: Vec<String> = prompter
                .ask("Tags (comma separated)")?
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            (rewritten, title, None, categories, tags)
        }
    };

    let categories: Vec<String> = categories
        .iter()
        .map(|name| session.resolve(name))
        .collect();

    let post = NewPost {
        title,
        description: format!("{}{}", MARKDOWN_FLAG, body),
        created_at: date.unwrap_or_else(Utc::now),
        categories,
        tags,
        publish: true,
    };

    let post_id = match session.create_post(&post).await {
        Ok(id) => id,
        Err(reason) => return Ok(PublishOutcome::Failed { reason }),
    };

    // Publish succeeded; an archive hiccup must not turn it into a failure.
    let archive = match archive_document(path, archive_dir, prompter) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("  [archive failed] {:#}", err);
            ArchiveOutcome::Skipped
        }
    };

    Ok(PublishOutcome::Published { post_id, archive })
}

/// List what a publish run would touch, without any network calls or
/// file moves.
pub fn run_dry_run(workspace: &Workspace, flavor: Flavor, limit: Option<usize>) -> Result<()> {
    let pending_dir = workspace.pending_dir(flavor);
    let mut documents = find_documents(&pending_dir)?;
    if let Some(lim) = limit {
        documents.truncate(lim);
    }

    println!("publish {} (dry-run)", flavor.label());
    println!("  documents: {}", documents.len());

    for path in &documents {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        let document_dir = path.parent().unwrap_or(Path::new("."));
        let counts = reference_counts(&text, document_dir);

        let title = match flavor {
            Flavor::Hexo => {
                let meta = frontmatter::extract_metadata(&text);
                if meta.title.is_empty() {
                    "(title will be prompted)".to_string()
                } else {
                    meta.title
                }
            }
            Flavor::Plain => "(title will be prompted)".to_string(),
        };

        println!(
            "  {} ({}): images: {} to upload, {} missing, {} already remote",
            path.display(),
            title,
            counts.local,
            counts.missing,
            counts.remote
        );
    }

    Ok(())
}
