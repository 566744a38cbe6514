//! Post-publish relocation of source files.
//!
//! A successfully published document is moved into the flavor's archive
//! directory under its original filename. A name collision asks for
//! confirmation: yes replaces the archived copy, no leaves the source
//! where it is. Either way the publish already happened; callers record
//! the publish outcome, not the move.

use anyhow::{Context, Result};
use std::path::Path;

use crate::models::ArchiveOutcome;
use crate::prompt::Prompter;

pub fn archive_document(
    source: &Path,
    archive_dir: &Path,
    prompter: &dyn Prompter,
) -> Result<ArchiveOutcome> {
    std::fs::create_dir_all(archive_dir)
        .with_context(|| format!("Failed to create archive directory: {}", archive_dir.display()))?;

    let file_name = source
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("source has no file name: {}", source.display()))?;
    let dest = archive_dir.join(file_name);

    if dest.exists() {
        let question = format!("{} already exists, replace it?", dest.display());
        if !prompter.confirm(&question)? {
            println!("  [archive skipped] {}", source.display());
            return Ok(ArchiveOutcome::Skipped);
        }
    }

    std::fs::rename(source, &dest).with_context(|| {
        format!(
            "Failed to move {} to {}",
            source.display(),
            dest.display()
        )
    })?;
    println!("  [archived] {}", dest.display());
    Ok(ArchiveOutcome::Moved)
}
