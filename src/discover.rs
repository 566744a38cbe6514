//! Pending-document discovery.
//!
//! Recursively enumerates Markdown files under a pending directory. The
//! extension match is case-insensitive (`a.MD` counts); order is whatever
//! the filesystem traversal yields.

use anyhow::Result;
use globset::{GlobBuilder, GlobMatcher};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

fn markdown_matcher() -> GlobMatcher {
    GlobBuilder::new("*.md")
        .case_insensitive(true)
        .build()
        .expect("static glob")
        .compile_matcher()
}

/// Find every Markdown file under `root`, recursively.
///
/// A missing root yields an empty list rather than an error so that a
/// freshly bootstrapped (or already drained) workspace is not a failure.
pub fn find_documents(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Ok(Vec::new());
    }

    let matcher = markdown_matcher();
    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name();
        if matcher.is_match(Path::new(name)) {
            files.push(entry.path().to_path_buf());
        }
    }

    Ok(files)
}
