//! Workspace directory layout and bootstrap.
//!
//! The workspace holds one pending directory per flavor (`md/`, `hexo_md/`)
//! and a parallel archive tree (`ok_md/md/`, `ok_md/hexo_md/`) that
//! receives source files after a successful publish.

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::WorkspaceConfig;
use crate::models::Flavor;

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    archive_dir: PathBuf,
}

impl Workspace {
    pub fn new(config: &WorkspaceConfig) -> Self {
        Self {
            root: config.root.clone(),
            archive_dir: config.root.join(&config.archive_dir),
        }
    }

    /// Pending directory scanned for unpublished documents of a flavor.
    pub fn pending_dir(&self, flavor: Flavor) -> PathBuf {
        self.root.join(flavor.dir_name())
    }

    /// Archive destination for a flavor's published sources.
    pub fn archive_dir(&self, flavor: Flavor) -> PathBuf {
        self.archive_dir.join(flavor.dir_name())
    }

    /// Create every workspace directory. Idempotent.
    pub fn ensure_layout(&self) -> Result<()> {
        for flavor in [Flavor::Plain, Flavor::Hexo] {
            for dir in [self.pending_dir(flavor), self.archive_dir(flavor)] {
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            }
        }
        Ok(())
    }
}
