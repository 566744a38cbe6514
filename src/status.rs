use anyhow::Result;

use crate::discover::find_documents;
use crate::models::Flavor;
use crate::workspace::Workspace;

/// Print the pending-document table for both flavors.
pub fn show_status(workspace: &Workspace) -> Result<()> {
    println!("{:<8} {:<16} PENDING", "FLAVOR", "DIRECTORY");

    for flavor in [Flavor::Plain, Flavor::Hexo] {
        let dir = workspace.pending_dir(flavor);
        let count = find_documents(&dir)?.len();
        println!(
            "{:<8} {:<16} {}",
            flavor.label(),
            dir.display().to_string(),
            count
        );
    }

    Ok(())
}
