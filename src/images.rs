//! Image-link rewriting.
//!
//! Scans a document for `![alt](target)` references and replaces local
//! targets with hosted URLs from the upload capability. Remote targets are
//! never touched; a missing file or failed upload keeps the original
//! reference and emits a diagnostic line. References are either replaced
//! wholesale or left byte-for-byte intact, never partially edited.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::image_host::ImageHost;

/// `![alt](target)`: alt excludes `]`, target excludes `)`.
fn image_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").expect("static regex"))
}

/// Counters for one document's rewrite pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RewriteStats {
    /// Local references replaced with a hosted URL.
    pub replaced: u64,
    /// References that already pointed at a remote URL.
    pub remote: u64,
    /// Local references whose file does not exist.
    pub missing: u64,
    /// Local references whose upload failed.
    pub failed: u64,
}

/// Reference tally for a document, used by dry runs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceCounts {
    /// References already pointing at a remote URL.
    pub remote: u64,
    /// Local references whose file exists (a publish would upload these).
    pub local: u64,
    /// Local references whose file does not exist.
    pub missing: u64,
}

/// Classify every image reference without uploading anything.
pub fn reference_counts(text: &str, document_dir: &Path) -> ReferenceCounts {
    let mut counts = ReferenceCounts::default();
    for caps in image_re().captures_iter(text) {
        let target = &caps[2];
        if target.starts_with("http") {
            counts.remote += 1;
        } else if document_dir.join(target).is_file() {
            counts.local += 1;
        } else {
            counts.missing += 1;
        }
    }
    counts
}

/// Rewrite every image reference in `text`, in order of appearance.
///
/// Local paths are resolved relative to `document_dir`. Each local image
/// is uploaded once per occurrence; there is no dedup cache. This never
/// fails: per-image problems are diagnostics, not errors.
pub async fn rewrite_images(
    text: &str,
    document_dir: &Path,
    host: &dyn ImageHost,
) -> (String, RewriteStats) {
    let mut stats = RewriteStats::default();
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0usize;

    for caps in image_re().captures_iter(text) {
        let whole = caps.get(0).expect("capture 0 always present");
        let alt = &caps[1];
        let target = &caps[2];

        output.push_str(&text[cursor..whole.start()]);
        cursor = whole.end();

        if target.starts_with("http") {
            stats.remote += 1;
            output.push_str(whole.as_str());
            continue;
        }

        let resolved = document_dir.join(target);
        if !resolved.is_file() {
            stats.missing += 1;
            println!("  [skip] local image not found: {}", resolved.display());
            output.push_str(whole.as_str());
            continue;
        }

        println!("  [upload] {}", resolved.display());
        match host.upload(&resolved).await {
            Ok(url) => {
                stats.replaced += 1;
                println!("  [replace] {} -> {}", target, url);
                output.push_str(&format!("![{}]({})", alt, url));
            }
            Err(err) => {
                stats.failed += 1;
                println!("  [upload failed] {}: {:#}", resolved.display(), err);
                output.push_str(whole.as_str());
            }
        }
    }

    output.push_str(&text[cursor..]);
    (output, stats)
}
