//! Hexo front-matter extraction and stripping.
//!
//! Metadata (`title:`, `date:`, `categories:`, `tags:`) is collected by a
//! line-oriented state machine; the body is produced by removing the
//! `---`-delimited block and any `[toc]` marker. Extraction never fails:
//! missing fields stay empty and callers fill the gaps interactively or
//! with the current time.

use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;

use crate::models::PostMetadata;

/// Date format used by Hexo front matter, e.g. `2023-01-01 10:00:00`.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Where the line scanner currently is.
///
/// `categories:` and `tags:` open a list section that collects `- item`
/// lines. A non-blank line that is not a list item closes the section;
/// blank lines do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Neutral,
    InCategories,
    InTags,
}

fn front_matter_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)---.*?---").expect("static regex"))
}

fn toc_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\[toc\]").expect("static regex"))
}

/// Extract metadata and the stripped body in one pass.
pub fn extract(text: &str) -> (PostMetadata, String) {
    (extract_metadata(text), strip_front_matter(text))
}

/// Scan every line for front-matter keys and list items.
pub fn extract_metadata(text: &str) -> PostMetadata {
    let mut meta = PostMetadata::default();
    let mut section = Section::Neutral;

    for raw in text.lines() {
        let line = raw.trim();

        if let Some(rest) = line.strip_prefix("title:") {
            meta.title = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix("date:") {
            meta.date = NaiveDateTime::parse_from_str(rest.trim(), DATE_FORMAT)
                .ok()
                .map(|d| d.and_utc());
        } else if line.starts_with("categories:") {
            section = Section::InCategories;
        } else if line.starts_with("tags:") {
            section = Section::InTags;
        } else if let Some(item) = line.strip_prefix('-') {
            match section {
                Section::InCategories => meta.categories.push(item.trim().to_string()),
                Section::InTags => meta.tags.push(item.trim().to_string()),
                // A stray list item outside any section is body text.
                Section::Neutral => {}
            }
        } else if !line.is_empty() {
            section = Section::Neutral;
        }
    }

    meta
}

/// Remove every `---`-delimited block and any `[toc]` marker.
///
/// Blocks are matched non-greedily anywhere in the text; after one pass at
/// most a single unpaired `---` can remain, so stripping is idempotent.
pub fn strip_front_matter(text: &str) -> String {
    let without_block = front_matter_block_re().replace_all(text, "");
    toc_marker_re().replace_all(&without_block, "").into_owned()
}
