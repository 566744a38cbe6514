//! End-to-end pipeline tests.
//!
//! These drive the real publish workflow with in-memory capability
//! implementations (image host, blog platform, prompter) over temporary
//! workspace trees, so every scenario runs without a network or a
//! terminal.

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

use typecho_publish::blog::{BlogPlatform, BlogSession};
use typecho_publish::config::WorkspaceConfig;
use typecho_publish::discover::find_documents;
use typecho_publish::image_host::ImageHost;
use typecho_publish::models::{Category, Flavor, NewPost};
use typecho_publish::prompt::Prompter;
use typecho_publish::publish::run_publish;
use typecho_publish::workspace::Workspace;

// ─── Test capabilities ──────────────────────────────────────────────

struct MemoryHost {
    uploads: Mutex<Vec<PathBuf>>,
}

impl MemoryHost {
    fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
        }
    }

    fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageHost for MemoryHost {
    async fn upload(&self, path: &Path) -> Result<String> {
        self.uploads.lock().unwrap().push(path.to_path_buf());
        Ok(format!(
            "https://img.example/{}",
            path.file_name().unwrap().to_string_lossy()
        ))
    }
}

struct MemoryPlatform {
    categories: Vec<String>,
    posts: Mutex<Vec<NewPost>>,
    reject: bool,
}

impl MemoryPlatform {
    fn new(categories: &[&str]) -> Self {
        Self {
            categories: categories.iter().map(|s| s.to_string()).collect(),
            posts: Mutex::new(Vec::new()),
            reject: false,
        }
    }

    fn rejecting(categories: &[&str]) -> Self {
        Self {
            reject: true,
            ..Self::new(categories)
        }
    }

    fn posts(&self) -> Vec<NewPost> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlogPlatform for MemoryPlatform {
    fn name(&self) -> &str {
        "memory"
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        Ok(self
            .categories
            .iter()
            .map(|name| Category { name: name.clone() })
            .collect())
    }

    async fn create_post(&self, post: &NewPost) -> Result<String> {
        if self.reject {
            bail!("server said no");
        }
        let mut posts = self.posts.lock().unwrap();
        posts.push(post.clone());
        Ok(posts.len().to_string())
    }
}

struct ScriptedPrompter {
    answers: Mutex<Vec<String>>,
    confirm: bool,
}

impl ScriptedPrompter {
    fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|s| s.to_string()).collect()),
            confirm: true,
        }
    }

    fn refusing() -> Self {
        Self {
            answers: Mutex::new(Vec::new()),
            confirm: false,
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&self, question: &str) -> Result<String> {
        let mut answers = self.answers.lock().unwrap();
        if answers.is_empty() {
            bail!("unexpected prompt: {}", question);
        }
        Ok(answers.remove(0))
    }

    fn confirm(&self, _question: &str) -> Result<bool> {
        Ok(self.confirm)
    }
}

// ─── Helpers ────────────────────────────────────────────────────────

fn test_workspace(tmp: &TempDir) -> Workspace {
    let ws = Workspace::new(&WorkspaceConfig {
        root: tmp.path().to_path_buf(),
        archive_dir: PathBuf::from("ok_md"),
    });
    ws.ensure_layout().unwrap();
    ws
}

fn write_pending(ws: &Workspace, flavor: Flavor, name: &str, body: &str) -> PathBuf {
    let path = ws.pending_dir(flavor).join(name);
    fs::write(&path, body).unwrap();
    path
}

const HEXO_DOC: &str = "---\n\
title: Hello\n\
date: 2023-01-01 10:00:00\n\
categories:\n\
- Tech\n\
tags:\n\
- a\n\
- b\n\
---\n\
[toc]\n\
Hello world\n";

// ─── Scenarios ──────────────────────────────────────────────────────

#[tokio::test]
async fn hexo_document_publishes_with_extracted_metadata_and_is_archived() {
    let tmp = TempDir::new().unwrap();
    let ws = test_workspace(&tmp);
    let source = write_pending(&ws, Flavor::Hexo, "hello.md", HEXO_DOC);

    let platform = MemoryPlatform::new(&["Tech", "Life"]);
    let session = BlogSession::start(&platform).await.unwrap();
    let host = MemoryHost::new();
    let prompter = ScriptedPrompter::new(&[]);

    let summary = run_publish(&ws, Flavor::Hexo, &session, &host, &prompter, None)
        .await
        .unwrap();

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.published, 1);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.archived, 1);

    let posts = platform.posts();
    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert_eq!(post.title, "Hello");
    assert_eq!(
        post.created_at,
        Utc.with_ymd_and_hms(2023, 1, 1, 10, 0, 0).unwrap()
    );
    assert_eq!(post.categories, vec!["Tech"]);
    assert_eq!(post.tags, vec!["a", "b"]);
    assert!(post.publish);
    assert!(post.description.starts_with("<!--markdown-->"));
    assert!(post.description.contains("Hello world"));
    assert!(!post.description.contains("[toc]"));
    assert!(!post.description.contains("title:"));

    // Source relocated into the flavor archive under its original name.
    assert!(!source.exists());
    assert!(ws.archive_dir(Flavor::Hexo).join("hello.md").exists());
    assert_eq!(host.upload_count(), 0);
}

#[tokio::test]
async fn missing_image_is_skipped_and_never_uploaded() {
    let tmp = TempDir::new().unwrap();
    let ws = test_workspace(&tmp);
    write_pending(
        &ws,
        Flavor::Hexo,
        "img.md",
        "---\ntitle: Pics\n---\n![x](./local.png)\n",
    );

    let platform = MemoryPlatform::new(&[]);
    let session = BlogSession::start(&platform).await.unwrap();
    let host = MemoryHost::new();
    let prompter = ScriptedPrompter::new(&[]);

    let summary = run_publish(&ws, Flavor::Hexo, &session, &host, &prompter, None)
        .await
        .unwrap();

    assert_eq!(summary.published, 1);
    assert_eq!(host.upload_count(), 0);

    let posts = platform.posts();
    assert!(posts[0].description.contains("![x](./local.png)"));
}

#[tokio::test]
async fn local_images_are_uploaded_and_rewritten() {
    let tmp = TempDir::new().unwrap();
    let ws = test_workspace(&tmp);
    fs::write(ws.pending_dir(Flavor::Hexo).join("shot.png"), b"png").unwrap();
    write_pending(
        &ws,
        Flavor::Hexo,
        "img.md",
        "---\ntitle: Pics\n---\n![screen](shot.png) ![remote](https://cdn.example/r.png)\n",
    );

    let platform = MemoryPlatform::new(&[]);
    let session = BlogSession::start(&platform).await.unwrap();
    let host = MemoryHost::new();
    let prompter = ScriptedPrompter::new(&[]);

    run_publish(&ws, Flavor::Hexo, &session, &host, &prompter, None)
        .await
        .unwrap();

    assert_eq!(host.upload_count(), 1);
    let posts = platform.posts();
    assert!(posts[0]
        .description
        .contains("![screen](https://img.example/shot.png)"));
    assert!(posts[0]
        .description
        .contains("![remote](https://cdn.example/r.png)"));
}

#[tokio::test]
async fn rejected_publish_leaves_the_source_discoverable() {
    let tmp = TempDir::new().unwrap();
    let ws = test_workspace(&tmp);
    let source = write_pending(&ws, Flavor::Hexo, "fail.md", HEXO_DOC);

    let platform = MemoryPlatform::rejecting(&[]);
    let session = BlogSession::start(&platform).await.unwrap();
    let host = MemoryHost::new();
    let prompter = ScriptedPrompter::new(&[]);

    let summary = run_publish(&ws, Flavor::Hexo, &session, &host, &prompter, None)
        .await
        .unwrap();

    assert_eq!(summary.published, 0);
    assert_eq!(summary.failed, 1);
    assert!(source.exists());

    // A later discovery pass re-offers the document.
    let rediscovered = find_documents(&ws.pending_dir(Flavor::Hexo)).unwrap();
    assert_eq!(rediscovered, vec![source]);
}

#[tokio::test]
async fn one_failure_does_not_abort_the_batch() {
    let tmp = TempDir::new().unwrap();
    let ws = test_workspace(&tmp);
    // Invalid UTF-8 makes this document unreadable as text.
    fs::write(ws.pending_dir(Flavor::Hexo).join("broken.md"), [0xff, 0xfe]).unwrap();
    write_pending(&ws, Flavor::Hexo, "a.md", "---\ntitle: A\n---\nbody a\n");
    write_pending(&ws, Flavor::Hexo, "b.md", "---\ntitle: B\n---\nbody b\n");

    let platform = MemoryPlatform::new(&[]);
    let session = BlogSession::start(&platform).await.unwrap();
    let host = MemoryHost::new();
    let prompter = ScriptedPrompter::new(&[]);

    let summary = run_publish(&ws, Flavor::Hexo, &session, &host, &prompter, None)
        .await
        .unwrap();

    assert_eq!(summary.processed, 3);
    assert_eq!(summary.published, 2);
    assert_eq!(summary.failed, 1);
    assert!(ws.pending_dir(Flavor::Hexo).join("broken.md").exists());

    let mut titles: Vec<String> = platform.posts().iter().map(|p| p.title.clone()).collect();
    titles.sort();
    assert_eq!(titles, vec!["A", "B"]);
}

#[tokio::test]
async fn category_casings_converge_on_the_remote_name() {
    let tmp = TempDir::new().unwrap();
    let ws = test_workspace(&tmp);
    write_pending(
        &ws,
        Flavor::Hexo,
        "one.md",
        "---\ntitle: One\ncategories:\n- News\n---\nbody\n",
    );
    write_pending(
        &ws,
        Flavor::Hexo,
        "two.md",
        "---\ntitle: Two\ncategories:\n- news\n---\nbody\n",
    );

    let platform = MemoryPlatform::new(&["News"]);
    let session = BlogSession::start(&platform).await.unwrap();
    let host = MemoryHost::new();
    let prompter = ScriptedPrompter::new(&[]);

    run_publish(&ws, Flavor::Hexo, &session, &host, &prompter, None)
        .await
        .unwrap();

    let posts = platform.posts();
    assert_eq!(posts.len(), 2);
    for post in &posts {
        assert_eq!(post.categories, vec!["News"]);
    }
}

#[tokio::test]
async fn plain_documents_use_prompted_metadata() {
    let tmp = TempDir::new().unwrap();
    let ws = test_workspace(&tmp);
    write_pending(&ws, Flavor::Plain, "note.md", "# Just a note\n\nbody\n");

    let platform = MemoryPlatform::new(&["Tech"]);
    let session = BlogSession::start(&platform).await.unwrap();
    let host = MemoryHost::new();
    // title, category, tags
    let prompter = ScriptedPrompter::new(&["My Note", "tech", "rust, tools"]);

    let summary = run_publish(&ws, Flavor::Plain, &session, &host, &prompter, None)
        .await
        .unwrap();

    assert_eq!(summary.published, 1);
    let posts = platform.posts();
    let post = &posts[0];
    assert_eq!(post.title, "My Note");
    assert_eq!(post.categories, vec!["Tech"]);
    assert_eq!(post.tags, vec!["rust", "tools"]);
    assert!(post.description.contains("# Just a note"));
    assert!(!ws.pending_dir(Flavor::Plain).join("note.md").exists());
}

#[tokio::test]
async fn hexo_document_without_title_prompts_for_one() {
    let tmp = TempDir::new().unwrap();
    let ws = test_workspace(&tmp);
    write_pending(
        &ws,
        Flavor::Hexo,
        "untitled.md",
        "---\ndate: 2023-01-01 10:00:00\n---\nbody\n",
    );

    let platform = MemoryPlatform::new(&[]);
    let session = BlogSession::start(&platform).await.unwrap();
    let host = MemoryHost::new();
    let prompter = ScriptedPrompter::new(&["Rescued Title"]);

    run_publish(&ws, Flavor::Hexo, &session, &host, &prompter, None)
        .await
        .unwrap();

    assert_eq!(platform.posts()[0].title, "Rescued Title");
}

#[tokio::test]
async fn archive_collision_skip_still_counts_as_published() {
    let tmp = TempDir::new().unwrap();
    let ws = test_workspace(&tmp);
    let source = write_pending(&ws, Flavor::Hexo, "dup.md", HEXO_DOC);
    fs::write(ws.archive_dir(Flavor::Hexo).join("dup.md"), "older copy").unwrap();

    let platform = MemoryPlatform::new(&[]);
    let session = BlogSession::start(&platform).await.unwrap();
    let host = MemoryHost::new();
    let prompter = ScriptedPrompter::refusing();

    let summary = run_publish(&ws, Flavor::Hexo, &session, &host, &prompter, None)
        .await
        .unwrap();

    assert_eq!(summary.published, 1);
    assert_eq!(summary.archived, 0);
    assert_eq!(summary.archive_skipped, 1);
    // The declined move leaves both files untouched.
    assert!(source.exists());
    assert_eq!(
        fs::read_to_string(ws.archive_dir(Flavor::Hexo).join("dup.md")).unwrap(),
        "older copy"
    );
}

#[tokio::test]
async fn limit_caps_the_batch() {
    let tmp = TempDir::new().unwrap();
    let ws = test_workspace(&tmp);
    write_pending(&ws, Flavor::Hexo, "a.md", "---\ntitle: A\n---\na\n");
    write_pending(&ws, Flavor::Hexo, "b.md", "---\ntitle: B\n---\nb\n");
    write_pending(&ws, Flavor::Hexo, "c.md", "---\ntitle: C\n---\nc\n");

    let platform = MemoryPlatform::new(&[]);
    let session = BlogSession::start(&platform).await.unwrap();
    let host = MemoryHost::new();
    let prompter = ScriptedPrompter::new(&[]);

    let summary = run_publish(&ws, Flavor::Hexo, &session, &host, &prompter, Some(2))
        .await
        .unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.published, 2);
}
