//! Blog platform capability and category reconciliation.
//!
//! [`BlogPlatform`] is the narrow surface the pipeline needs: list the
//! existing categories, create a post. Listing or deleting posts is
//! deliberately absent. [`BlogSession`] wraps a platform handle together
//! with the category list, fetched once per batch and read-only after.

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::models::{Category, NewPost};

#[async_trait]
pub trait BlogPlatform: Send + Sync {
    /// Short identifier used in diagnostics (e.g. `"typecho"`).
    fn name(&self) -> &str;

    async fn categories(&self) -> Result<Vec<Category>>;

    /// Submit a post; returns the new post id.
    async fn create_post(&self, post: &NewPost) -> Result<String>;
}

/// Resolve a category name against the platform's existing list,
/// case-insensitively.
///
/// A match returns the exact stored name, so `"tech"` never creates a
/// second category next to `"Tech"`. No match returns the input verbatim
/// and the platform creates the category on publish.
pub fn resolve_category(name: &str, existing: &[Category]) -> String {
    let folded = name.to_lowercase();
    existing
        .iter()
        .find(|category| category.name.to_lowercase() == folded)
        .map(|category| category.name.clone())
        .unwrap_or_else(|| name.to_string())
}

/// One batch run's connection state: the platform handle plus the
/// session-scoped category cache.
pub struct BlogSession<'a> {
    platform: &'a dyn BlogPlatform,
    categories: Vec<Category>,
}

impl<'a> BlogSession<'a> {
    /// Fetch the category list and freeze it for the session.
    pub async fn start(platform: &'a dyn BlogPlatform) -> Result<Self> {
        let categories = platform
            .categories()
            .await
            .with_context(|| format!("failed to fetch categories from {}", platform.name()))?;
        Ok(Self {
            platform,
            categories,
        })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn resolve(&self, name: &str) -> String {
        resolve_category(name, &self.categories)
    }

    pub async fn create_post(&self, post: &NewPost) -> Result<String> {
        self.platform.create_post(post).await
    }
}
