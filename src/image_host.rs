//! Image-hosting upload capability.
//!
//! The pipeline only needs "bytes in, URL out"; [`ImageHost`] keeps the
//! rewriter testable without a network. [`ImgbbHost`] is the concrete
//! implementation against the imgbb upload API.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::path::Path;
use std::time::Duration;

use crate::config::ImageHostConfig;

/// Upload capability: takes a local file, returns a hosted URL.
///
/// One attempt per call; retry policy is the caller's business (the
/// rewriter deliberately has none).
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, path: &Path) -> Result<String>;
}

/// imgbb-backed [`ImageHost`].
///
/// Sends `POST {endpoint}?key={api_key}` with the file content as a
/// base64 `image` form field and reads the hosted URL from the JSON
/// success envelope.
pub struct ImgbbHost {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl ImgbbHost {
    pub fn new(config: &ImageHostConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            client,
        })
    }
}

#[async_trait]
impl ImageHost for ImgbbHost {
    async fn upload(&self, path: &Path) -> Result<String> {
        if self.api_key.trim().is_empty() {
            bail!("image_host.api_key is not set");
        }

        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read image: {}", path.display()))?;

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .form(&[("image", BASE64.encode(&bytes))])
            .send()
            .await
            .context("image host request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("image host error {}: {}", status, body);
        }

        let json: serde_json::Value = response
            .json()
            .await
            .context("image host returned malformed JSON")?;

        if !json
            .get("success")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
        {
            let message = json
                .pointer("/error/message")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown error");
            bail!("image host rejected upload: {}", message);
        }

        json.pointer("/data/url")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("image host response missing data.url"))
    }
}
