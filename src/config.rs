use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub blog: BlogConfig,
    #[serde(default)]
    pub image_host: ImageHostConfig,
    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BlogConfig {
    /// Site root, e.g. `http://blog.example.com`. The XML-RPC endpoint
    /// path is appended by the client.
    pub url: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_blog_id")]
    pub blog_id: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_blog_id() -> String {
    "1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageHostConfig {
    /// imgbb API key. Leave empty to publish without rewriting images;
    /// every upload attempt will then fail and references stay local.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_upload_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_upload_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_upload_endpoint() -> String {
    "https://api.imgbb.com/1/upload".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkspaceConfig {
    /// Directory scanned for pending documents; each flavor has a
    /// subdirectory-free pending folder directly under it.
    #[serde(default = "default_root")]
    pub root: PathBuf,
    #[serde(default = "default_archive_dir")]
    pub archive_dir: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            archive_dir: default_archive_dir(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_archive_dir() -> PathBuf {
    PathBuf::from("ok_md")
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.blog.url.trim().is_empty() {
        anyhow::bail!("blog.url must not be empty");
    }
    if config.blog.username.trim().is_empty() {
        anyhow::bail!("blog.username must not be empty");
    }
    if config.blog.timeout_secs == 0 || config.image_host.timeout_secs == 0 {
        anyhow::bail!("timeout_secs must be > 0");
    }
    Ok(())
}

/// Default config written by `typub init` when no file exists yet.
pub const DEFAULT_CONFIG: &str = r#"[blog]
url = "http://192.168.188.137"
username = "admin"
password = "123456"

[image_host]
api_key = ""

[workspace]
root = "."
archive_dir = "ok_md"
"#;

/// Write the default config file, refusing to clobber an existing one.
///
/// Returns `true` if the file was created.
pub fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(true)
}
