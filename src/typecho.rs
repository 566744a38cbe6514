//! Typecho client speaking the MetaWeblog XML-RPC API.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::blog::BlogPlatform;
use crate::config::BlogConfig;
use crate::models::{Category, NewPost};
use crate::xmlrpc::{self, Value};

/// Typecho renders a post body as pre-rendered Markdown when it starts
/// with this marker; without it the body would be re-parsed as HTML.
pub const MARKDOWN_FLAG: &str = "<!--markdown-->";

/// XML-RPC handler path under the Typecho site root.
const XMLRPC_PATH: &str = "/index.php/action/xmlrpc";

pub struct TypechoClient {
    endpoint: String,
    blog_id: String,
    username: String,
    password: String,
    client: reqwest::Client,
}

impl TypechoClient {
    pub fn new(config: &BlogConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            endpoint: xmlrpc_endpoint(&config.url),
            blog_id: config.blog_id.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            client,
        })
    }

    async fn call(&self, method: &str, params: &[Value]) -> Result<Value> {
        let body = xmlrpc::request_body(method, params);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "text/xml; charset=utf-8")
            .body(body)
            .send()
            .await
            .with_context(|| format!("{} request to {} failed", method, self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("blog platform error {}: {}", status, text);
        }

        let bytes = response.bytes().await?;
        xmlrpc::parse_response(&bytes).with_context(|| format!("{} response", method))
    }

    fn credentials(&self) -> [Value; 3] {
        [
            Value::String(self.blog_id.clone()),
            Value::String(self.username.clone()),
            Value::String(self.password.clone()),
        ]
    }
}

#[async_trait]
impl BlogPlatform for TypechoClient {
    fn name(&self) -> &str {
        "typecho"
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        let [blog_id, username, password] = self.credentials();
        let value = self
            .call("metaWeblog.getCategories", &[blog_id, username, password])
            .await?;

        let Value::Array(items) = value else {
            bail!("unexpected getCategories response: not an array");
        };

        Ok(items
            .iter()
            .filter_map(|item| item.member("categoryName").and_then(Value::as_str))
            .map(|name| Category {
                name: name.to_string(),
            })
            .collect())
    }

    async fn create_post(&self, post: &NewPost) -> Result<String> {
        let content = Value::Struct(vec![
            ("title".to_string(), Value::String(post.title.clone())),
            (
                "description".to_string(),
                Value::String(post.description.clone()),
            ),
            ("dateCreated".to_string(), Value::DateTime(post.created_at)),
            (
                "categories".to_string(),
                Value::Array(
                    post.categories
                        .iter()
                        .map(|c| Value::String(c.clone()))
                        .collect(),
                ),
            ),
            (
                "mt_keywords".to_string(),
                Value::Array(post.tags.iter().map(|t| Value::String(t.clone())).collect()),
            ),
        ]);

        let [blog_id, username, password] = self.credentials();
        let value = self
            .call(
                "metaWeblog.newPost",
                &[blog_id, username, password, content, Value::Bool(post.publish)],
            )
            .await?;

        match value {
            Value::String(id) => Ok(id),
            Value::Int(id) => Ok(id.to_string()),
            other => bail!("unexpected newPost response: {:?}", other),
        }
    }
}

fn xmlrpc_endpoint(site_url: &str) -> String {
    format!("{}{}", site_url.trim_end_matches('/'), XMLRPC_PATH)
}
