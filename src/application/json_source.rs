// Port for outbound HTTP GET requests returning JSON
use async_trait::async_trait;

#[async_trait]
pub trait JsonSource: Send + Sync {
    /// GET the url and parse the body as JSON. Non-2xx responses are errors.
    async fn get_json(&self, url: &str) -> anyhow::Result<serde_json::Value>;
}
