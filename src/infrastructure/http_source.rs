// reqwest-backed JSON source shared by every data client
use crate::application::json_source::JsonSource;
use crate::infrastructure::config::HttpSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ReqwestJsonSource {
    client: reqwest::Client,
}

impl ReqwestJsonSource {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl JsonSource for ReqwestJsonSource {
    async fn get_json(&self, url: &str) -> Result<serde_json::Value> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GET {} failed with status {}: {}", url, status, body);
        }

        response
            .json::<serde_json::Value>()
            .await
            .with_context(|| format!("Failed to parse JSON from {}", url))
    }
}
