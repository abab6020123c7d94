// News feed client - Top technology stories from the HN Algolia search API
use crate::application::data_client::DataClient;
use crate::application::json_source::JsonSource;
use crate::domain::error::ErrorKind;
use crate::domain::panel::PanelId;
use crate::domain::panel_data::{Headline, PanelData};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

const MAX_HEADLINES: usize = 5;
const DISCUSSION_URL: &str = "https://news.ycombinator.com/item?id=";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "objectID", default)]
    object_id: Option<String>,
}

impl Hit {
    fn into_headline(self) -> Option<Headline> {
        let title = self.title.filter(|t| !t.trim().is_empty())?;
        // Ask HN / Show HN stories have no external link
        let url = match self.url.filter(|u| !u.is_empty()) {
            Some(url) => url,
            None => format!("{}{}", DISCUSSION_URL, self.object_id?),
        };
        Some(Headline { title, url })
    }
}

pub struct NewsFeedClient {
    source: Arc<dyn JsonSource>,
    url: String,
}

impl NewsFeedClient {
    pub fn new(source: Arc<dyn JsonSource>, url: String) -> Self {
        Self { source, url }
    }

    async fn load(&self) -> Result<Vec<Headline>> {
        let body = self.source.get_json(&self.url).await?;
        let response: SearchResponse =
            serde_json::from_value(body).context("Unexpected search response shape")?;

        Ok(response
            .hits
            .into_iter()
            .filter_map(Hit::into_headline)
            .take(MAX_HEADLINES)
            .collect())
    }
}

#[async_trait]
impl DataClient for NewsFeedClient {
    fn panel(&self) -> PanelId {
        PanelId::News
    }

    /// Failures come back as an empty list; the view shows the "no news" message.
    async fn fetch(&self, _input: Option<&str>) -> Result<PanelData, ErrorKind> {
        let headlines = self.load().await.unwrap_or_else(|e| {
            tracing::warn!("Error fetching news: {:#}", e);
            Vec::new()
        });
        Ok(PanelData::News(headlines))
    }
}
