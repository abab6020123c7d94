// Crypto market client - USD prices for a fixed basket from CoinGecko
use crate::application::data_client::DataClient;
use crate::application::json_source::JsonSource;
use crate::domain::error::ErrorKind;
use crate::domain::panel::PanelId;
use crate::domain::panel_data::{CoinPrice, PanelData};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct CoinMarket {
    name: String,
    #[serde(default)]
    current_price: Option<f64>,
}

pub struct CryptoMarketClient {
    source: Arc<dyn JsonSource>,
    url: String,
}

impl CryptoMarketClient {
    pub fn new(source: Arc<dyn JsonSource>, url: String) -> Self {
        Self { source, url }
    }

    async fn load(&self) -> Result<Vec<CoinPrice>> {
        let body = self.source.get_json(&self.url).await?;
        let markets: Vec<CoinMarket> =
            serde_json::from_value(body).context("Unexpected coin markets response shape")?;

        Ok(markets
            .into_iter()
            .filter_map(|m| match m.current_price {
                Some(price) if price >= 0.0 => Some(CoinPrice {
                    name: m.name,
                    price_usd: price,
                }),
                _ => {
                    tracing::debug!("Dropping {} without a usable price", m.name);
                    None
                }
            })
            .collect())
    }
}

#[async_trait]
impl DataClient for CryptoMarketClient {
    fn panel(&self) -> PanelId {
        PanelId::Crypto
    }

    /// An outage renders as an empty chart, so failures come back as `Ok(empty)`.
    async fn fetch(&self, _input: Option<&str>) -> Result<PanelData, ErrorKind> {
        let coins = self.load().await.unwrap_or_else(|e| {
            tracing::warn!("Error fetching crypto prices: {:#}", e);
            Vec::new()
        });
        Ok(PanelData::Crypto(coins))
    }
}
