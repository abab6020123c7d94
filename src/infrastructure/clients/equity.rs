// Equity price client - Intraday closes from the Yahoo chart endpoint
use super::normalize_input;
use crate::application::data_client::DataClient;
use crate::application::json_source::JsonSource;
use crate::domain::error::ErrorKind;
use crate::domain::panel::PanelId;
use crate::domain::panel_data::{EquitySeries, PanelData, PricePoint};
use crate::infrastructure::config::prepare_url;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    // Yahoo reports intervals without trades as null
    #[serde(default)]
    close: Vec<Option<f64>>,
}

pub struct EquityPriceClient {
    source: Arc<dyn JsonSource>,
    url_template: String,
}

impl EquityPriceClient {
    pub fn new(source: Arc<dyn JsonSource>, url_template: String) -> Self {
        Self {
            source,
            url_template,
        }
    }

    async fn load_points(&self, ticker: &str) -> Result<Vec<PricePoint>> {
        let mut vars = HashMap::new();
        vars.insert("ticker", ticker.to_string());
        let url = prepare_url(&self.url_template, &vars);

        let body = self.source.get_json(&url).await?;
        let envelope: ChartEnvelope =
            serde_json::from_value(body).context("Unexpected chart response shape")?;

        let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
            return Ok(Vec::new());
        };
        let closes = result
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .unwrap_or_default();

        let mut points: Vec<PricePoint> = result
            .timestamp
            .iter()
            .zip(closes)
            .filter_map(|(ts, close)| {
                let close = close?;
                let timestamp = DateTime::from_timestamp(*ts, 0)?;
                Some(PricePoint::new(timestamp, close))
            })
            .collect();
        points.sort_by_key(|p| p.timestamp);

        Ok(points)
    }
}

#[async_trait]
impl DataClient for EquityPriceClient {
    fn panel(&self) -> PanelId {
        PanelId::Equity
    }

    async fn fetch(&self, input: Option<&str>) -> Result<PanelData, ErrorKind> {
        let Some(ticker) = normalize_input(input).map(str::to_uppercase) else {
            tracing::warn!("Equity refresh requested without a ticker");
            return Err(ErrorKind::no_data("empty ticker"));
        };

        match self.load_points(&ticker).await {
            Ok(points) if !points.is_empty() => {
                tracing::debug!("Fetched {} price points for {}", points.len(), ticker);
                Ok(PanelData::Equity(EquitySeries::new(ticker, points)))
            }
            Ok(_) => {
                tracing::warn!("No price points returned for {}", ticker);
                Err(ErrorKind::no_data(ticker))
            }
            Err(e) => {
                tracing::warn!("Error fetching prices for {}: {:#}", ticker, e);
                Err(ErrorKind::no_data(ticker))
            }
        }
    }
}
