// Pandemic stats client - Country totals from disease.sh
use super::normalize_input;
use crate::application::data_client::DataClient;
use crate::application::json_source::JsonSource;
use crate::domain::error::ErrorKind;
use crate::domain::panel::PanelId;
use crate::domain::panel_data::{PandemicStats, PanelData};
use crate::infrastructure::config::prepare_url;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct CountryTotals {
    country: String,
    cases: u64,
    active: u64,
    recovered: u64,
    deaths: u64,
}

pub struct PandemicStatsClient {
    source: Arc<dyn JsonSource>,
    url_template: String,
}

impl PandemicStatsClient {
    pub fn new(source: Arc<dyn JsonSource>, url_template: String) -> Self {
        Self {
            source,
            url_template,
        }
    }

    async fn load(&self, country: &str) -> Result<PandemicStats> {
        let mut vars = HashMap::new();
        vars.insert("country", country.to_string());
        let url = prepare_url(&self.url_template, &vars);

        let body = self.source.get_json(&url).await?;
        let totals: CountryTotals = serde_json::from_value(body)
            .with_context(|| format!("Unexpected country stats shape for {}", country))?;

        Ok(PandemicStats {
            country: totals.country,
            cases: totals.cases,
            active: totals.active,
            recovered: totals.recovered,
            deaths: totals.deaths,
        })
    }
}

#[async_trait]
impl DataClient for PandemicStatsClient {
    fn panel(&self) -> PanelId {
        PanelId::Pandemic
    }

    async fn fetch(&self, input: Option<&str>) -> Result<PanelData, ErrorKind> {
        let Some(country) = normalize_input(input) else {
            return Err(ErrorKind::no_data("empty country"));
        };

        self.load(country).await.map(PanelData::Pandemic).map_err(|e| {
            tracing::warn!("Error fetching pandemic stats for {}: {:#}", country, e);
            ErrorKind::no_data(country)
        })
    }
}
