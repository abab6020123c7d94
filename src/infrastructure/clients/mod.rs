// External data clients - One adapter per dashboard panel
pub mod crypto;
pub mod equity;
pub mod market_cap;
pub mod news;
pub mod pandemic;
pub mod weather;

use crate::application::data_client::DataClient;
use crate::application::json_source::JsonSource;
use crate::infrastructure::config::EndpointsConfig;
use std::sync::Arc;

pub use crypto::CryptoMarketClient;
pub use equity::EquityPriceClient;
pub use market_cap::MarketCapClient;
pub use news::NewsFeedClient;
pub use pandemic::PandemicStatsClient;
pub use weather::WeatherClient;

/// Every client, sharing one JSON source.
pub fn build_clients(source: Arc<dyn JsonSource>, endpoints: &EndpointsConfig) -> Vec<Arc<dyn DataClient>> {
    vec![
        Arc::new(EquityPriceClient::new(source.clone(), endpoints.equity.clone())),
        Arc::new(PandemicStatsClient::new(source.clone(), endpoints.pandemic.clone())),
        Arc::new(WeatherClient::new(
            source.clone(),
            endpoints.geocoding.clone(),
            endpoints.forecast.clone(),
        )),
        Arc::new(CryptoMarketClient::new(source.clone(), endpoints.crypto.clone())),
        Arc::new(MarketCapClient),
        Arc::new(NewsFeedClient::new(source, endpoints.news.clone())),
    ]
}

/// Trimmed, non-empty user input.
fn normalize_input(input: Option<&str>) -> Option<&str> {
    input.map(str::trim).filter(|s| !s.is_empty())
}
