// Market-cap table - Static figures, trillions USD
use crate::application::data_client::DataClient;
use crate::domain::error::ErrorKind;
use crate::domain::panel::PanelId;
use crate::domain::panel_data::{MarketCap, PanelData};
use async_trait::async_trait;

const MARKET_CAPS: [(&str, f64); 8] = [
    ("Apple", 3.1),
    ("Microsoft", 2.8),
    ("Amazon", 1.9),
    ("Google", 2.0),
    ("NVIDIA", 2.3),
    ("Meta", 1.3),
    ("Tesla", 0.9),
    ("Samsung", 0.6),
];

pub struct MarketCapClient;

impl MarketCapClient {
    /// Largest first; ties keep table order.
    pub fn table() -> Vec<MarketCap> {
        let mut caps: Vec<MarketCap> = MARKET_CAPS
            .iter()
            .map(|(company, trillions)| MarketCap {
                company: company.to_string(),
                trillions_usd: *trillions,
            })
            .collect();
        caps.sort_by(|a, b| b.trillions_usd.total_cmp(&a.trillions_usd));
        caps
    }
}

#[async_trait]
impl DataClient for MarketCapClient {
    fn panel(&self) -> PanelId {
        PanelId::MarketCap
    }

    async fn fetch(&self, _input: Option<&str>) -> Result<PanelData, ErrorKind> {
        Ok(PanelData::MarketCap(Self::table()))
    }
}
