// Port implemented by each external data adapter
use crate::domain::error::ErrorKind;
use crate::domain::panel::PanelId;
use crate::domain::panel_data::PanelData;
use async_trait::async_trait;

#[async_trait]
pub trait DataClient: Send + Sync {
    /// The panel this client feeds
    fn panel(&self) -> PanelId;

    /// Fetch fresh data for the given input (ticker, country, city or nothing).
    /// Network and parse failures never escape: they come back as `NoData`
    /// or, for the feed-style panels, as an empty result.
    async fn fetch(&self, input: Option<&str>) -> Result<PanelData, ErrorKind>;
}
