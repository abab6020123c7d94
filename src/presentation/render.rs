// Renderer - Maps panel state to chart / text descriptions for the UI
use crate::domain::panel::{PanelId, PanelState, PanelStatus};
use crate::domain::view_model::{BarEntry, KeyValue, LinkItem, TimeSeriesPoint, ViewModel};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedPanel {
    pub panel: PanelId,
    pub title: String,
    pub status: PanelStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    pub last_fetched_at: Option<DateTime<Utc>>,
    /// Request number of the shown data; grows with every applied refresh.
    pub revision: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub body: PanelBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PanelBody {
    LineChart {
        title: String,
        points: Vec<TimeSeriesPoint>,
        caption: String,
    },
    BarChart {
        title: String,
        bars: Vec<BarEntry>,
        #[serde(skip_serializing_if = "Option::is_none")]
        value_prefix: Option<String>,
    },
    Text {
        lines: Vec<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        links: Vec<LinkItem>,
    },
    /// Nothing fetched yet.
    Pending,
}

pub fn render(state: &PanelState) -> RenderedPanel {
    RenderedPanel {
        panel: state.panel,
        title: state.panel.title().to_string(),
        status: state.status,
        input: state.input.clone(),
        last_fetched_at: state.last_fetched_at,
        revision: state.request_seq,
        error: state.error.as_ref().map(|e| e.to_string()),
        body: state.view.as_ref().map(render_view).unwrap_or(PanelBody::Pending),
    }
}

fn render_view(view: &ViewModel) -> PanelBody {
    match view {
        ViewModel::TimeSeries {
            title,
            points,
            caption,
        } => PanelBody::LineChart {
            title: title.clone(),
            points: points.clone(),
            caption: caption.clone(),
        },
        ViewModel::BarSeries {
            title,
            bars,
            value_prefix,
        } => PanelBody::BarChart {
            title: title.clone(),
            bars: bars.clone(),
            value_prefix: value_prefix.clone(),
        },
        ViewModel::KeyValueSet { entries } => PanelBody::Text {
            lines: entries.iter().map(KeyValue::line).collect(),
            links: Vec::new(),
        },
        ViewModel::LinkList { links } => PanelBody::Text {
            lines: Vec::new(),
            links: links.clone(),
        },
        ViewModel::Message { text } => PanelBody::Text {
            lines: vec![text.clone()],
            links: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::panel_store::PanelStore;
    use crate::application::view_builder::{build_view, NO_NEWS};
    use crate::domain::panel::RefreshTrigger;
    use crate::application::data_client::DataClient;
    use crate::domain::panel_data::{PandemicStats, PanelData};
    use crate::infrastructure::clients::{NewsFeedClient, PandemicStatsClient};
    use crate::infrastructure::config::EndpointsConfig;
    use crate::infrastructure::http_source::testing::FakeJsonSource;
    use serde_json::json;
    use std::sync::Arc;

    fn refreshed(panel: PanelId, input: Option<&str>, data: PanelData) -> PanelState {
        let store = PanelStore::new([(panel, input.map(str::to_string))]);
        let request = store.begin(&RefreshTrigger::timer_tick(panel)).unwrap();
        let outcome = build_view(panel, request.input.as_deref(), Ok(data));
        store.complete(&request, outcome);
        store.snapshot(panel).unwrap()
    }

    /// One timer-driven refresh through a real client, as the scheduler runs it.
    async fn fetched(client: &dyn DataClient, input: Option<&str>) -> PanelState {
        let panel = client.panel();
        let store = PanelStore::new([(panel, input.map(str::to_string))]);
        let request = store.begin(&RefreshTrigger::timer_tick(panel)).unwrap();
        let result = client.fetch(request.input.as_deref()).await;
        store.complete(&request, build_view(panel, request.input.as_deref(), result));
        store.snapshot(panel).unwrap()
    }

    #[tokio::test]
    async fn test_pandemic_api_body_renders_grouped_counters() {
        let source = FakeJsonSource::new().route(
            "/countries/India?strict=true",
            json!({
                "updated": 1741962600000u64,
                "country": "India",
                "cases": 1000,
                "todayCases": 0,
                "deaths": 20,
                "recovered": 880,
                "active": 100
            }),
        );
        let client = PandemicStatsClient::new(Arc::new(source), EndpointsConfig::default().pandemic);

        let rendered = render(&fetched(&client, Some("India")).await);

        assert_eq!(rendered.status, PanelStatus::Ready);
        assert_eq!(
            rendered.body,
            PanelBody::Text {
                lines: vec![
                    "Country: India".to_string(),
                    "Cases: 1,000".to_string(),
                    "Active: 100".to_string(),
                    "Recovered: 880".to_string(),
                    "Deaths: 20".to_string(),
                ],
                links: Vec::new(),
            }
        );
    }

    #[tokio::test]
    async fn test_news_api_without_hits_renders_only_the_sentinel() {
        let source = FakeJsonSource::new().route(
            "hn.algolia.com",
            json!({ "hits": [], "nbHits": 0, "page": 0 }),
        );
        let client = NewsFeedClient::new(Arc::new(source), EndpointsConfig::default().news);

        let rendered = render(&fetched(&client, None).await);

        assert_eq!(rendered.status, PanelStatus::Ready);
        assert!(rendered.error.is_none());
        assert_eq!(
            serde_json::to_value(&rendered.body).unwrap(),
            json!({ "kind": "text", "lines": [NO_NEWS] })
        );
    }

    #[test]
    fn test_pandemic_renders_formatted_lines() {
        let state = refreshed(
            PanelId::Pandemic,
            Some("India"),
            PanelData::Pandemic(PandemicStats {
                country: "India".to_string(),
                cases: 1000,
                active: 100,
                recovered: 880,
                deaths: 20,
            }),
        );

        let rendered = render(&state);

        assert_eq!(rendered.status, PanelStatus::Ready);
        let PanelBody::Text { lines, .. } = rendered.body else {
            panic!("expected text body");
        };
        assert!(lines.contains(&"Cases: 1,000".to_string()));
        assert!(lines.contains(&"Active: 100".to_string()));
        assert!(lines.contains(&"Recovered: 880".to_string()));
        assert!(lines.contains(&"Deaths: 20".to_string()));
    }

    #[test]
    fn test_no_news_renders_exactly_the_sentinel() {
        let state = refreshed(PanelId::News, None, PanelData::News(Vec::new()));

        assert_eq!(
            render(&state).body,
            PanelBody::Text {
                lines: vec![NO_NEWS.to_string()],
                links: Vec::new(),
            }
        );
    }

    #[test]
    fn test_idle_panel_is_pending() {
        let rendered = render(&PanelState::idle(PanelId::Crypto, None));

        assert_eq!(rendered.status, PanelStatus::Idle);
        assert_eq!(rendered.body, PanelBody::Pending);
        assert_eq!(rendered.title, "Cryptocurrency Tracker");
    }

    #[test]
    fn test_json_shape() {
        let state = refreshed(
            PanelId::MarketCap,
            None,
            PanelData::MarketCap(vec![crate::domain::panel_data::MarketCap {
                company: "Apple".to_string(),
                trillions_usd: 3.1,
            }]),
        );

        let value = serde_json::to_value(render(&state)).unwrap();

        assert_eq!(value["panel"], json!("market_cap"));
        assert_eq!(value["status"], json!("ready"));
        assert_eq!(value["body"]["kind"], json!("bar_chart"));
        assert_eq!(value["body"]["bars"][0], json!({ "label": "Apple", "value": 3.1 }));
        assert!(value.get("input").is_none());
        assert!(value["body"].get("value_prefix").is_none());
    }
}
