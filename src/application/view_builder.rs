// View model builder - Pure formatting of client output into render-ready views
use crate::domain::error::ErrorKind;
use crate::domain::panel::{PanelId, PanelStatus};
use crate::domain::panel_data::{
    CoinPrice, EquitySeries, Headline, MarketCap, PandemicStats, PanelData, WeatherReading,
};
use crate::domain::view_model::{BarEntry, KeyValue, LinkItem, TimeSeriesPoint, ViewModel};

pub const NO_PANDEMIC_DATA: &str = "No data available.";
pub const NO_WEATHER_DATA: &str = "No weather data available";
pub const NO_NEWS: &str = "No latest news available";

/// Result of building a view for one completed fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelOutcome {
    pub status: PanelStatus,
    pub view: ViewModel,
    pub error: Option<ErrorKind>,
}

impl PanelOutcome {
    fn ready(view: ViewModel) -> Self {
        Self {
            status: PanelStatus::Ready,
            view,
            error: None,
        }
    }

    fn failed(error: ErrorKind, message: String) -> Self {
        Self {
            status: PanelStatus::Failed,
            view: ViewModel::message(message),
            error: Some(error),
        }
    }
}

pub fn build_view(
    panel: PanelId,
    input: Option<&str>,
    result: Result<PanelData, ErrorKind>,
) -> PanelOutcome {
    match result {
        Ok(PanelData::Equity(series)) => equity_view(series),
        Ok(PanelData::Pandemic(stats)) => PanelOutcome::ready(pandemic_view(&stats)),
        Ok(PanelData::Weather(reading)) => PanelOutcome::ready(weather_view(&reading)),
        Ok(PanelData::Crypto(coins)) => PanelOutcome::ready(crypto_view(coins)),
        Ok(PanelData::MarketCap(caps)) => PanelOutcome::ready(market_cap_view(caps)),
        Ok(PanelData::News(headlines)) => PanelOutcome::ready(news_view(headlines)),
        Err(error) => {
            let message = failure_message(panel, input);
            PanelOutcome::failed(error, message)
        }
    }
}

fn failure_message(panel: PanelId, input: Option<&str>) -> String {
    match panel {
        PanelId::Equity => format!("No data for {}", input.unwrap_or_default().trim().to_uppercase()),
        PanelId::Pandemic => NO_PANDEMIC_DATA.to_string(),
        PanelId::Weather => NO_WEATHER_DATA.to_string(),
        PanelId::News => NO_NEWS.to_string(),
        PanelId::Crypto | PanelId::MarketCap => format!("No data for {}", panel.title()),
    }
}

fn equity_view(series: EquitySeries) -> PanelOutcome {
    let Some(latest) = series.latest() else {
        let message = format!("No data for {}", series.ticker);
        return PanelOutcome::failed(ErrorKind::no_data(series.ticker), message);
    };

    let caption = format!(
        "Last Updated: {} | Price: ${:.2}",
        latest.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
        latest.close
    );
    let points = series
        .points
        .iter()
        .map(|p| TimeSeriesPoint::new(p.timestamp.timestamp_millis(), p.close))
        .collect();

    PanelOutcome::ready(ViewModel::TimeSeries {
        title: format!("{} Live Price", series.ticker),
        points,
        caption,
    })
}

fn pandemic_view(stats: &PandemicStats) -> ViewModel {
    ViewModel::KeyValueSet {
        entries: vec![
            KeyValue::new("Country", stats.country.clone()),
            KeyValue::new("Cases", group_thousands(stats.cases as f64, 0)),
            KeyValue::new("Active", group_thousands(stats.active as f64, 0)),
            KeyValue::new("Recovered", group_thousands(stats.recovered as f64, 0)),
            KeyValue::new("Deaths", group_thousands(stats.deaths as f64, 0)),
        ],
    }
}

fn weather_view(reading: &WeatherReading) -> ViewModel {
    ViewModel::KeyValueSet {
        entries: vec![
            KeyValue::new("Location", reading.location.clone()),
            KeyValue::new("Temperature", format!("{}°C", reading.temperature)),
            KeyValue::new("Windspeed", format!("{} m/s", reading.windspeed)),
            KeyValue::new("Time", reading.time.clone()),
        ],
    }
}

fn crypto_view(coins: Vec<CoinPrice>) -> ViewModel {
    ViewModel::BarSeries {
        title: "Top Cryptos (USD)".to_string(),
        bars: coins
            .into_iter()
            .map(|c| BarEntry::new(c.name, c.price_usd))
            .collect(),
        value_prefix: Some("$".to_string()),
    }
}

fn market_cap_view(caps: Vec<MarketCap>) -> ViewModel {
    ViewModel::BarSeries {
        title: PanelId::MarketCap.title().to_string(),
        bars: caps
            .into_iter()
            .map(|c| BarEntry::new(c.company, c.trillions_usd))
            .collect(),
        value_prefix: None,
    }
}

fn news_view(headlines: Vec<Headline>) -> ViewModel {
    if headlines.is_empty() {
        return ViewModel::message(NO_NEWS);
    }
    ViewModel::LinkList {
        links: headlines
            .into_iter()
            .map(|h| LinkItem {
                title: h.title,
                url: h.url,
            })
            .collect(),
    }
}

/// Format with a fixed number of decimals and `,` between groups of three
/// integer digits: `1234567.891, 2` -> `1,234,567.89`.
pub fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let digits = int_part.as_bytes();
    let mut grouped = String::with_capacity(formatted.len() + digits.len() / 3 + 1);
    // "-0" is not a useful output
    if value < 0.0 && formatted.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        grouped.push('-');
    }
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit as char);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::panel_data::PricePoint;
    use chrono::{TimeZone, Utc};

    fn lines(view: &ViewModel) -> Vec<String> {
        match view {
            ViewModel::KeyValueSet { entries } => entries.iter().map(KeyValue::line).collect(),
            other => panic!("expected key/value set, got {:?}", other),
        }
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0.0, 0), "0");
        assert_eq!(group_thousands(100.0, 0), "100");
        assert_eq!(group_thousands(1000.0, 0), "1,000");
        assert_eq!(group_thousands(44_690_738.0, 0), "44,690,738");
        assert_eq!(group_thousands(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(group_thousands(-98_765.4, 1), "-98,765.4");
        assert_eq!(group_thousands(-0.001, 2), "0.00");
    }

    #[test]
    fn test_pandemic_view_formats_counters() {
        let stats = PandemicStats {
            country: "India".to_string(),
            cases: 1000,
            active: 100,
            recovered: 880,
            deaths: 20,
        };
        let outcome = build_view(PanelId::Pandemic, Some("India"), Ok(PanelData::Pandemic(stats)));

        assert_eq!(outcome.status, PanelStatus::Ready);
        assert_eq!(
            lines(&outcome.view),
            vec![
                "Country: India",
                "Cases: 1,000",
                "Active: 100",
                "Recovered: 880",
                "Deaths: 20"
            ]
        );
    }

    #[test]
    fn test_equity_view_caption_uses_latest_point() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 14, 14, 30, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2025, 3, 14, 14, 35, 0).unwrap();
        let series = EquitySeries::new(
            "AAPL".to_string(),
            vec![PricePoint::new(t0, 212.1), PricePoint::new(t1, 213.456)],
        );

        let outcome = build_view(PanelId::Equity, Some("aapl"), Ok(PanelData::Equity(series)));

        match outcome.view {
            ViewModel::TimeSeries {
                title,
                points,
                caption,
            } => {
                assert_eq!(title, "AAPL Live Price");
                assert_eq!(points.len(), 2);
                assert_eq!(points[1].time_ms, t1.timestamp_millis());
                assert_eq!(
                    caption,
                    "Last Updated: 2025-03-14 14:35:00 UTC | Price: $213.46"
                );
            }
            other => panic!("expected time series, got {:?}", other),
        }
    }

    #[test]
    fn test_failures_render_fixed_messages() {
        let equity = build_view(PanelId::Equity, Some(" tsla "), Err(ErrorKind::no_data("TSLA")));
        assert_eq!(equity.status, PanelStatus::Failed);
        assert_eq!(equity.view, ViewModel::message("No data for TSLA"));
        assert_eq!(equity.error, Some(ErrorKind::no_data("TSLA")));

        let weather = build_view(PanelId::Weather, Some("Atlantis"), Err(ErrorKind::no_data("Atlantis")));
        assert_eq!(weather.view, ViewModel::message(NO_WEATHER_DATA));

        let pandemic = build_view(PanelId::Pandemic, Some("Nowhere"), Err(ErrorKind::no_data("Nowhere")));
        assert_eq!(pandemic.view, ViewModel::message(NO_PANDEMIC_DATA));
    }

    #[test]
    fn test_empty_news_is_the_no_news_message() {
        let outcome = build_view(PanelId::News, None, Ok(PanelData::News(Vec::new())));
        assert_eq!(outcome.status, PanelStatus::Ready);
        assert_eq!(outcome.view, ViewModel::message(NO_NEWS));
    }

    #[test]
    fn test_empty_crypto_is_an_empty_chart() {
        let outcome = build_view(PanelId::Crypto, None, Ok(PanelData::Crypto(Vec::new())));
        assert_eq!(outcome.status, PanelStatus::Ready);
        match outcome.view {
            ViewModel::BarSeries { bars, value_prefix, .. } => {
                assert!(bars.is_empty());
                assert_eq!(value_prefix.as_deref(), Some("$"));
            }
            other => panic!("expected bar series, got {:?}", other),
        }
    }

    #[test]
    fn test_weather_view() {
        let reading = WeatherReading {
            location: "New Delhi, India".to_string(),
            temperature: 31.4,
            windspeed: 7.2,
            time: "2025-06-01T12:00".to_string(),
        };
        let outcome = build_view(PanelId::Weather, Some("New Delhi"), Ok(PanelData::Weather(reading)));
        assert_eq!(
            lines(&outcome.view),
            vec![
                "Location: New Delhi, India",
                "Temperature: 31.4°C",
                "Windspeed: 7.2 m/s",
                "Time: 2025-06-01T12:00"
            ]
        );
    }
}
