// Typed results of the data clients, before formatting
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub close: f64,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, close: f64) -> Self {
        Self { timestamp, close }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquitySeries {
    pub ticker: String,
    pub points: Vec<PricePoint>,
}

impl EquitySeries {
    pub fn new(ticker: String, points: Vec<PricePoint>) -> Self {
        Self { ticker, points }
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PandemicStats {
    pub country: String,
    pub cases: u64,
    pub active: u64,
    pub recovered: u64,
    pub deaths: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub location: String,
    /// Degrees Celsius.
    pub temperature: f64,
    pub windspeed: f64,
    /// Observation time as reported by the forecast API (local ISO-8601).
    pub time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoinPrice {
    pub name: String,
    pub price_usd: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketCap {
    pub company: String,
    pub trillions_usd: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub url: String,
}

/// Output of one data client fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelData {
    Equity(EquitySeries),
    Pandemic(PandemicStats),
    Weather(WeatherReading),
    Crypto(Vec<CoinPrice>),
    MarketCap(Vec<MarketCap>),
    News(Vec<Headline>),
}
