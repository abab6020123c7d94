// Render-ready view models
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub time_ms: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(time_ms: i64, value: f64) -> Self {
        Self { time_ms, value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyValue {
    pub label: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn line(&self) -> String {
        format!("{}: {}", self.label, self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarEntry {
    pub label: String,
    pub value: f64,
}

impl BarEntry {
    pub fn new(label: String, value: f64) -> Self {
        Self { label, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkItem {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewModel {
    TimeSeries {
        title: String,
        points: Vec<TimeSeriesPoint>,
        caption: String,
    },
    KeyValueSet {
        entries: Vec<KeyValue>,
    },
    BarSeries {
        title: String,
        bars: Vec<BarEntry>,
        value_prefix: Option<String>,
    },
    LinkList {
        links: Vec<LinkItem>,
    },
    /// Sentinel shown instead of data ("No weather data available", ...).
    Message {
        text: String,
    },
}

impl ViewModel {
    pub fn message(text: impl Into<String>) -> Self {
        ViewModel::Message { text: text.into() }
    }
}
