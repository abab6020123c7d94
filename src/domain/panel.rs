// Panel domain model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use super::error::{ErrorKind, UnknownPanel};
use super::view_model::ViewModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelId {
    Equity,
    Pandemic,
    Weather,
    Crypto,
    MarketCap,
    News,
}

impl PanelId {
    /// Display order of the dashboard.
    pub const ALL: [PanelId; 6] = [
        PanelId::Equity,
        PanelId::Pandemic,
        PanelId::Weather,
        PanelId::Crypto,
        PanelId::MarketCap,
        PanelId::News,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PanelId::Equity => "equity",
            PanelId::Pandemic => "pandemic",
            PanelId::Weather => "weather",
            PanelId::Crypto => "crypto",
            PanelId::MarketCap => "market_cap",
            PanelId::News => "news",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            PanelId::Equity => "Live Stock Prices",
            PanelId::Pandemic => "COVID-19 Stats",
            PanelId::Weather => "Weather Updates",
            PanelId::Crypto => "Cryptocurrency Tracker",
            PanelId::MarketCap => "Global Tech Company Market Caps (Trillions USD)",
            PanelId::News => "Latest Tech News",
        }
    }

    /// Whether the panel has a text input (ticker, country or city).
    pub fn takes_input(&self) -> bool {
        matches!(self, PanelId::Equity | PanelId::Pandemic | PanelId::Weather)
    }

    pub fn default_input(&self) -> Option<&'static str> {
        match self {
            PanelId::Equity => Some("AAPL"),
            PanelId::Pandemic => Some("India"),
            PanelId::Weather => Some("New Delhi"),
            _ => None,
        }
    }

    pub fn default_interval(&self) -> Duration {
        let secs = match self {
            PanelId::Equity => 60,
            PanelId::Pandemic => 120,
            PanelId::Weather => 180,
            PanelId::Crypto => 60,
            PanelId::MarketCap => 60,
            PanelId::News => 300,
        };
        Duration::from_secs(secs)
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PanelId {
    type Err = UnknownPanel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PanelId::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPanel(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    TimerTick,
    ManualRequest,
}

/// A request to refresh one panel, emitted by a timer or a user action.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshTrigger {
    pub panel: PanelId,
    pub kind: TriggerKind,
    pub input: Option<String>,
}

impl RefreshTrigger {
    pub fn timer_tick(panel: PanelId) -> Self {
        Self {
            panel,
            kind: TriggerKind::TimerTick,
            input: None,
        }
    }

    pub fn manual(panel: PanelId, input: Option<String>) -> Self {
        Self {
            panel,
            kind: TriggerKind::ManualRequest,
            input,
        }
    }
}

/// What a panel currently displays. Replaced wholesale on every applied refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub panel: PanelId,
    pub input: Option<String>,
    pub status: PanelStatus,
    pub last_fetched_at: Option<DateTime<Utc>>,
    pub view: Option<ViewModel>,
    pub error: Option<ErrorKind>,
    pub request_seq: u64,
}

impl PanelState {
    pub fn idle(panel: PanelId, input: Option<String>) -> Self {
        Self {
            panel,
            input,
            status: PanelStatus::Idle,
            last_fetched_at: None,
            view: None,
            error: None,
            request_seq: 0,
        }
    }
}
