use crate::application::scheduler::PanelSchedule;
use crate::domain::panel::PanelId;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub server: ServerSettings,
    pub http: HttpSettings,
    pub panels: PanelsConfig,
    pub endpoints: EndpointsConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("insights-dashboard/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PanelsConfig {
    pub equity: PanelConfig,
    pub pandemic: PanelConfig,
    pub weather: PanelConfig,
    pub crypto: PanelConfig,
    pub market_cap: PanelConfig,
    pub news: PanelConfig,
}

/// Unset fields fall back to the panel's built-in defaults.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PanelConfig {
    pub enabled: Option<bool>,
    pub interval_secs: Option<u64>,
    pub default_input: Option<String>,
}

/// URL templates; `${name}` placeholders are filled by `prepare_url`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EndpointsConfig {
    pub equity: String,
    pub pandemic: String,
    pub geocoding: String,
    pub forecast: String,
    pub crypto: String,
    pub news: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            equity: "https://query1.finance.yahoo.com/v8/finance/chart/${ticker}?range=1d&interval=5m"
                .to_string(),
            pandemic: "https://disease.sh/v3/covid-19/countries/${country}?strict=true".to_string(),
            geocoding: "https://geocoding-api.open-meteo.com/v1/search?name=${city}&count=1"
                .to_string(),
            forecast: "https://api.open-meteo.com/v1/forecast?latitude=${latitude}&longitude=${longitude}&current_weather=true"
                .to_string(),
            crypto: "https://api.coingecko.com/api/v3/coins/markets?vs_currency=usd&ids=bitcoin,ethereum,solana,dogecoin"
                .to_string(),
            news: "https://hn.algolia.com/api/v1/search?query=technology&tags=story&hitsPerPage=5"
                .to_string(),
        }
    }
}

impl PanelsConfig {
    pub fn get(&self, panel: PanelId) -> &PanelConfig {
        match panel {
            PanelId::Equity => &self.equity,
            PanelId::Pandemic => &self.pandemic,
            PanelId::Weather => &self.weather,
            PanelId::Crypto => &self.crypto,
            PanelId::MarketCap => &self.market_cap,
            PanelId::News => &self.news,
        }
    }
}

impl DashboardConfig {
    /// Schedules for every enabled panel, in dashboard order.
    pub fn schedules(&self) -> Vec<PanelSchedule> {
        PanelId::ALL
            .into_iter()
            .filter(|panel| self.panels.get(*panel).enabled.unwrap_or(true))
            .map(|panel| {
                let config = self.panels.get(panel);
                let interval = config
                    .interval_secs
                    .filter(|secs| *secs > 0)
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| panel.default_interval());
                let default_input = if panel.takes_input() {
                    config
                        .default_input
                        .clone()
                        .or_else(|| panel.default_input().map(str::to_string))
                } else {
                    None
                };
                PanelSchedule::new(panel, interval, default_input)
            })
            .collect()
    }
}

/// Load `config/dashboard.{toml,yaml,json}` if present, then `DASHBOARD__*`
/// environment overrides (e.g. `DASHBOARD__PANELS__EQUITY__INTERVAL_SECS=30`).
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace template variables in a URL, percent-encoding each value
pub fn prepare_url(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, &urlencoding::encode(value));
    }
    result
}
