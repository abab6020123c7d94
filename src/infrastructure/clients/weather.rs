// Weather client - Geocode the city, then read current conditions from Open-Meteo
use super::normalize_input;
use crate::application::data_client::DataClient;
use crate::application::json_source::JsonSource;
use crate::domain::error::ErrorKind;
use crate::domain::panel::PanelId;
use crate::domain::panel_data::{PanelData, WeatherReading};
use crate::infrastructure::config::prepare_url;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    // Absent when nothing matches
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    country: Option<String>,
}

impl Place {
    fn display_name(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    windspeed: f64,
    time: String,
}

pub struct WeatherClient {
    source: Arc<dyn JsonSource>,
    geocoding_template: String,
    forecast_template: String,
}

impl WeatherClient {
    pub fn new(source: Arc<dyn JsonSource>, geocoding_template: String, forecast_template: String) -> Self {
        Self {
            source,
            geocoding_template,
            forecast_template,
        }
    }

    async fn geocode(&self, city: &str) -> Result<Option<Place>> {
        let mut vars = HashMap::new();
        vars.insert("city", city.to_string());
        let url = prepare_url(&self.geocoding_template, &vars);

        let body = self.source.get_json(&url).await?;
        let response: GeocodingResponse =
            serde_json::from_value(body).context("Unexpected geocoding response shape")?;

        Ok(response.results.into_iter().next())
    }

    async fn current_conditions(&self, place: &Place) -> Result<CurrentWeather> {
        let mut vars = HashMap::new();
        vars.insert("latitude", place.latitude.to_string());
        vars.insert("longitude", place.longitude.to_string());
        let url = prepare_url(&self.forecast_template, &vars);

        let body = self.source.get_json(&url).await?;
        let response: ForecastResponse =
            serde_json::from_value(body).context("Unexpected forecast response shape")?;

        Ok(response.current_weather)
    }

    /// Both steps or nothing: a failed or empty lookup never reaches the forecast.
    async fn load(&self, city: &str) -> Result<Option<WeatherReading>> {
        let Some(place) = self.geocode(city).await? else {
            return Ok(None);
        };
        let current = self.current_conditions(&place).await?;

        Ok(Some(WeatherReading {
            location: place.display_name(),
            temperature: current.temperature,
            windspeed: current.windspeed,
            time: current.time,
        }))
    }
}

#[async_trait]
impl DataClient for WeatherClient {
    fn panel(&self) -> PanelId {
        PanelId::Weather
    }

    async fn fetch(&self, input: Option<&str>) -> Result<PanelData, ErrorKind> {
        let Some(city) = normalize_input(input) else {
            return Err(ErrorKind::no_data("empty city"));
        };

        match self.load(city).await {
            Ok(Some(reading)) => Ok(PanelData::Weather(reading)),
            Ok(None) => {
                tracing::warn!("No geocoding match for {}", city);
                Err(ErrorKind::no_data(city))
            }
            Err(e) => {
                tracing::warn!("Error fetching weather for {}: {:#}", city, e);
                Err(ErrorKind::no_data(city))
            }
        }
    }
}
