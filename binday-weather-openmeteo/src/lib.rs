//! Weather port backed by the Open-Meteo daily forecast API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use binday_core::{
    model::DailyForecast,
    ports::{PortError, WeatherPort},
    settings::WeatherSettings,
};

/// Daily variables requested from the forecast endpoint.
const DAILY_VARIABLES: &str = "precipitation_sum,wind_speed_10m_max";

/// Response from /v1/forecast
#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    daily: Option<DailyBlock>,
}

/// Arrays indexed by day offset; entries are `null` when the model has no value.
#[derive(Debug, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m_max: Vec<Option<f64>>,
}

/// Forecast client for one fixed location.
pub struct OpenMeteoPort {
    client: Client,
    settings: WeatherSettings,
}

impl OpenMeteoPort {
    /// Create a new port bound to the given HTTP client and location.
    #[must_use]
    pub fn new(client: Client, settings: &WeatherSettings) -> Self {
        Self {
            client,
            settings: settings.clone(),
        }
    }
}

#[async_trait]
impl WeatherPort for OpenMeteoPort {
    async fn daily_forecast(&self, days: u32) -> Result<DailyForecast, PortError> {
        let req = self.client.get(&self.settings.forecast_url).query(&[
            ("latitude", self.settings.latitude.to_string()),
            ("longitude", self.settings.longitude.to_string()),
            ("daily", DAILY_VARIABLES.to_owned()),
            ("timezone", self.settings.timezone.clone()),
            ("forecast_days", days.to_string()),
        ]);

        let resp = fetch_json::<ForecastResponse>(req).await?;
        let daily = resp
            .daily
            .ok_or_else(|| PortError::InvalidResponse("forecast has no daily section".into()))?;
        debug!(
            days,
            wind = daily.wind_speed_10m_max.len(),
            rain = daily.precipitation_sum.len(),
            "fetched daily forecast"
        );

        Ok(DailyForecast {
            wind_speed_max: daily.wind_speed_10m_max,
            precipitation_sum: daily.precipitation_sum,
        })
    }
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    req.send()
        .await
        .map_err(PortError::from)?
        .error_for_status()
        .map_err(PortError::from)?
        .json()
        .await
        .map_err(PortError::from)
}
