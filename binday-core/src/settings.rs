//! User-tunable settings read from an optional TOML file.
//!
//! Every field has a default, so a missing file or a partial file both work:
//!
//! ```toml
//! request_timeout_secs = 20
//!
//! [weather]
//! latitude = -34.4278
//! longitude = 150.8931
//! ```

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ports::PortError;

/// Council waste-info API root.
pub const WASTE_API_BASE: &str = "https://wollongong.waste-info.com.au/api/v1";
/// Open-Meteo daily forecast endpoint.
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Endpoints and HTTP behaviour.
pub struct Settings {
    /// Waste service root URL.
    pub waste_api_base: String,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Forecast location.
    pub weather: WeatherSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Fixed forecast location.
pub struct WeatherSettings {
    /// Forecast endpoint.
    pub forecast_url: String,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// IANA timezone the daily arrays are aligned to.
    pub timezone: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            waste_api_base: WASTE_API_BASE.to_owned(),
            request_timeout_secs: 10,
            user_agent: concat!("binday/", env!("CARGO_PKG_VERSION")).to_owned(),
            weather: WeatherSettings::default(),
        }
    }
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            forecast_url: FORECAST_URL.to_owned(),
            latitude: -34.4278,
            longitude: 150.8931,
            timezone: "Australia/Sydney".to_owned(),
        }
    }
}

impl Settings {
    /// Read settings from `path`, falling back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, PortError> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no settings file, using defaults");
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// HTTP timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
