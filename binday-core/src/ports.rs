//! Traits describing the remote services and local persistence, plus the shared error type.

use async_trait::async_trait;
use reqwest::Error as ReqwestError;

use crate::model::{
    DailyForecast, Locality, LocalityId, Material, Property, PropertyId, PropertySchedule, Street,
    StreetId, WasteEvent,
};
use crate::resolver::ResolveError;
use crate::store::{ConfigRecord, ScheduleSnapshot};

#[derive(thiserror::Error, Debug)]
/// Errors that can occur while talking to services or the local store.
pub enum PortError {
    /// Network layer failed or the service answered with an error status.
    #[error("Network error: {0}")]
    Network(#[from] ReqwestError),
    /// Local file access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A persisted record could not be encoded or decoded.
    #[error("Storage format error: {0}")]
    Json(#[from] serde_json::Error),
    /// The settings file could not be parsed.
    #[error("Settings error: {0}")]
    Settings(#[from] toml::de::Error),
    /// The schedule response could not be turned into collection dates.
    #[error(transparent)]
    Schedule(#[from] ResolveError),
    /// A lookup returned nothing to choose from.
    #[error("No {0} found")]
    NoResults(&'static str),
    /// The service answered with data that does not fit the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
/// Read-only access to the council waste service.
pub trait WastePort: Send + Sync {
    /// List selectable suburbs.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    async fn localities(&self) -> Result<Vec<Locality>, PortError>;

    /// List the streets of a suburb.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    async fn streets(&self, locality: LocalityId) -> Result<Vec<Street>, PortError>;

    /// List the addressable properties of a street.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    async fn properties(&self, street: StreetId) -> Result<Vec<Property>, PortError>;

    /// Fetch the collection data of a property.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the body cannot be decoded.
    async fn property_schedule(&self, property: PropertyId) -> Result<PropertySchedule, PortError>;

    /// Fetch the A-Z disposal guide.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    async fn materials(&self) -> Result<Vec<Material>, PortError>;

    /// Fetch council waste events.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails.
    async fn events(&self) -> Result<Vec<WasteEvent>, PortError>;
}

#[async_trait]
/// Daily forecast source at fixed coordinates.
pub trait WeatherPort: Send + Sync {
    /// Fetch `days` days of forecast starting today.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the request fails or the daily arrays are missing.
    async fn daily_forecast(&self, days: u32) -> Result<DailyForecast, PortError>;
}

/// Durable storage for the config record and the schedule snapshot.
pub trait StatePort: Send + Sync {
    /// Load the config record, `None` when none was saved yet.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the record exists but cannot be read.
    fn load_config(&self) -> Result<Option<ConfigRecord>, PortError>;

    /// Replace the config record.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the record cannot be written.
    fn save_config(&self, config: &ConfigRecord) -> Result<(), PortError>;

    /// Load the schedule snapshot, `None` when none was saved yet.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the record exists but cannot be read.
    fn load_snapshot(&self) -> Result<Option<ScheduleSnapshot>, PortError>;

    /// Replace the schedule snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the record cannot be written.
    fn save_snapshot(&self, snapshot: &ScheduleSnapshot) -> Result<(), PortError>;
}
