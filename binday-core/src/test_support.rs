//! In-memory ports for unit tests.

use std::io::{Error as IoError, ErrorKind};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::model::{
    DailyForecast, Locality, LocalityId, Material, Property, PropertyId, PropertySchedule, Street,
    StreetId, WasteEvent,
};
use crate::ports::{PortError, StatePort, WastePort, WeatherPort};
use crate::store::{ConfigRecord, ScheduleSnapshot};

fn offline_error() -> PortError {
    PortError::Io(IoError::new(ErrorKind::ConnectionRefused, "offline"))
}

#[derive(Default)]
pub(crate) struct FakeWaste {
    pub(crate) localities: Vec<Locality>,
    pub(crate) streets: Vec<Street>,
    pub(crate) properties: Vec<Property>,
    pub(crate) schedule: Option<PropertySchedule>,
    pub(crate) streets_offline: bool,
    pub(crate) schedule_requests: Mutex<Vec<PropertyId>>,
    pub(crate) street_requests: Mutex<Vec<LocalityId>>,
}

impl FakeWaste {
    pub(crate) fn with_schedule(schedule: PropertySchedule) -> Self {
        Self {
            schedule: Some(schedule),
            ..Self::default()
        }
    }

    pub(crate) fn offline() -> Self {
        Self::default()
    }

    pub(crate) fn schedule_requests(&self) -> usize {
        self.schedule_requests.lock().expect("lock").len()
    }

    pub(crate) fn last_property(&self) -> Option<PropertyId> {
        self.schedule_requests.lock().expect("lock").last().copied()
    }

    pub(crate) fn street_requests(&self) -> Vec<LocalityId> {
        self.street_requests.lock().expect("lock").clone()
    }
}

#[async_trait]
impl WastePort for FakeWaste {
    async fn localities(&self) -> Result<Vec<Locality>, PortError> {
        Ok(self.localities.clone())
    }

    async fn streets(&self, locality: LocalityId) -> Result<Vec<Street>, PortError> {
        self.street_requests.lock().expect("lock").push(locality);
        if self.streets_offline {
            return Err(offline_error());
        }
        Ok(self.streets.clone())
    }

    async fn properties(&self, _street: StreetId) -> Result<Vec<Property>, PortError> {
        Ok(self.properties.clone())
    }

    async fn property_schedule(&self, property: PropertyId) -> Result<PropertySchedule, PortError> {
        self.schedule_requests.lock().expect("lock").push(property);
        self.schedule.clone().ok_or_else(offline_error)
    }

    async fn materials(&self) -> Result<Vec<Material>, PortError> {
        Ok(Vec::new())
    }

    async fn events(&self) -> Result<Vec<WasteEvent>, PortError> {
        Ok(Vec::new())
    }
}

pub(crate) struct FakeWeather {
    forecast: Option<DailyForecast>,
    requested: Mutex<Vec<u32>>,
}

impl FakeWeather {
    pub(crate) fn returning(forecast: DailyForecast) -> Self {
        Self {
            forecast: Some(forecast),
            requested: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calm() -> Self {
        Self::returning(DailyForecast {
            wind_speed_max: vec![Some(5.0); 8],
            precipitation_sum: vec![Some(0.0); 8],
        })
    }

    pub(crate) fn offline() -> Self {
        Self {
            forecast: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requested(&self) -> Vec<u32> {
        self.requested.lock().expect("lock").clone()
    }
}

#[async_trait]
impl WeatherPort for FakeWeather {
    async fn daily_forecast(&self, days: u32) -> Result<DailyForecast, PortError> {
        self.requested.lock().expect("lock").push(days);
        self.forecast.clone().ok_or_else(offline_error)
    }
}

#[derive(Default)]
pub(crate) struct MemoryStore {
    config: Mutex<Option<ConfigRecord>>,
    snapshot: Mutex<Option<ScheduleSnapshot>>,
}

impl MemoryStore {
    pub(crate) fn with_config(config: ConfigRecord) -> Self {
        Self {
            config: Mutex::new(Some(config)),
            snapshot: Mutex::new(None),
        }
    }
}

impl StatePort for MemoryStore {
    fn load_config(&self) -> Result<Option<ConfigRecord>, PortError> {
        Ok(self.config.lock().expect("lock").clone())
    }

    fn save_config(&self, config: &ConfigRecord) -> Result<(), PortError> {
        *self.config.lock().expect("lock") = Some(config.clone());
        Ok(())
    }

    fn load_snapshot(&self) -> Result<Option<ScheduleSnapshot>, PortError> {
        Ok(self.snapshot.lock().expect("lock").clone())
    }

    fn save_snapshot(&self, snapshot: &ScheduleSnapshot) -> Result<(), PortError> {
        *self.snapshot.lock().expect("lock") = Some(snapshot.clone());
        Ok(())
    }
}
