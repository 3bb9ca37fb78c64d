//! Session facade: persisted selection, cached schedule, refresh, and weather advisories.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use tracing::{info, warn};

use crate::advisory::{Advisory, fetch_advisories};
use crate::clock::Clock;
use crate::model::{PropertyId, Schedule, Stream};
use crate::ports::{PortError, StatePort, WastePort, WeatherPort};
use crate::resolver::{ResolveError, days_until, resolve};
use crate::store::{ConfigRecord, ScheduleSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Where the session is in its load/refresh lifecycle.
pub enum SessionState {
    /// Nothing loaded yet.
    Uninitialized,
    /// No property has been selected; setup has to run first.
    NeedsSetup,
    /// A property is selected and a schedule from an earlier run is shown.
    HasCachedSchedule,
    /// A property is selected but no schedule has been fetched yet.
    HasNoSchedule,
    /// A refresh is running.
    Refreshing,
    /// The last refresh stored a new schedule.
    RefreshSucceeded,
    /// The last refresh failed; any cached schedule is still shown.
    RefreshFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Status line shown under the schedule.
pub enum Status {
    /// Nothing to report.
    Idle,
    /// Setup has not been completed.
    SetupRequired,
    /// Showing the snapshot loaded at startup.
    Cached {
        /// When the snapshot was fetched.
        cached_at: DateTime<Utc>,
    },
    /// No snapshot exists yet.
    NoCachedData,
    /// A refresh is running.
    Refreshing,
    /// A refresh succeeded.
    Updated {
        /// When the schedule was fetched.
        at: DateTime<Utc>,
        /// Whether the snapshot reached the disk.
        persisted: bool,
    },
    /// A refresh failed and the cached snapshot is shown instead.
    Offline {
        /// When the shown snapshot was fetched.
        cached_at: DateTime<Utc>,
    },
    /// A refresh failed and there is nothing cached.
    Unavailable,
}

impl Status {
    /// Whether the status reports a problem.
    #[must_use]
    pub fn is_problem(&self) -> bool {
        matches!(
            self,
            Status::Offline { .. } | Status::Unavailable | Status::Updated { persisted: false, .. }
        )
    }
}

impl fmt::Display for Status {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local = |instant: &DateTime<Utc>| {
            instant
                .with_timezone(&Local)
                .format("%d/%m/%Y %H:%M")
                .to_string()
        };
        match self {
            Status::Idle => Ok(()),
            Status::SetupRequired => formatter.write_str("Select your address to get started"),
            Status::Cached { cached_at } => {
                write!(formatter, "Using cached data from {}", local(cached_at))
            }
            Status::NoCachedData => formatter.write_str("No cached data available"),
            Status::Refreshing => formatter.write_str("Refreshing..."),
            Status::Updated {
                at,
                persisted: true,
            } => write!(formatter, "Last updated: {}", local(at)),
            Status::Updated {
                at,
                persisted: false,
            } => write!(
                formatter,
                "Last updated: {} (could not save cache)",
                local(at)
            ),
            Status::Offline { cached_at } => write!(
                formatter,
                "Offline - showing cached data from {}",
                local(cached_at)
            ),
            Status::Unavailable => formatter.write_str("Error: No internet and no cached data"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Days-until view of one stream; both fields are `None` for an unresolved stream.
pub struct Countdown {
    /// Which bin.
    pub stream: Stream,
    /// Next collection date.
    pub date: Option<NaiveDate>,
    /// Whole days until `date`.
    pub days: Option<i64>,
}

/// Ports a [`Session`] talks to.
pub struct SessionPorts {
    /// Council waste service.
    pub waste: Arc<dyn WastePort>,
    /// Forecast service.
    pub weather: Arc<dyn WeatherPort>,
    /// Config/cache persistence.
    pub store: Arc<dyn StatePort>,
    /// Time source.
    pub clock: Arc<dyn Clock>,
}

/// One app session: owns the config record and the schedule snapshot, and decides between
/// cached and fresh data.
///
/// Refreshing needs `&mut self`, so a session never runs two refreshes at once and the
/// snapshot has a single writer.
pub struct Session {
    ports: SessionPorts,
    state: SessionState,
    status: Status,
    config: Option<ConfigRecord>,
    snapshot: Option<ScheduleSnapshot>,
    advisories: Vec<Advisory>,
}

impl Session {
    /// Create an uninitialized session.
    #[must_use]
    pub fn new(ports: SessionPorts) -> Self {
        Self {
            ports,
            state: SessionState::Uninitialized,
            status: Status::Idle,
            config: None,
            snapshot: None,
            advisories: Vec::new(),
        }
    }

    /// Load the persisted config and snapshot without touching the network.
    ///
    /// Unreadable records are logged and treated as missing.
    pub fn load(&mut self) -> SessionState {
        self.config = match self.ports.store.load_config() {
            Ok(config) => config.filter(|config| config.setup_completed),
            Err(err) => {
                warn!(error = %err, "could not read config record");
                None
            }
        };

        let Some(property_id) = self.property_id() else {
            info!("no property configured, setup required");
            self.snapshot = None;
            self.state = SessionState::NeedsSetup;
            self.status = Status::SetupRequired;
            return self.state;
        };

        self.snapshot = match self.ports.store.load_snapshot() {
            Ok(Some(snapshot)) if snapshot.property_id == property_id => Some(snapshot),
            Ok(Some(snapshot)) => {
                info!(
                    cached = %snapshot.property_id,
                    configured = %property_id,
                    "ignoring snapshot of another property"
                );
                None
            }
            Ok(None) => None,
            Err(err) => {
                warn!(error = %err, "could not read schedule snapshot");
                None
            }
        };

        self.show_snapshot_state();
        info!(state = ?self.state, %property_id, "session loaded");
        self.state
    }

    /// Persist a newly selected property and make it the refresh key.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] when the config record cannot be written; the session keeps its
    /// previous selection in that case.
    pub fn complete_setup(&mut self, property_id: PropertyId) -> Result<(), PortError> {
        let config = ConfigRecord {
            property_id,
            setup_completed: true,
            setup_date: self.ports.clock.now(),
        };
        self.ports.store.save_config(&config)?;
        info!(%property_id, "setup completed");
        self.config = Some(config);

        if self
            .snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.property_id != property_id)
        {
            self.snapshot = None;
            self.advisories.clear();
        }
        self.show_snapshot_state();
        Ok(())
    }

    /// Fetch the current schedule, persist it, and recompute advisories.
    ///
    /// On failure the cached snapshot stays as it is, in memory and on disk. The weather step
    /// runs whenever a schedule, fresh or cached, is available.
    pub async fn refresh(&mut self) -> SessionState {
        if self.state == SessionState::Uninitialized {
            self.load();
        }
        let Some(property_id) = self.property_id() else {
            self.state = SessionState::NeedsSetup;
            self.status = Status::SetupRequired;
            return self.state;
        };

        self.state = SessionState::Refreshing;
        self.status = Status::Refreshing;

        let now = self.ports.clock.now();
        let today = self.ports.clock.today();
        let resolution = self
            .ports
            .waste
            .property_schedule(property_id)
            .await
            .and_then(|response| {
                let resolution = resolve(&response.collections, response.collection_day, today)?;
                // A listing with nothing usable must not overwrite the cache.
                if resolution.schedule.is_empty() {
                    return Err(ResolveError::ScheduleUnavailable.into());
                }
                Ok(resolution)
            });

        match resolution {
            Ok(resolution) => {
                let snapshot = ScheduleSnapshot {
                    property_id,
                    collections: resolution.schedule,
                    source: resolution.source,
                    discarded: resolution.discarded,
                    cached_at: now,
                };
                let persisted = match self.ports.store.save_snapshot(&snapshot) {
                    Ok(()) => true,
                    Err(err) => {
                        warn!(error = %err, "could not persist schedule snapshot");
                        false
                    }
                };
                info!(
                    %property_id,
                    source = ?snapshot.source,
                    streams = snapshot.collections.len(),
                    "schedule refreshed"
                );
                self.snapshot = Some(snapshot);
                self.state = SessionState::RefreshSucceeded;
                self.status = Status::Updated { at: now, persisted };
            }
            Err(err) => {
                warn!(error = %err, %property_id, "schedule refresh failed");
                self.state = SessionState::RefreshFailed;
                self.status = match &self.snapshot {
                    Some(snapshot) => Status::Offline {
                        cached_at: snapshot.cached_at,
                    },
                    None => Status::Unavailable,
                };
            }
        }

        self.advisories = match &self.snapshot {
            Some(snapshot) => {
                fetch_advisories(self.ports.weather.as_ref(), &snapshot.collections, today).await
            }
            None => Vec::new(),
        };

        self.state
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Current status line.
    #[must_use]
    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Persisted config record, if setup completed.
    #[must_use]
    pub fn config(&self) -> Option<&ConfigRecord> {
        self.config.as_ref()
    }

    /// Property used for refreshes.
    #[must_use]
    pub fn property_id(&self) -> Option<PropertyId> {
        self.config.as_ref().map(|config| config.property_id)
    }

    /// Snapshot currently displayed.
    #[must_use]
    pub fn snapshot(&self) -> Option<&ScheduleSnapshot> {
        self.snapshot.as_ref()
    }

    /// Schedule currently displayed.
    #[must_use]
    pub fn schedule(&self) -> Option<&Schedule> {
        self.snapshot.as_ref().map(|snapshot| &snapshot.collections)
    }

    /// Advisories for the next collection day.
    #[must_use]
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    /// Today's date according to the session clock.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.ports.clock.today()
    }

    /// Waste service port, shared with the setup wizard and the materials guide.
    #[must_use]
    pub fn waste(&self) -> Arc<dyn WastePort> {
        Arc::clone(&self.ports.waste)
    }

    /// Days until the next collection of every stream, in display order.
    #[must_use]
    pub fn countdowns(&self) -> Vec<Countdown> {
        let today = self.today();
        Stream::ALL
            .into_iter()
            .map(|stream| {
                let date = self.schedule().and_then(|schedule| schedule.get(stream));
                Countdown {
                    stream,
                    date,
                    days: date.map(|date| days_until(date, today)),
                }
            })
            .collect()
    }

    fn show_snapshot_state(&mut self) {
        match &self.snapshot {
            Some(snapshot) => {
                self.state = SessionState::HasCachedSchedule;
                self.status = Status::Cached {
                    cached_at: snapshot.cached_at,
                };
            }
            None => {
                self.state = SessionState::HasNoSchedule;
                self.status = Status::NoCachedData;
            }
        }
    }
}
