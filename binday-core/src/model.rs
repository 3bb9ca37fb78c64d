//! Domain data structures for addresses, collection streams, schedules, and forecasts.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Hour of day at which collections are displayed; only the calendar date is significant.
pub const DISPLAY_HOUR: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Identifier for a suburb/locality known to the waste service.
pub struct LocalityId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Identifier for a street within a locality.
pub struct StreetId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
/// Identifier for an addressable property; the only part of an address that is persisted.
pub struct PropertyId(pub u64);

impl fmt::Display for PropertyId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Suburb returned from the locality lookup.
pub struct Locality {
    /// Unique identifier.
    pub id: LocalityId,
    /// Display name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Street returned from the street lookup.
pub struct Street {
    /// Unique identifier.
    pub id: StreetId,
    /// Display name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Property (house number) returned from the property lookup.
pub struct Property {
    /// Unique identifier used when requesting schedules.
    pub id: PropertyId,
    /// Display name, usually the house number with street.
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Transient state of the address selection flow.
pub struct AddressSelection {
    /// Chosen suburb.
    pub locality: Option<LocalityId>,
    /// Chosen street.
    pub street: Option<StreetId>,
    /// Chosen property.
    pub property: Option<PropertyId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// The three waste streams collected at the kerb.
pub enum Stream {
    /// Food Organics Garden Organics, collected weekly.
    Organic,
    /// Yellow-lid recycling, collected fortnightly.
    Recycling,
    /// Red-lid landfill, collected fortnightly on the other week.
    Landfill,
}

impl Stream {
    /// All streams in display order.
    pub const ALL: [Stream; 3] = [Stream::Organic, Stream::Recycling, Stream::Landfill];

    /// Short label used on cards and in calendar summaries.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Stream::Organic => "FOGO",
            Stream::Recycling => "Recycling",
            Stream::Landfill => "Landfill",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// A stream paired with its next collection date.
pub struct CollectionEntry {
    /// Which bin.
    pub stream: Stream,
    /// Next collection day.
    pub date: NaiveDate,
}

impl CollectionEntry {
    /// Collection date at the fixed display hour.
    #[must_use]
    pub fn display_time(&self) -> NaiveDateTime {
        let hour = NaiveTime::from_hms_opt(DISPLAY_HOUR, 0, 0).unwrap_or_default();
        self.date.and_time(hour)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CollectionEntry>", into = "Vec<CollectionEntry>")]
/// Resolved next-collection dates, at most one per stream.
pub struct Schedule {
    dates: BTreeMap<Stream, NaiveDate>,
}

impl Schedule {
    /// Record the date for a stream, replacing any earlier value.
    pub fn insert(&mut self, stream: Stream, date: NaiveDate) {
        self.dates.insert(stream, date);
    }

    /// Date for the stream, if it was resolved.
    #[must_use]
    pub fn get(&self, stream: Stream) -> Option<NaiveDate> {
        self.dates.get(&stream).copied()
    }

    /// Resolved entries in display order.
    pub fn entries(&self) -> impl Iterator<Item = CollectionEntry> + '_ {
        self.dates
            .iter()
            .map(|(stream, date)| CollectionEntry {
                stream: *stream,
                date: *date,
            })
    }

    /// Earliest resolved collection date across all streams.
    #[must_use]
    pub fn earliest(&self) -> Option<NaiveDate> {
        self.dates.values().min().copied()
    }

    /// Number of resolved streams.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether no stream is resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl From<Vec<CollectionEntry>> for Schedule {
    fn from(entries: Vec<CollectionEntry>) -> Self {
        let mut schedule = Schedule::default();
        for entry in entries {
            schedule.insert(entry.stream, entry.date);
        }
        schedule
    }
}

impl From<Schedule> for Vec<CollectionEntry> {
    fn from(schedule: Schedule) -> Self {
        schedule.entries().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Where a resolved schedule came from.
pub enum ScheduleSource {
    /// Dates listed by the waste service.
    Explicit,
    /// Dates derived from the property's collection weekday.
    Derived,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One collection as listed by the waste service, before normalization.
pub struct RawCollection {
    /// Free-text stream name, e.g. "Landfill Waste".
    pub kind: String,
    /// Next collection date as sent by the service.
    pub next_date: Option<String>,
}

impl RawCollection {
    /// Convenience constructor.
    #[must_use]
    pub fn new<K: Into<String>, D: Into<String>>(kind: K, next_date: Option<D>) -> Self {
        Self {
            kind: kind.into(),
            next_date: next_date.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Per-property waste data from the schedule lookup.
pub struct PropertySchedule {
    /// Explicit next-collection listing; may be empty.
    pub collections: Vec<RawCollection>,
    /// Collection weekday, Monday = 1 through Sunday = 7.
    pub collection_day: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Entry in the A-Z "Which Bin?" guide.
pub struct Material {
    /// Item name, e.g. "Pizza boxes".
    pub title: String,
    /// Bin category slug such as `recycle` or `organic`.
    pub bin_type: Option<String>,
    /// Free-text disposal instruction.
    pub disposal: Option<String>,
    /// Optional handling tip.
    pub tip: Option<String>,
    /// Extra search keywords.
    pub keywords: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Council waste event such as a clean-up day.
pub struct WasteEvent {
    /// Event title.
    pub title: String,
    /// First day of the event, if the service sent a valid one.
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Daily forecast arrays aligned by day offset from today.
pub struct DailyForecast {
    /// Maximum wind speed at 10 m, km/h.
    pub wind_speed_max: Vec<Option<f64>>,
    /// Precipitation sum, mm.
    pub precipitation_sum: Vec<Option<f64>>,
}

impl DailyForecast {
    /// Readings for the given day offset; `None` when either array is too short.
    #[must_use]
    pub fn day(&self, offset: usize) -> Option<ForecastDay> {
        let wind_kmh = *self.wind_speed_max.get(offset)?;
        let rain_mm = *self.precipitation_sum.get(offset)?;
        Some(ForecastDay { wind_kmh, rain_mm })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
/// Forecast readings for one day; a missing value never raises an advisory.
pub struct ForecastDay {
    /// Maximum wind speed, km/h.
    pub wind_kmh: Option<f64>,
    /// Precipitation sum, mm.
    pub rain_mm: Option<f64>,
}
