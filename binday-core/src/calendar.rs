//! iCalendar export of the resolved collection dates.
//!
//! Each resolved stream becomes an all-day event with a display alarm the evening
//! before, so the file can be imported into any calendar app.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use ical::generator::{
    Emitter, IcalCalendar, IcalCalendarBuilder, IcalEvent, IcalEventBuilder, Property,
};
use ical::parser::ical::component::IcalAlarm;
use ical::ical_property;
use tracing::info;

use crate::model::{CollectionEntry, PropertyId, Schedule};
use crate::ports::PortError;

const PROD_ID: &str = "-//Bin Day//Wollongong Waste//EN";
const TIMEZONE: &str = "Australia/Sydney";
const DATE_FORMAT: &str = "%Y%m%d";
const CHANGED_FORMAT: &str = "%Y%m%dT%H%M%SZ";
/// Alarm offset before the collection day's midnight: 6 pm the evening before.
pub const REMINDER_TRIGGER: &str = "-PT18H";

/// Build a calendar with one reminder event per resolved stream.
///
/// # Errors
///
/// Returns [`PortError::NoResults`] when no stream has a date.
pub fn build_calendar(
    property: PropertyId,
    schedule: &Schedule,
    changed: DateTime<Utc>,
) -> Result<IcalCalendar, PortError> {
    if schedule.is_empty() {
        return Err(PortError::NoResults("collection dates"));
    }

    let changed = changed.format(CHANGED_FORMAT).to_string();
    let mut calendar = IcalCalendarBuilder::version("2.0")
        .gregorian()
        .prodid(PROD_ID.to_owned())
        .build();
    for entry in schedule.entries() {
        calendar.events.push(collection_event(property, entry, &changed));
    }
    Ok(calendar)
}

/// Write the calendar for `schedule` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns a [`PortError`] when the schedule is empty or the file cannot be written.
pub fn write_ics(
    path: &Path,
    property: PropertyId,
    schedule: &Schedule,
    changed: DateTime<Utc>,
) -> Result<(), PortError> {
    let calendar = build_calendar(property, schedule, changed)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, calendar.generate())?;
    info!(path = %path.display(), events = calendar.events.len(), "exported calendar");
    Ok(())
}

fn collection_event(property: PropertyId, entry: CollectionEntry, changed: &str) -> IcalEvent {
    let bin = format!("{} Bin", entry.stream.label());
    let day = entry.date.format(DATE_FORMAT).to_string();
    // DTEND is exclusive for all-day events.
    let next_day = (entry.date + Duration::days(1))
        .format(DATE_FORMAT)
        .to_string();

    let mut alarm = IcalAlarm::new();
    alarm.properties.push(ical_property!("TRIGGER", REMINDER_TRIGGER));
    alarm.properties.push(ical_property!("ACTION", "DISPLAY"));
    alarm
        .properties
        .push(ical_property!("DESCRIPTION", format!("Put out {bin} tonight!")));

    let mut event = IcalEventBuilder::tzid(TIMEZONE)
        .uid(uid(property, entry))
        .changed_utc(changed)
        .start_day(day)
        .end_day(next_day)
        .set(ical_property!("SUMMARY", format!("Put out {bin}")))
        .set(ical_property!(
            "DESCRIPTION",
            format!("Bin Day reminder - {bin} collection day")
        ))
        .set(ical_property!("TRANSP", "TRANSPARENT"))
        .build();
    event.alarms.push(alarm);
    event
}

/// Stable per property, stream, and date so re-imports update instead of duplicating.
fn uid(property: PropertyId, entry: CollectionEntry) -> String {
    format!(
        "binday_{property}_{stream}_{date}@wollongong.waste-info.com.au",
        stream = entry.stream.label().to_lowercase(),
        date = entry.date.format(DATE_FORMAT),
    )
}
