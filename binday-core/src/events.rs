//! Picks the next council waste event worth showing on the dashboard.

use std::fmt;

use chrono::NaiveDate;

use crate::model::WasteEvent;

/// Events further away than this many days are not shown.
pub const EVENT_HORIZON_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
/// An event starting within the horizon.
pub struct UpcomingEvent {
    /// Event title.
    pub title: String,
    /// First day of the event.
    pub date: NaiveDate,
    /// Whole days from today until the event.
    pub days_until: i64,
}

impl UpcomingEvent {
    /// Countdown wording, e.g. "Tomorrow".
    #[must_use]
    pub fn when(&self) -> String {
        match self.days_until {
            0 => "TODAY".to_owned(),
            1 => "Tomorrow".to_owned(),
            days => format!("In {days} days"),
        }
    }
}

impl fmt::Display for UpcomingEvent {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.when(), self.title)
    }
}

/// Soonest event starting between today and the horizon, inclusive.
#[must_use]
pub fn upcoming_event(events: &[WasteEvent], today: NaiveDate) -> Option<UpcomingEvent> {
    events
        .iter()
        .filter_map(|event| {
            let date = event.start_date?;
            let days_until = (date - today).num_days();
            (0..=EVENT_HORIZON_DAYS)
                .contains(&days_until)
                .then(|| UpcomingEvent {
                    title: event.title.clone(),
                    date,
                    days_until,
                })
        })
        .min_by_key(|event| event.date)
}
