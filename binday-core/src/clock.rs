//! Source of "now" and "today" for the session.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};

/// Current instant and local calendar date.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Today's date in the local timezone.
    fn today(&self) -> NaiveDate;
}

/// Wall clock in the machine's local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock frozen at a given instant and date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    /// Instant returned by [`Clock::now`].
    pub now: DateTime<Utc>,
    /// Date returned by [`Clock::today`].
    pub today: NaiveDate,
}

impl FixedClock {
    /// Clock at midnight UTC on `today`.
    #[must_use]
    pub fn on(today: NaiveDate) -> Self {
        Self {
            now: today.and_time(NaiveTime::default()).and_utc(),
            today,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
