//! Turns the waste service's collection data into next-collection dates per stream.
//!
//! Two inputs are supported: an explicit listing of free-text stream names with dates, or a
//! single collection weekday. In the weekday case organics are collected every week and
//! recycling/landfill alternate fortnightly on the same weekday, with recycling on even ISO weeks.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

use crate::model::{RawCollection, Schedule, ScheduleSource, Stream};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Reasons a schedule cannot be resolved.
pub enum ResolveError {
    /// Neither a collection listing nor a collection weekday was available.
    #[error("Schedule unavailable: no collections and no collection day")]
    ScheduleUnavailable,
    /// The collection weekday is not in 1..=7.
    #[error("Invalid collection day: {0}")]
    InvalidWeekday(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Output of [`resolve`].
pub struct Resolution {
    /// Resolved dates.
    pub schedule: Schedule,
    /// Which input produced the dates.
    pub source: ScheduleSource,
    /// Listed entries that were dropped: unknown stream name or unusable date.
    pub discarded: usize,
}

/// Resolve the next collection date of every stream.
///
/// A non-empty listing is authoritative: streams missing from it stay unresolved, even when
/// every entry was discarded. The weekday is only expanded when the listing is empty.
///
/// # Errors
///
/// Returns [`ResolveError::ScheduleUnavailable`] when there is neither a listing nor a weekday
/// and [`ResolveError::InvalidWeekday`] for a weekday outside 1..=7.
pub fn resolve(
    collections: &[RawCollection],
    fallback_weekday: Option<i64>,
    today: NaiveDate,
) -> Result<Resolution, ResolveError> {
    if !collections.is_empty() {
        let (schedule, discarded) = resolve_listing(collections);
        if discarded > 0 {
            warn!(discarded, listed = collections.len(), "discarded unusable collection entries");
        }
        return Ok(Resolution {
            schedule,
            source: ScheduleSource::Explicit,
            discarded,
        });
    }

    let weekday = fallback_weekday.ok_or(ResolveError::ScheduleUnavailable)?;
    let schedule = derive_from_weekday(weekday, today)?;
    debug!(weekday, %today, "derived schedule from collection day");
    Ok(Resolution {
        schedule,
        source: ScheduleSource::Derived,
        discarded: 0,
    })
}

/// Map a free-text stream name onto a [`Stream`].
#[must_use]
pub fn classify_stream(name: &str) -> Option<Stream> {
    let lowered = name.to_lowercase();
    if lowered.contains("fogo") || lowered.contains("organic") {
        Some(Stream::Organic)
    } else if lowered.contains("recycling") {
        Some(Stream::Recycling)
    } else if ["landfill", "garbage", "waste"]
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        Some(Stream::Landfill)
    } else {
        None
    }
}

/// Parse the date part of a collection timestamp.
///
/// RFC 3339 timestamps keep the calendar date of their own offset, so
/// `2026-03-04T06:00:00+11:00` is the 4th regardless of the local timezone.
#[must_use]
pub fn parse_collection_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.date_naive())
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S")
                .map(|timestamp| timestamp.date())
                .ok()
        })
        .or_else(|| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok())
}

/// Expand a collection weekday (Monday = 1) into dates for all three streams.
///
/// # Errors
///
/// Returns [`ResolveError::InvalidWeekday`] for values outside 1..=7.
pub fn derive_from_weekday(weekday: i64, today: NaiveDate) -> Result<Schedule, ResolveError> {
    if !(1..=7).contains(&weekday) {
        return Err(ResolveError::InvalidWeekday(weekday));
    }

    let today_number = i64::from(today.weekday().number_from_monday());
    let days_ahead = (weekday - today_number).rem_euclid(7);
    let next_collection = today + Duration::days(days_ahead);
    let following = next_collection + Duration::days(7);

    let is_recycling_week = next_collection.iso_week().week() % 2 == 0;
    let (recycling, landfill) = if is_recycling_week {
        (next_collection, following)
    } else {
        (following, next_collection)
    };

    let mut schedule = Schedule::default();
    schedule.insert(Stream::Organic, next_collection);
    schedule.insert(Stream::Recycling, recycling);
    schedule.insert(Stream::Landfill, landfill);
    Ok(schedule)
}

/// Whole days from `today` until `date`.
///
/// Resolved dates are never in the past, so a negative result points at stale data or clock
/// skew; it is logged and returned as is.
#[must_use]
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    let days = (date - today).num_days();
    if days < 0 {
        warn!(%date, %today, days, "collection date lies in the past");
    }
    days
}

fn resolve_listing(collections: &[RawCollection]) -> (Schedule, usize) {
    let mut schedule = Schedule::default();
    let mut dropped = 0;

    for collection in collections {
        let Some(stream) = classify_stream(&collection.kind) else {
            debug!(kind = %collection.kind, "ignoring unknown collection type");
            dropped += 1;
            continue;
        };
        let Some(date) = collection
            .next_date
            .as_deref()
            .and_then(parse_collection_date)
        else {
            debug!(kind = %collection.kind, "ignoring collection without a usable date");
            dropped += 1;
            continue;
        };
        schedule.insert(stream, date);
    }

    (schedule, dropped)
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn resolved(schedule: &Schedule, stream: Stream) -> NaiveDate {
        schedule.get(stream).expect("stream resolved")
    }

    #[test]
    fn classifies_stream_names_case_insensitively() {
        assert_eq!(classify_stream("FOGO"), Some(Stream::Organic));
        assert_eq!(classify_stream("Garden Organics"), Some(Stream::Organic));
        assert_eq!(classify_stream("Recycling"), Some(Stream::Recycling));
        assert_eq!(classify_stream("Landfill Waste"), Some(Stream::Landfill));
        assert_eq!(classify_stream("GARBAGE"), Some(Stream::Landfill));
        assert_eq!(classify_stream("Organic waste"), Some(Stream::Organic));
        assert_eq!(classify_stream("Hard rubbish"), None);
    }

    #[test]
    fn parses_supported_date_formats() {
        assert_eq!(parse_collection_date("2026-03-04"), Some(date(2026, 3, 4)));
        assert_eq!(
            parse_collection_date("2026-03-04T06:00:00+11:00"),
            Some(date(2026, 3, 4))
        );
        assert_eq!(
            parse_collection_date("2026-03-04T06:00:00"),
            Some(date(2026, 3, 4))
        );
        assert_eq!(parse_collection_date("next week"), None);
    }

    #[test]
    fn organic_date_always_falls_on_collection_weekday() {
        let start = date(2026, 1, 1);
        for offset in 0..21 {
            let today = start + Duration::days(offset);
            for weekday in 1..=7 {
                let schedule = derive_from_weekday(weekday, today).expect("valid weekday");
                let organic = resolved(&schedule, Stream::Organic);
                assert_eq!(
                    i64::from(organic.weekday().number_from_monday()),
                    weekday,
                    "organic date {organic} for weekday {weekday} from {today}"
                );
                assert!(organic >= today, "organic date must not be in the past");
                assert!((organic - today).num_days() < 7, "next occurrence within a week");
            }
        }
    }

    #[test]
    fn recycling_and_landfill_are_a_week_apart() {
        let start = date(2025, 12, 20);
        for offset in 0..30 {
            let today = start + Duration::days(offset);
            for weekday in 1..=7 {
                let schedule = derive_from_weekday(weekday, today).expect("valid weekday");
                let recycling = resolved(&schedule, Stream::Recycling);
                let landfill = resolved(&schedule, Stream::Landfill);
                assert_ne!(recycling, landfill);
                assert_eq!((recycling - landfill).num_days().abs(), 7);
            }
        }
    }

    #[test]
    fn recycling_and_landfill_swap_each_week() {
        let today = date(2026, 3, 2);
        let this_week = derive_from_weekday(5, today).expect("valid weekday");
        let next_week = derive_from_weekday(5, today + Duration::days(7)).expect("valid weekday");

        let this_organic = resolved(&this_week, Stream::Organic);
        let next_organic = resolved(&next_week, Stream::Organic);
        let this_recycles = resolved(&this_week, Stream::Recycling) == this_organic;
        let next_recycles = resolved(&next_week, Stream::Recycling) == next_organic;
        assert_ne!(this_recycles, next_recycles);
    }

    #[test]
    fn collection_day_today_counts_as_zero_days_ahead() {
        let today = date(2026, 3, 4);
        assert_eq!(today.weekday(), Weekday::Wed);

        let schedule = derive_from_weekday(3, today).expect("valid weekday");
        assert_eq!(resolved(&schedule, Stream::Organic), today);
    }

    #[test]
    fn wednesday_collection_in_even_week_recycles_first() {
        // Monday of ISO week 10.
        let today = date(2026, 3, 2);
        assert_eq!(today.iso_week().week(), 10);

        let resolution = resolve(&[], Some(3), today).expect("resolves");
        let schedule = &resolution.schedule;
        assert_eq!(resolution.source, ScheduleSource::Derived);
        assert_eq!(resolved(schedule, Stream::Organic), date(2026, 3, 4));
        assert_eq!(resolved(schedule, Stream::Recycling), date(2026, 3, 4));
        assert_eq!(resolved(schedule, Stream::Landfill), date(2026, 3, 11));
    }

    #[test]
    fn odd_week_puts_landfill_first() {
        // Monday of ISO week 11.
        let today = date(2026, 3, 9);
        let schedule = derive_from_weekday(3, today).expect("valid weekday");
        assert_eq!(resolved(&schedule, Stream::Landfill), date(2026, 3, 11));
        assert_eq!(resolved(&schedule, Stream::Recycling), date(2026, 3, 18));
    }

    #[test]
    fn partial_listing_does_not_invent_streams() {
        let collections = vec![
            RawCollection::new("Landfill Waste", Some("2026-03-04")),
            RawCollection::new("FOGO", Some("2026-03-02")),
        ];

        let resolution = resolve(&collections, Some(3), date(2026, 3, 1)).expect("resolves");
        let schedule = &resolution.schedule;
        assert_eq!(resolution.source, ScheduleSource::Explicit);
        assert_eq!(schedule.get(Stream::Organic), Some(date(2026, 3, 2)));
        assert_eq!(schedule.get(Stream::Landfill), Some(date(2026, 3, 4)));
        assert_eq!(schedule.get(Stream::Recycling), None);
    }

    #[test]
    fn duplicate_streams_keep_last_entry() {
        let collections = vec![
            RawCollection::new("Recycling", Some("2026-03-04")),
            RawCollection::new("recycling bin", Some("2026-03-11")),
        ];

        let resolution = resolve(&collections, None, date(2026, 3, 1)).expect("resolves");
        assert_eq!(
            resolution.schedule.get(Stream::Recycling),
            Some(date(2026, 3, 11))
        );
    }

    #[test]
    fn unknown_names_and_missing_dates_are_counted() {
        let collections = vec![
            RawCollection::new("Hard rubbish", Some("2026-03-05")),
            RawCollection::new("Recycling", None::<String>),
            RawCollection::new("FOGO", Some("2026-03-02")),
        ];

        let resolution = resolve(&collections, None, date(2026, 3, 1)).expect("resolves");
        assert_eq!(resolution.discarded, 2);
        assert_eq!(resolution.schedule.len(), 1);
    }

    #[test]
    fn unusable_listing_ignores_collection_day() {
        let collections = vec![RawCollection::new("Hard rubbish", Some("2026-03-05"))];

        let resolution = resolve(&collections, Some(3), date(2026, 3, 2)).expect("resolves");
        assert_eq!(resolution.source, ScheduleSource::Explicit);
        assert_eq!(resolution.discarded, 1);
        assert!(resolution.schedule.is_empty());
    }

    #[test]
    fn no_listing_and_no_weekday_is_unavailable() {
        assert_eq!(
            resolve(&[], None, date(2026, 3, 2)),
            Err(ResolveError::ScheduleUnavailable)
        );
    }

    #[test]
    fn rejects_out_of_range_weekday() {
        assert_eq!(
            resolve(&[], Some(0), date(2026, 3, 2)),
            Err(ResolveError::InvalidWeekday(0))
        );
        assert_eq!(
            resolve(&[], Some(8), date(2026, 3, 2)),
            Err(ResolveError::InvalidWeekday(8))
        );
    }

    #[test]
    fn days_until_is_signed_whole_days() {
        let today = date(2026, 3, 2);
        assert_eq!(days_until(date(2026, 3, 2), today), 0);
        assert_eq!(days_until(date(2026, 3, 4), today), 2);
        assert_eq!(days_until(date(2026, 2, 28), today), -2);
    }
}
