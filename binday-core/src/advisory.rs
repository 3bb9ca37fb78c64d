//! Weather advisories for the next collection day.

use std::fmt;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::model::{ForecastDay, Schedule};
use crate::ports::{PortError, WeatherPort};

/// Wind speed (km/h) from which bins are at risk of blowing over.
pub const WIND_ADVISORY_KMH: f64 = 40.0;
/// Wind speed (km/h) from which the wind advisory is a warning.
pub const WIND_WARNING_KMH: f64 = 50.0;
/// Rain total (mm) from which a rain advisory is raised.
pub const RAIN_ADVISORY_MM: f64 = 5.0;
/// Furthest day offset the forecast service is asked about.
pub const FORECAST_HORIZON_DAYS: u32 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Which condition an advisory is about.
pub enum AdvisoryKind {
    /// Strong wind.
    Wind,
    /// Significant rain.
    Rain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
/// How prominently an advisory should be shown.
pub enum Severity {
    /// Worth knowing.
    Info,
    /// Act on it.
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// A classified forecast condition for a collection day.
pub struct Advisory {
    /// Condition.
    pub kind: AdvisoryKind,
    /// Display emphasis.
    pub severity: Severity,
    /// Wind speed in km/h or rain in mm.
    pub magnitude: f64,
    /// Collection day the forecast is for.
    pub date: NaiveDate,
}

impl fmt::Display for Advisory {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.magnitude.trunc();
        match self.kind {
            AdvisoryKind::Wind => {
                write!(formatter, "Windy ({magnitude:.0} km/h) - secure your bins!")
            }
            AdvisoryKind::Rain => write!(
                formatter,
                "Rain expected ({magnitude:.0}mm) - good for weighing down FOGO"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The single forecast day worth requesting for a schedule.
pub struct ForecastWindow {
    /// Earliest collection date.
    pub target: NaiveDate,
    /// Days from today until `target`, within the forecast horizon.
    pub days_ahead: u32,
}

impl ForecastWindow {
    /// Window for the earliest collection, `None` when it lies outside `0..=7` days from today.
    #[must_use]
    pub fn for_schedule(schedule: &Schedule, today: NaiveDate) -> Option<Self> {
        let target = schedule.earliest()?;
        let days_ahead = u32::try_from((target - today).num_days()).ok()?;
        (days_ahead <= FORECAST_HORIZON_DAYS).then_some(Self { target, days_ahead })
    }

    /// Number of forecast days to request so the target is the last one.
    #[must_use]
    pub fn forecast_days(&self) -> u32 {
        self.days_ahead + 1
    }

    /// Index of the target day in the forecast arrays.
    #[must_use]
    pub fn offset(&self) -> usize {
        usize::try_from(self.days_ahead).unwrap_or(usize::MAX)
    }
}

/// Classify one forecast day. Both advisories may fire; none is the normal case.
#[must_use]
pub fn classify(day: &ForecastDay, date: NaiveDate) -> Vec<Advisory> {
    let mut advisories = Vec::new();

    if let Some(wind) = day.wind_kmh.filter(|wind| *wind >= WIND_ADVISORY_KMH) {
        let severity = if wind >= WIND_WARNING_KMH {
            Severity::Warning
        } else {
            Severity::Info
        };
        advisories.push(Advisory {
            kind: AdvisoryKind::Wind,
            severity,
            magnitude: wind,
            date,
        });
    }

    if let Some(rain) = day.rain_mm.filter(|rain| *rain >= RAIN_ADVISORY_MM) {
        advisories.push(Advisory {
            kind: AdvisoryKind::Rain,
            severity: Severity::Info,
            magnitude: rain,
            date,
        });
    }

    advisories
}

/// Run the weather step for a schedule.
///
/// Failures never propagate: a failed or malformed forecast simply yields no advisories.
pub async fn fetch_advisories(
    weather: &dyn WeatherPort,
    schedule: &Schedule,
    today: NaiveDate,
) -> Vec<Advisory> {
    let Some(window) = ForecastWindow::for_schedule(schedule, today) else {
        debug!("next collection outside forecast horizon, skipping weather");
        return Vec::new();
    };

    let forecast_day = weather
        .daily_forecast(window.forecast_days())
        .await
        .and_then(|forecast| {
            forecast.day(window.offset()).ok_or_else(|| {
                PortError::InvalidResponse(format!(
                    "forecast has no entry for day {}",
                    window.days_ahead
                ))
            })
        });

    match forecast_day {
        Ok(day) => {
            let advisories = classify(&day, window.target);
            debug!(
                target = %window.target,
                count = advisories.len(),
                "classified collection day forecast"
            );
            advisories
        }
        Err(err) => {
            warn!(error = %err, "weather lookup failed, showing no advisories");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DailyForecast, Stream};
    use crate::test_support::FakeWeather;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn reading(wind: f64, rain: f64) -> ForecastDay {
        ForecastDay {
            wind_kmh: Some(wind),
            rain_mm: Some(rain),
        }
    }

    fn kinds(advisories: &[Advisory]) -> Vec<AdvisoryKind> {
        advisories.iter().map(|advisory| advisory.kind).collect()
    }

    fn schedule_on(target: NaiveDate) -> Schedule {
        let mut schedule = Schedule::default();
        schedule.insert(Stream::Organic, target);
        schedule.insert(Stream::Landfill, target + chrono::Duration::days(7));
        schedule
    }

    #[test]
    fn wind_threshold_is_inclusive() {
        let day = date(2026, 3, 4);
        assert!(classify(&reading(39.9, 0.0), day).is_empty());
        assert_eq!(
            kinds(&classify(&reading(40.0, 0.0), day)),
            vec![AdvisoryKind::Wind]
        );
    }

    #[test]
    fn rain_threshold_is_inclusive() {
        let day = date(2026, 3, 4);
        assert!(classify(&reading(0.0, 4.9), day).is_empty());
        assert_eq!(
            kinds(&classify(&reading(0.0, 5.0), day)),
            vec![AdvisoryKind::Rain]
        );
    }

    #[test]
    fn wind_and_rain_can_fire_together() {
        let advisories = classify(&reading(55.0, 12.0), date(2026, 3, 4));
        assert_eq!(
            kinds(&advisories),
            vec![AdvisoryKind::Wind, AdvisoryKind::Rain]
        );
        assert_eq!(
            advisories.first().map(|advisory| advisory.severity),
            Some(Severity::Warning)
        );
    }

    #[test]
    fn moderate_wind_is_informational() {
        let advisories = classify(&reading(45.0, 0.0), date(2026, 3, 4));
        assert_eq!(
            advisories.first().map(|advisory| advisory.severity),
            Some(Severity::Info)
        );
    }

    #[test]
    fn missing_readings_raise_nothing() {
        let day = ForecastDay::default();
        assert!(classify(&day, date(2026, 3, 4)).is_empty());
    }

    #[test]
    fn advisory_messages_truncate_magnitude() {
        let advisories = classify(&reading(47.8, 6.9), date(2026, 3, 4));
        let messages: Vec<String> = advisories.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Windy (47 km/h) - secure your bins!".to_owned(),
                "Rain expected (6mm) - good for weighing down FOGO".to_owned(),
            ]
        );
    }

    #[test]
    fn window_covers_today_through_a_week() {
        let today = date(2026, 3, 2);
        for days in 0..=7 {
            let window = ForecastWindow::for_schedule(
                &schedule_on(today + chrono::Duration::days(days)),
                today,
            )
            .expect("inside horizon");
            assert_eq!(i64::from(window.days_ahead), days);
            assert_eq!(window.forecast_days(), window.days_ahead + 1);
        }

        let past = schedule_on(today - chrono::Duration::days(1));
        assert_eq!(ForecastWindow::for_schedule(&past, today), None);
        let far = schedule_on(today + chrono::Duration::days(8));
        assert_eq!(ForecastWindow::for_schedule(&far, today), None);
        assert_eq!(ForecastWindow::for_schedule(&Schedule::default(), today), None);
    }

    #[tokio::test]
    async fn reads_target_day_from_last_forecast_entry() {
        let today = date(2026, 3, 2);
        let weather = FakeWeather::returning(DailyForecast {
            wind_speed_max: vec![Some(80.0), Some(10.0), Some(42.0)],
            precipitation_sum: vec![Some(30.0), Some(0.0), Some(1.0)],
        });

        let advisories = fetch_advisories(&weather, &schedule_on(date(2026, 3, 4)), today).await;

        assert_eq!(weather.requested(), vec![3]);
        assert_eq!(kinds(&advisories), vec![AdvisoryKind::Wind]);
        assert_eq!(
            advisories.first().map(|advisory| advisory.date),
            Some(date(2026, 3, 4))
        );
    }

    #[tokio::test]
    async fn skips_request_outside_horizon() {
        let today = date(2026, 3, 2);
        let weather = FakeWeather::returning(DailyForecast::default());

        let advisories =
            fetch_advisories(&weather, &schedule_on(date(2026, 3, 12)), today).await;

        assert!(advisories.is_empty());
        assert!(weather.requested().is_empty());
    }

    #[tokio::test]
    async fn swallows_forecast_failures() {
        let today = date(2026, 3, 2);
        let failing = FakeWeather::offline();
        assert!(
            fetch_advisories(&failing, &schedule_on(today), today)
                .await
                .is_empty()
        );

        let short = FakeWeather::returning(DailyForecast {
            wind_speed_max: vec![Some(90.0)],
            precipitation_sum: vec![],
        });
        assert!(
            fetch_advisories(&short, &schedule_on(today), today)
                .await
                .is_empty()
        );
    }
}
