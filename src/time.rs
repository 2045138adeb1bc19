//! Presenting an event's instant
//!
//! Helpers for the event view: where the instant sits relative to now, and
//! how it reads in the zone the event was created in.

use crate::event::EventDetails;
use crate::warn_log;
use chrono::{DateTime, Datelike, Months, TimeZone, Utc};
use chrono_tz::Tz;

/// Long date-time with seconds, e.g. `Wednesday, January 1, 2025 at 12:00:00 AM UTC`.
const LONG_FORMAT: &str = "%A, %B %-d, %Y at %-I:%M:%S %p %Z";

/// Minute precision with a two-digit hour, e.g. `Wednesday, January 1, 2025 at 09:30 AM EST`.
const SCHEDULED_FORMAT: &str = "%A, %B %-d, %Y at %I:%M %p %Z";

/// Whether the event is strictly after `now`.
pub fn is_in_future(event: &EventDetails, now: DateTime<Utc>) -> bool {
    event.instant() > now.timestamp_millis()
}

/// Time between now and an event, split into calendar-free units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    /// The event lies before `now`
    pub past: bool,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Countdown {
    /// Split the distance between `now` and `target`. Sub-second parts are
    /// dropped.
    pub fn between(now: DateTime<Utc>, target: DateTime<Utc>) -> Self {
        let delta = target.signed_duration_since(now);
        let total = delta.num_seconds().abs();

        Self {
            past: delta.num_milliseconds() < 0,
            days: total / 86_400,
            hours: total % 86_400 / 3_600,
            minutes: total % 3_600 / 60,
            seconds: total % 60,
        }
    }

    /// Countdown to `event`, or `None` if its instant is outside chrono's range.
    pub fn until(event: &EventDetails, now: DateTime<Utc>) -> Option<Self> {
        event.datetime().map(|target| Self::between(now, target))
    }

    /// `"{h}h {m}m {s}s"`. Whole days are left to the caller.
    pub fn short(&self) -> String {
        format!("{}h {}m {}s", self.hours, self.minutes, self.seconds)
    }
}

/// Calendar distance between two instants in whole years, months and days,
/// e.g. `1 year, 2 months, 3 days`. Order does not matter. Zero units are
/// left out, so spans shorter than a day give an empty string.
pub fn date_difference(now: DateTime<Utc>, target: DateTime<Utc>) -> String {
    let (start, end) = if target > now {
        (now, target)
    } else {
        (target, now)
    };

    // Month arithmetic clamps to the end of shorter months.
    let mut months = ((end.year() - start.year()) * 12 + end.month() as i32
        - start.month() as i32)
        .max(0) as u32;
    let mut anchor = start.checked_add_months(Months::new(months));
    while months > 0 && anchor.map_or(true, |anchor| anchor > end) {
        months -= 1;
        anchor = start.checked_add_months(Months::new(months));
    }
    let Some(anchor) = anchor else {
        return String::new();
    };

    let days = end.signed_duration_since(anchor).num_days();
    [
        (i64::from(months / 12), "year"),
        (i64::from(months % 12), "month"),
        (days, "day"),
    ]
    .into_iter()
    .filter(|(count, _)| *count != 0)
    .map(|(count, unit)| match count {
        1 => format!("1 {unit}"),
        n => format!("{n} {unit}s"),
    })
    .collect::<Vec<_>>()
    .join(", ")
}

/// Parse an IANA zone id, falling back to UTC.
pub fn zone_or_utc(zone: &str) -> Tz {
    zone.parse().unwrap_or_else(|_| {
        warn_log!("Unknown timezone '{}', showing UTC instead", zone);
        Tz::UTC
    })
}

/// Long form of `instant` in `zone`.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use gpui_eventlink::time::format_in_zone;
///
/// let when = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(
///     format_in_zone(when, "UTC"),
///     "Wednesday, January 1, 2025 at 12:00:00 AM UTC"
/// );
/// ```
pub fn format_in_zone(instant: DateTime<Utc>, zone: &str) -> String {
    zone_or_utc(zone)
        .from_utc_datetime(&instant.naive_utc())
        .format(LONG_FORMAT)
        .to_string()
}

/// Minute-precision form of `instant` in `zone`, as shown in page metadata.
pub fn format_scheduled(instant: DateTime<Utc>, zone: &str) -> String {
    zone_or_utc(zone)
        .from_utc_datetime(&instant.naive_utc())
        .format(SCHEDULED_FORMAT)
        .to_string()
}

/// Human-readable zone name: `America/New_York` becomes `America/New York`.
pub fn zone_label(zone: &str) -> String {
    zone.replace('_', " ")
}
