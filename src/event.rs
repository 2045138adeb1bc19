//! The shareable event

use crate::error::EncodeError;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// An event that can be shared through a link.
///
/// The instant is stored as whole milliseconds since the Unix epoch. That
/// precision is part of the token format: a token always carries the exact
/// millisecond value and decoding never rescales it.
///
/// Fields are private, so a decoded event cannot be changed afterwards.
/// The serialized form uses the compact keys `n`, `d` and `otz`.
///
/// # Example
///
/// ```
/// use gpui_eventlink::EventDetails;
///
/// let event = EventDetails::new("Launch", 1_735_689_600_000, "UTC");
/// assert_eq!(event.name(), "Launch");
/// assert!(event.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventDetails {
    #[serde(rename = "n")]
    name: String,
    #[serde(rename = "d")]
    instant: i64,
    #[serde(rename = "otz")]
    origin_timezone: String,
}

impl EventDetails {
    /// Create an event from its three parts.
    ///
    /// No validation happens here; [`encode`](crate::encode) rejects events
    /// that fail [`validate`](Self::validate).
    pub fn new(name: impl Into<String>, instant: i64, origin_timezone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instant,
            origin_timezone: origin_timezone.into(),
        }
    }

    /// Create an event from a UTC date-time, truncated to milliseconds.
    pub fn at(
        name: impl Into<String>,
        when: DateTime<Utc>,
        origin_timezone: impl Into<String>,
    ) -> Self {
        Self::new(name, when.timestamp_millis(), origin_timezone)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Milliseconds since the Unix epoch.
    pub fn instant(&self) -> i64 {
        self.instant
    }

    /// IANA identifier of the zone the event was created in.
    pub fn origin_timezone(&self) -> &str {
        &self.origin_timezone
    }

    /// The instant as a UTC date-time, if it is inside chrono's range.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.instant)
    }

    /// Parse the origin timezone. Unknown identifiers yield `None`.
    pub fn origin_tz(&self) -> Option<Tz> {
        self.origin_timezone.parse().ok()
    }

    /// Check the invariants every encodable event must hold. Any non-empty
    /// name and zone is accepted, whitespace included.
    pub fn validate(&self) -> Result<(), EncodeError> {
        if self.name.is_empty() {
            return Err(EncodeError::EmptyName);
        }
        if self.origin_timezone.is_empty() {
            return Err(EncodeError::EmptyTimezone);
        }
        if self.datetime().is_none() {
            return Err(EncodeError::InstantOutOfRange(self.instant));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_accessors() {
        let event = EventDetails::new("Launch", 1_735_689_600_000, "Europe/Berlin");
        assert_eq!(event.name(), "Launch");
        assert_eq!(event.instant(), 1_735_689_600_000);
        assert_eq!(event.origin_timezone(), "Europe/Berlin");
        assert_eq!(event.origin_tz(), Some(chrono_tz::Europe::Berlin));
    }

    #[test]
    fn test_at_truncates_to_millis() {
        let when = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::microseconds(1_500);
        let event = EventDetails::at("Launch", when, "UTC");
        assert_eq!(event.instant(), 1_735_689_600_001);
    }

    #[test]
    fn test_validate() {
        assert!(EventDetails::new("Launch", 0, "UTC").validate().is_ok());
        assert!(EventDetails::new("  ", 0, " ").validate().is_ok());
        assert_eq!(
            EventDetails::new("", 0, "UTC").validate(),
            Err(EncodeError::EmptyName)
        );
        assert_eq!(
            EventDetails::new("Launch", 0, "").validate(),
            Err(EncodeError::EmptyTimezone)
        );
        assert_eq!(
            EventDetails::new("Launch", i64::MAX, "UTC").validate(),
            Err(EncodeError::InstantOutOfRange(i64::MAX))
        );
    }

    #[test]
    fn test_unknown_zone_is_opaque() {
        let event = EventDetails::new("Launch", 0, "Mars/Olympus_Mons");
        assert!(event.validate().is_ok());
        assert!(event.origin_tz().is_none());
    }

    #[test]
    fn test_compact_wire_keys() {
        let event = EventDetails::new("Launch", 1_735_689_600_000, "UTC");
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"n":"Launch","d":1735689600000,"otz":"UTC"}"#);
    }
}
