//! Clock event payloads.

use chrono::{DateTime, Duration as TimeDelta, FixedOffset, Local, SecondsFormat};
use tokio::time::Instant;

const PAYLOAD_PREFIX: &str = "Current time is ";

/// One clock tick, carried as the `data` of a server-sent event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockEvent {
    at: DateTime<FixedOffset>,
}

impl ClockEvent {
    pub fn at(at: DateTime<FixedOffset>) -> Self {
        Self { at }
    }

    /// RFC 3339 timestamp with whole seconds, `Z` for UTC.
    pub fn timestamp(&self) -> String {
        self.at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Event data: `Current time is <timestamp>`.
    pub fn payload(&self) -> String {
        format!("{PAYLOAD_PREFIX}{}", self.timestamp())
    }
}

/// Maps timer instants onto local wall-clock time.
///
/// Anchored once per session, so each event carries the time its tick
/// fired rather than the time it was written.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    origin: Instant,
    wall: DateTime<FixedOffset>,
}

impl TickClock {
    pub fn start() -> Self {
        Self::anchored(Instant::now(), Local::now().fixed_offset())
    }

    pub fn anchored(origin: Instant, wall: DateTime<FixedOffset>) -> Self {
        Self { origin, wall }
    }

    /// The event for a tick that fired at `tick`.
    pub fn stamp(&self, tick: Instant) -> ClockEvent {
        let since = tick.saturating_duration_since(self.origin);
        let at = TimeDelta::from_std(since)
            .ok()
            .and_then(|delta| self.wall.checked_add_signed(delta))
            .unwrap_or(self.wall);
        ClockEvent::at(at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    #[test]
    fn test_payload_with_offset() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let at = tz.with_ymd_and_hms(2024, 5, 1, 12, 30, 15).unwrap();

        assert_eq!(
            ClockEvent::at(at).payload(),
            "Current time is 2024-05-01T12:30:15+09:00"
        );
    }

    #[test]
    fn test_utc_uses_z_suffix() {
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap().fixed_offset();
        assert_eq!(ClockEvent::at(at).timestamp(), "2024-01-02T03:04:05Z");
    }

    #[test]
    fn test_stamp_follows_tick_instant() {
        let wall = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap().fixed_offset();
        let origin = Instant::now();
        let clock = TickClock::anchored(origin, wall);

        let event = clock.stamp(origin + Duration::from_millis(2500));
        assert_eq!(event.timestamp(), "2024-01-02T03:04:07Z");
    }

    #[test]
    fn test_tick_before_origin_uses_anchor() {
        let wall = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap().fixed_offset();
        let origin = Instant::now() + Duration::from_secs(10);
        let clock = TickClock::anchored(origin, wall);

        assert_eq!(clock.stamp(Instant::now()).timestamp(), "2024-01-02T03:04:05Z");
    }

    #[test]
    fn test_started_clock_is_valid_rfc3339() {
        let payload = TickClock::start().stamp(Instant::now()).payload();
        let stamp = payload.strip_prefix("Current time is ").expect("payload shape");

        assert!(DateTime::parse_from_rfc3339(stamp).is_ok());
        assert!(!stamp.contains('.'), "no fractional seconds: {stamp}");
    }
}
