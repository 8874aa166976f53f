use chrono::{DateTime, Utc};
use geo_types::Point;
use run_tracker_lib::location_fix::LocationFix;
use serde::Deserialize;

/// Fixes with a worse device accuracy than this never reach the track
/// engine. The engine's own accuracy*2 motion test sits on top of this
/// coarse admission filter, it does not replace it.
pub const MAX_ACCURACY_METERS: f64 = 20.0;

/// One fix as the location source reports it.
#[derive(Deserialize)]
pub struct RawFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Epoch milliseconds.
    pub timestamp: i64,
    #[serde(default)]
    pub speed: f64,
    pub accuracy: f64,
}

/// Parses one stdin line into an admitted fix. Anything unusable is logged
/// and dropped; the feed keeps going.
pub fn parse_fix_line(line: &str) -> Option<LocationFix> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let raw: RawFix = match serde_json::from_str(line) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!("Dropping unparseable fix line: {}", err);
            return None;
        }
    };

    let Some(timestamp) = DateTime::<Utc>::from_timestamp_millis(raw.timestamp) else {
        tracing::warn!("Dropping fix with out-of-range timestamp {}", raw.timestamp);
        return None;
    };

    let position = Point::new(raw.longitude, raw.latitude);
    admit(LocationFix::new(position, timestamp, raw.speed, raw.accuracy))
}

/// The coarse admission filter the source contract requires upstream of
/// the engine.
pub fn admit(fix: LocationFix) -> Option<LocationFix> {
    if !fix.position.x().is_finite() || !fix.position.y().is_finite() {
        tracing::debug!("Dropping fix with non-finite coordinates");
        return None;
    }

    if !fix.accuracy.is_finite() || fix.accuracy < 0.0 || fix.accuracy > MAX_ACCURACY_METERS {
        tracing::debug!("Dropping fix with accuracy {} m", fix.accuracy);
        return None;
    }

    Some(fix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix_with_accuracy(accuracy: f64) -> LocationFix {
        LocationFix::new(Point::new(12.0, 55.0), Utc::now(), 0.0, accuracy)
    }

    #[test]
    fn accuracy_at_the_limit_is_admitted() {
        assert!(admit(fix_with_accuracy(20.0)).is_some());
    }

    #[test]
    fn accuracy_past_the_limit_is_dropped() {
        assert!(admit(fix_with_accuracy(20.1)).is_none());
    }

    #[test]
    fn bad_accuracy_values_are_dropped() {
        assert!(admit(fix_with_accuracy(f64::NAN)).is_none());
        assert!(admit(fix_with_accuracy(-1.0)).is_none());
        assert!(admit(fix_with_accuracy(f64::INFINITY)).is_none());
    }

    #[test]
    fn non_finite_coordinates_are_dropped() {
        let fix = LocationFix::new(Point::new(f64::NAN, 55.0), Utc::now(), 0.0, 5.0);
        assert!(admit(fix).is_none());
    }

    #[test]
    fn valid_line_parses() {
        let line = r#"{"latitude":55.0,"longitude":12.0,"timestamp":1717236000000,"speed":2.5,"accuracy":4.0}"#;
        let fix = parse_fix_line(line).unwrap();
        assert_eq!(fix.position.y(), 55.0);
        assert_eq!(fix.position.x(), 12.0);
        assert_eq!(fix.timestamp.timestamp_millis(), 1_717_236_000_000);
        assert_eq!(fix.speed, 2.5);
        assert_eq!(fix.accuracy, 4.0);
    }

    #[test]
    fn speed_is_optional_on_the_wire() {
        let line = r#"{"latitude":55.0,"longitude":12.0,"timestamp":1717236000000,"accuracy":4.0}"#;
        let fix = parse_fix_line(line).unwrap();
        assert_eq!(fix.speed, 0.0);
    }

    #[test]
    fn garbage_lines_are_dropped() {
        assert!(parse_fix_line("").is_none());
        assert!(parse_fix_line("not json").is_none());
        assert!(parse_fix_line(r#"{"latitude":55.0}"#).is_none());
    }
}
