use chrono::{serde::ts_milliseconds, DateTime, Utc};
use geo_types::Point;
use serde::{Deserialize, Serialize};

/// One GPS observation. `position` is x = longitude, y = latitude, in degrees.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocationFix {
    pub position: Point,
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Device-reported instantaneous speed. Informational only, the engine
    /// derives its own pace from position deltas.
    pub speed: f64,
    /// Device-reported horizontal uncertainty radius in meters.
    pub accuracy: f64,
    /// Distance from the previously accepted fix. 0 for the first fix.
    #[serde(default)]
    pub distance_from_previous_meters: f64,
    /// Distance to the next accepted fix, patched in retroactively when
    /// that fix is accepted. 0 for the most recent fix until then.
    #[serde(default)]
    pub distance_to_next_meters: f64,
}

impl LocationFix {
    pub fn new(position: Point, timestamp: DateTime<Utc>, speed: f64, accuracy: f64) -> Self {
        Self {
            position,
            timestamp,
            speed,
            accuracy,
            distance_from_previous_meters: 0.0,
            distance_to_next_meters: 0.0,
        }
    }
}
