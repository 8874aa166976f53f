use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::track::Track;

/// The minimal persisted session state. The fix history is deliberately not
/// part of the snapshot: a resumed session reports correct distance and
/// duration, and pace reads 0 until new fixes accumulate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackSnapshot {
    pub distance_meters: f64,
    #[serde(with = "ts_milliseconds")]
    pub start_time: DateTime<Utc>,
}

impl From<&Track> for TrackSnapshot {
    fn from(track: &Track) -> Self {
        TrackSnapshot {
            distance_meters: track.distance_meters(),
            start_time: track.start_time(),
        }
    }
}
