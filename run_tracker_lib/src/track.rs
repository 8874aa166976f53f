use chrono::{DateTime, Utc};

use crate::{geodesic, location_fix::LocationFix};

/// A fix must move at least this many times its own stated accuracy away
/// from the previous accepted fix to count as motion.
pub const ACCURACY_REJECTION_FACTOR: f64 = 2.0;

/// Minimum spatial extent of the trailing pace window.
pub const PACE_WINDOW_MIN_DISTANCE_METERS: f64 = 100.0;

/// Minimum temporal extent of the trailing pace window.
pub const PACE_WINDOW_MIN_TIME_MS: i64 = 20_000;

const MPS_TO_KMH: f64 = 3.6;

/// The session aggregate: accepted fix history, cumulative distance and the
/// session time base. Owned by whatever control loop sequences fix and tick
/// events into it; all operations are synchronous.
pub struct Track {
    locations: Vec<LocationFix>,
    distance_meters: f64,
    start_time: DateTime<Utc>,
    current_time: DateTime<Utc>,
}

impl Track {
    pub fn new() -> Self {
        let now = Utc::now();
        Track {
            locations: Vec::new(),
            distance_meters: 0.0,
            start_time: now,
            current_time: now,
        }
    }

    /// Feeds one fix into the engine. Returns whether it was accepted.
    ///
    /// The first fix into an empty track is always accepted. After that a
    /// fix is accepted only when its distance from the previous accepted
    /// fix is computable and at least twice the fix's stated accuracy;
    /// anything closer is stationary jitter, not motion.
    pub fn add(&mut self, mut fix: LocationFix) -> bool {
        // The time base follows GPS time, not accepted-motion time, so the
        // cursor advances for rejected fixes too.
        self.set_current_time(fix.timestamp);

        if self.locations.is_empty() {
            fix.distance_from_previous_meters = 0.0;
            fix.distance_to_next_meters = 0.0;
            self.locations.push(fix);
            return true;
        }

        let prev_index = self.locations.len() - 1;
        let Some(d) = geodesic::distance_meters(self.locations[prev_index].position, fix.position)
        else {
            // No reliable distance, same outcome as failing the threshold.
            return false;
        };

        if d < fix.accuracy * ACCURACY_REJECTION_FACTOR {
            return false;
        }

        fix.distance_from_previous_meters = d;
        fix.distance_to_next_meters = 0.0;
        self.locations[prev_index].distance_to_next_meters = d;
        self.locations.push(fix);
        self.distance_meters += d;
        true
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance_meters
    }

    /// Trailing-window average speed in km/h, recomputed by scanning the
    /// history on every call.
    ///
    /// The scan walks backward from the second-most-recent fix, summing the
    /// stored edge distances, and stops at the first fix old enough and far
    /// enough back that the window spans more than 100 m AND more than
    /// 20 s. The newest accepted edge is counted in the first step. If the
    /// scan walks past the start of history without both conditions holding
    /// at once there is not enough data for a stable estimate and the pace
    /// is 0.
    pub fn pace_kmh(&self) -> f64 {
        if self.locations.is_empty() {
            return 0.0;
        }

        let mut total_distance = 0.0;
        let mut index = self.locations.len() as isize - 2;
        while index >= 0 {
            let fix = &self.locations[index as usize];
            total_distance += fix.distance_to_next_meters;

            let window_ms = (self.current_time - fix.timestamp).num_milliseconds();
            if total_distance > PACE_WINDOW_MIN_DISTANCE_METERS && window_ms > PACE_WINDOW_MIN_TIME_MS
            {
                let elapsed_seconds = window_ms as f64 / 1000.0;
                if elapsed_seconds == 0.0 {
                    return 0.0;
                }
                return (total_distance / elapsed_seconds) * MPS_TO_KMH;
            }

            index -= 1;
        }

        0.0
    }

    pub fn duration_ms(&self) -> i64 {
        (self.current_time - self.start_time).num_milliseconds()
    }

    /// Clears the session and starts a new one at the current wall clock.
    pub fn reset(&mut self) {
        self.locations.clear();
        self.distance_meters = 0.0;
        self.start_time = Utc::now();
        self.current_time = self.start_time;
    }

    /// Applies a loaded snapshot: distance and start time are overwritten,
    /// history stays empty (pace reads 0 until new fixes accumulate), and
    /// the cursor is refreshed so duration is immediately coherent.
    pub fn restore(&mut self, distance_meters: f64, start_time: DateTime<Utc>) {
        self.distance_meters = distance_meters;
        self.start_time = start_time;
        self.current_time = Utc::now().max(start_time);
    }

    /// The periodic tick: refreshes time-dependent metrics between fixes.
    pub fn update_current_time(&mut self) {
        self.set_current_time(Utc::now());
    }

    // Clamped so `current_time >= start_time` holds on every update and
    // duration can never go negative, even under device clock skew.
    fn set_current_time(&mut self, time: DateTime<Utc>) {
        self.current_time = time.max(self.start_time);
    }

    pub fn locations(&self) -> &[LocationFix] {
        &self.locations
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::new()
    }
}
