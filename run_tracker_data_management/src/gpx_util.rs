use std::str::FromStr;

use chrono::{DateTime, Utc};
use run_tracker_lib::location_fix::LocationFix;

use crate::StateError;

/// Assumed accuracy for recordings that carry no hdop.
const DEFAULT_ACCURACY_METERS: f64 = 5.0;

/// Reads a GPX recording into location fixes, in track order, for replay.
/// Points without a usable timestamp are skipped; hdop stands in for the
/// horizontal accuracy when present.
pub fn read_gpx(path: &str) -> Result<Vec<LocationFix>, StateError> {
    let file = std::fs::File::open(path)
        .map_err(|_| StateError::Gpx(format!("Failed to open GPX file: {}", path)))?;
    let reader = std::io::BufReader::new(file);
    let gpx = gpx::read(reader)
        .map_err(|_| StateError::Gpx(format!("Failed to parse GPX file: {}", path)))?;

    let mut fixes = Vec::new();
    for track in gpx.tracks {
        for segment in track.segments {
            for point in segment.points {
                let Some(timestamp) = point
                    .time
                    .and_then(|time| time.format().ok())
                    .and_then(|formatted| DateTime::<Utc>::from_str(&formatted).ok())
                else {
                    continue;
                };

                let accuracy = point.hdop.unwrap_or(DEFAULT_ACCURACY_METERS);
                let speed = point.speed.unwrap_or(0.0);
                fixes.push(LocationFix::new(point.point(), timestamp, speed, accuracy));
            }
        }
    }

    Ok(fixes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg>
      <trkpt lat="55.0000" lon="12.0000">
        <time>2024-06-01T10:00:00Z</time>
        <hdop>3.0</hdop>
      </trkpt>
      <trkpt lat="55.0010" lon="12.0000">
        <time>2024-06-01T10:01:00Z</time>
      </trkpt>
      <trkpt lat="55.0020" lon="12.0000">
      </trkpt>
    </trkseg>
  </trk>
</gpx>"#;

    fn write_sample(name: &str) -> String {
        let dir = std::env::temp_dir().join("run_tracker_tests");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, SAMPLE_GPX).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn reads_timestamped_points_in_order() {
        let path = write_sample("sample.gpx");
        let fixes = read_gpx(&path).unwrap();

        // The timeless third point is skipped.
        assert_eq!(fixes.len(), 2);
        assert!(fixes[0].timestamp < fixes[1].timestamp);
        assert_eq!(fixes[0].position.y(), 55.0);
        assert_eq!(fixes[1].position.y(), 55.001);
    }

    #[test]
    fn hdop_defaults_when_absent() {
        let path = write_sample("sample_hdop.gpx");
        let fixes = read_gpx(&path).unwrap();

        assert_eq!(fixes[0].accuracy, 3.0);
        assert_eq!(fixes[1].accuracy, DEFAULT_ACCURACY_METERS);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_gpx("does_not_exist.gpx").is_err());
    }
}
