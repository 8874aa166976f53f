pub mod format;
pub mod geodesic;
pub mod location_fix;
pub mod track;
pub mod track_snapshot;
