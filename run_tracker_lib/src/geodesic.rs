use geo_types::Point;

pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two positions in meters, haversine form.
///
/// Returns `None` when no reliable distance can be computed (non-finite
/// input, or a non-finite/negative result). Callers treat `None` as
/// "no reliable distance", not as an error.
pub fn distance_meters(a: Point, b: Point) -> Option<f64> {
    let lat1 = a.y().to_radians();
    let lat2 = b.y().to_radians();
    let d_lat = (b.y() - a.y()).to_radians();
    let d_lon = (b.x() - a.x()).to_radians();

    let h = f64::sin(d_lat / 2.).powi(2)
        + f64::cos(lat1) * f64::cos(lat2) * f64::sin(d_lon / 2.).powi(2);
    // Rounding can push h just past 1 for antipodal points, which would
    // feed sqrt a negative number below.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * f64::atan2(h.sqrt(), (1.0 - h).sqrt());

    let distance = EARTH_RADIUS_METERS * c;
    if distance.is_finite() && distance >= 0.0 {
        Some(distance)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_points_are_zero() {
        let p = Point::new(12.5683, 55.6761);
        assert_eq!(distance_meters(p, p), Some(0.0));
    }

    #[test]
    fn symmetric() {
        let copenhagen = Point::new(12.5683, 55.6761);
        let aarhus = Point::new(10.2039, 56.1629);
        assert_eq!(
            distance_meters(copenhagen, aarhus),
            distance_meters(aarhus, copenhagen)
        );
    }

    #[test]
    fn copenhagen_to_aarhus() {
        let copenhagen = Point::new(12.5683, 55.6761);
        let aarhus = Point::new(10.2039, 56.1629);
        let d = distance_meters(copenhagen, aarhus).unwrap();
        assert!((d - 157_000.0).abs() < 2_000.0, "got {} m", d);
    }

    #[test]
    fn one_degree_of_latitude() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 1.0);
        let d = distance_meters(a, b).unwrap();
        let expected = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;
        assert!((d - expected).abs() < 1e-6);
    }

    #[test]
    fn antipodal_is_finite() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(180.0, 0.0);
        let d = distance_meters(a, b).unwrap();
        let half_circumference = EARTH_RADIUS_METERS * std::f64::consts::PI;
        assert!((d - half_circumference).abs() < 1.0);
    }

    #[test]
    fn near_pole_is_finite() {
        let a = Point::new(0.0, 89.9999);
        let b = Point::new(180.0, 89.9999);
        let d = distance_meters(a, b).unwrap();
        assert!(d.is_finite() && d >= 0.0);
        assert!(d < 100.0);
    }

    #[test]
    fn non_finite_input_is_none() {
        let a = Point::new(f64::NAN, 0.0);
        let b = Point::new(0.0, 0.0);
        assert_eq!(distance_meters(a, b), None);
        assert_eq!(distance_meters(b, Point::new(0.0, f64::INFINITY)), None);
    }
}
