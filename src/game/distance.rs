use serde::Deserialize;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct Coordinates {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Great-circle distance in kilometers (haversine).
pub fn distance_km(from: &Coordinates, to: &Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lng = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` slightly past 1 for antipodal points
    let a = a.min(1.0).max(0.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

pub fn is_within_radius(click: &Coordinates, target: &Coordinates, radius_km: f64) -> bool {
    distance_km(click, target) <= radius_km
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    // Moves north along a meridian by the given distance.
    fn north_of(origin: &Coordinates, km: f64) -> Coordinates {
        let degrees = (km / EARTH_RADIUS_KM).to_degrees();
        Coordinates::new(origin.latitude + degrees, origin.longitude)
    }

    #[test]
    fn identical_points_are_zero_apart() {
        let tennoji = Coordinates::new(34.6638, 135.5191);
        assert_eq!(distance_km(&tennoji, &tennoji), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            (Coordinates::new(34.6638, 135.5191), Coordinates::new(35.0532, 135.7664)),
            (Coordinates::new(43.0621, 141.3544), Coordinates::new(26.2124, 127.6809)),
            (Coordinates::new(-33.8688, 151.2093), Coordinates::new(51.5074, -0.1278)),
        ];
        for (a, b) in pairs.iter() {
            assert!((distance_km(a, b) - distance_km(b, a)).abs() < EPSILON);
        }
    }

    #[test]
    fn antipodal_points_are_half_circumference_apart() {
        let a = Coordinates::new(35.0, 135.0);
        let b = Coordinates::new(-35.0, -45.0);
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        let distance = distance_km(&a, &b);
        assert!(distance.is_finite());
        assert!((distance - half_circumference).abs() < 1e-3);
    }

    #[test]
    fn osaka_to_kyoto_is_about_forty_five_km() {
        let tennoji = Coordinates::new(34.6638, 135.5191);
        let rakuhoku = Coordinates::new(35.0532, 135.7664);
        let distance = distance_km(&tennoji, &rakuhoku);
        assert!(distance > 40.0 && distance < 50.0);
    }

    #[test]
    fn radius_boundary() {
        let target = Coordinates::new(34.6638, 135.5191);
        assert!(is_within_radius(&north_of(&target, 49.9), &target, 50.0));
        assert!(!is_within_radius(&north_of(&target, 50.1), &target, 50.0));
    }

    #[test]
    fn radius_is_inclusive() {
        let target = Coordinates::new(34.6638, 135.5191);
        let click = north_of(&target, 10.0);
        let distance = distance_km(&click, &target);
        assert!(is_within_radius(&click, &target, distance));
    }
}
