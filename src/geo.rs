use thiserror::Error;

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("latitude must be a finite number between -90 and 90")]
    Latitude,
    #[error("longitude must be a finite number between -180 and 180")]
    Longitude,
}

/// A point on the globe, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Builds a point from caller input, rejecting values outside the valid ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::Latitude);
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::Longitude);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Great-circle distance in kilometres, rounded to two decimals.
pub fn haversine_km(from: Coordinates, to: Coordinates) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    // Floating error can push `a` a hair past 1 for antipodal points.
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    round_2(EARTH_RADIUS_KM * c)
}

/// Renders a distance the way the API reports it, e.g. `"111.19 km"`.
pub fn format_km(km: f64) -> String {
    format!("{:.2} km", km)
}

fn round_2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).expect("valid test point")
    }

    #[test]
    fn same_point_is_zero() {
        let p = pt(48.8566, 2.3522);
        assert_eq!(haversine_km(p, p), 0.0);
        assert_eq!(format_km(haversine_km(p, p)), "0.00 km");
    }

    #[test]
    fn one_degree_of_longitude_on_the_equator() {
        let d = haversine_km(pt(0.0, 0.0), pt(0.0, 1.0));
        assert_eq!(format_km(d), "111.19 km");
    }

    #[test]
    fn antipodal_points_are_half_the_circumference() {
        let d = haversine_km(pt(0.0, 0.0), pt(0.0, 180.0));
        assert_eq!(format_km(d), "20015.09 km");

        let poles = haversine_km(pt(90.0, 0.0), pt(-90.0, 0.0));
        assert_eq!(format_km(poles), "20015.09 km");
    }

    #[test]
    fn distance_is_symmetric() {
        let points = [
            pt(0.0, 0.0),
            pt(51.5074, -0.1278),
            pt(-33.8688, 151.2093),
            pt(40.7128, -74.0060),
            pt(89.9, 179.9),
            pt(-89.9, -179.9),
            pt(35.6762, 139.6503),
        ];
        for a in points {
            for b in points {
                assert_eq!(haversine_km(a, b), haversine_km(b, a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn london_to_paris() {
        let d = haversine_km(pt(51.5074, -0.1278), pt(48.8566, 2.3522));
        assert!((d - 343.5).abs() < 1.0, "got {d}");
    }

    #[test]
    fn rejects_out_of_range_points() {
        assert_eq!(Coordinates::new(90.5, 0.0), Err(GeoError::Latitude));
        assert_eq!(Coordinates::new(f64::NAN, 0.0), Err(GeoError::Latitude));
        assert_eq!(Coordinates::new(0.0, -180.01), Err(GeoError::Longitude));
        assert_eq!(Coordinates::new(0.0, f64::INFINITY), Err(GeoError::Longitude));
        assert!(Coordinates::new(-90.0, 180.0).is_ok());
    }
}
