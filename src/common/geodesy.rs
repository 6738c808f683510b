use glam::DVec3;
use serde::Deserialize;

/// WGS84 flattening.
pub const FLATTENING: f64 = 1.0 / 298.257_223_563;
/// Squared ratio of the polar to the equatorial radius, `(1 - f)^2`.
pub const FF: f64 = (1.0 - FLATTENING) * (1.0 - FLATTENING);
/// The reference ellipsoid is normalized to a unit semi-major axis.
pub const EQUATORIAL_RADIUS: f64 = 1.0;

pub type CartesianPoint = DVec3;

#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
pub struct GeodeticPoint {
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
}

impl GeodeticPoint {
    pub const NORTH_POLE: GeodeticPoint = GeodeticPoint::new(0.0, 90.0);
    pub const SOUTH_POLE: GeodeticPoint = GeodeticPoint::new(0.0, -90.0);

    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }
}

pub fn polar_radius() -> f64 {
    FF.sqrt()
}

/// Projects a geodetic coordinate onto (or `height` above) the reference ellipsoid.
///
/// The result has the polar axis on Y, the prime meridian on -X and 90°E on +Z.
pub fn project(point: GeodeticPoint, height: f64) -> CartesianPoint {
    let lambda = point.longitude.to_radians();
    let phi = point.latitude.to_radians();
    let (slat, clat) = phi.sin_cos();

    let c = 1.0 / (clat * clat + FF * slat * slat).sqrt();
    let s = c * FF;

    let x = (EQUATORIAL_RADIUS * c + height) * clat * lambda.cos();
    let y = (EQUATORIAL_RADIUS * c + height) * clat * lambda.sin();
    let z = (EQUATORIAL_RADIUS * s + height) * slat;

    DVec3::new(-x, z, y)
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(-180.0)]
    #[case(-97.5)]
    #[case(0.0)]
    #[case(12.25)]
    #[case(180.0)]
    fn equator_lies_in_equatorial_plane(#[case] longitude: f64) {
        let p = project(GeodeticPoint::new(longitude, 0.0), 0.0);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.length(), EQUATORIAL_RADIUS, epsilon = 1e-12);
    }

    #[test]
    fn poles_are_mirrored_on_polar_axis() {
        let north = project(GeodeticPoint::NORTH_POLE, 0.0);
        let south = project(GeodeticPoint::SOUTH_POLE, 0.0);

        assert_abs_diff_eq!(north.y, polar_radius(), epsilon = 1e-12);
        assert_abs_diff_eq!(south.y, -polar_radius(), epsilon = 1e-12);
        assert_abs_diff_eq!(north.x, south.x, epsilon = 1e-12);
        assert_abs_diff_eq!(north.z, south.z, epsilon = 1e-12);
        assert_abs_diff_eq!(north.x, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn equatorial_axes() {
        let prime = project(GeodeticPoint::new(0.0, 0.0), 0.0);
        assert_abs_diff_eq!(prime.x, -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(prime.z, 0.0, epsilon = 1e-12);

        let east = project(GeodeticPoint::new(90.0, 0.0), 0.0);
        assert_abs_diff_eq!(east.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(east.y, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(east.z, 1.0, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0.0, 45.0)]
    #[case(-73.9, 40.7)]
    #[case(139.7, 35.7)]
    #[case(18.4, -33.9)]
    #[case(-179.0, -89.0)]
    fn surface_points_lie_on_ellipsoid(#[case] longitude: f64, #[case] latitude: f64) {
        let p = project(GeodeticPoint::new(longitude, latitude), 0.0);
        let polar = polar_radius();
        let value = (p.x * p.x + p.z * p.z) / (EQUATORIAL_RADIUS * EQUATORIAL_RADIUS)
            + p.y * p.y / (polar * polar);
        assert_abs_diff_eq!(value, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn height_raises_along_axes() {
        let on_surface = project(GeodeticPoint::NORTH_POLE, 0.0);
        let raised = project(GeodeticPoint::NORTH_POLE, 1.0);
        assert_abs_diff_eq!(raised.y - on_surface.y, 1.0, epsilon = 1e-12);

        let equator = project(GeodeticPoint::new(90.0, 0.0), 0.5);
        assert_abs_diff_eq!(equator.z, 1.5, epsilon = 1e-12);
    }
}
