//! Geometry for replaying routes. Positions are WGS84 degrees throughout.

use model::{LonLat, RoutePath};

/// Mean Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Interpolates linearly along each axis. GPS samples are seconds apart, so
/// the error against the great-circle path is far below GPS noise. Fractions
/// outside [0, 1] extrapolate.
pub fn interpolate_position(start: LonLat, end: LonLat, fraction: f64) -> LonLat {
    LonLat::new(
        start.lon + (end.lon - start.lon) * fraction,
        start.lat + (end.lat - start.lat) * fraction,
    )
}

/// Initial great-circle bearing from `start` towards `end`, in compass
/// degrees [0, 360). Identical endpoints give 0, pointing north.
pub fn initial_bearing(start: LonLat, end: LonLat) -> f64 {
    let lat1 = start.lat.to_radians();
    let lat2 = end.lat.to_radians();
    let delta_lon = (end.lon - start.lon).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Haversine great-circle distance in meters
pub fn haversine_distance_m(a: LonLat, b: LonLat) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let delta_lat = (b.lat - a.lat).to_radians();
    let delta_lon = (b.lon - a.lon).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Total length of a route in meters, for labelling the scrubber
pub fn path_distance_m(path: &RoutePath) -> f64 {
    path.points()
        .windows(2)
        .map(|pair| haversine_distance_m(pair[0].lon_lat(), pair[1].lon_lat()))
        .sum()
}
