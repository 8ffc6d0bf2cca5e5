//! Geodesic query utilities for proximity checks and route generation.
//!
//! Uses the Haversine formula for accurate distances on Earth's surface.
//! All functions are pure; validated variants reject coordinates outside
//! latitude [-90, 90] / longitude [-180, 180].

use geo::{HaversineDistance, Point};

use crate::error::Result;
use crate::sample::validate_coordinate;

/// Mean Earth radius in meters, matching the value the `geo` crate uses
/// so distances and destination points round-trip.
pub const MEAN_EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Calculate Haversine distance between two points in meters.
///
/// Points are (longitude, latitude); no range validation is performed.
pub fn haversine_distance(p1: Point, p2: Point) -> f64 {
    p1.haversine_distance(&p2)
}

/// Haversine distance in meters with coordinate validation.
pub fn distance_meters(p1: Point, p2: Point) -> Result<f64> {
    validate_coordinate(p1.y(), p1.x())?;
    validate_coordinate(p2.y(), p2.x())?;
    Ok(haversine_distance(p1, p2))
}

/// Solve the direct geodesic problem on a sphere: the point reached by
/// travelling `distance_m` meters from `origin` along `bearing_rad`
/// (radians clockwise from true north).
///
/// The result's longitude is normalized to [-180, 180].
pub fn destination_point(origin: Point, bearing_rad: f64, distance_m: f64) -> Result<Point> {
    validate_coordinate(origin.y(), origin.x())?;
    if !bearing_rad.is_finite() {
        return Err(crate::error::TrackingError::InvalidConfig(format!(
            "bearing must be finite, got {}",
            bearing_rad
        )));
    }
    if !distance_m.is_finite() || distance_m < 0.0 {
        return Err(crate::error::TrackingError::InvalidConfig(format!(
            "distance must be finite and non-negative, got {}",
            distance_m
        )));
    }

    let lat1 = origin.y().to_radians();
    let lon1 = origin.x().to_radians();
    let angular = distance_m / MEAN_EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing_rad.cos()).asin();
    let lon2 = lon1
        + (bearing_rad.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * lat2.sin());

    let mut lon2_deg = lon2.to_degrees();
    if lon2_deg > 180.0 {
        lon2_deg -= 360.0;
    } else if lon2_deg < -180.0 {
        lon2_deg += 360.0;
    }

    Ok(Point::new(lon2_deg, lat2.to_degrees()))
}

/// Forward azimuth from `from` to `to` in radians, normalized to [0, 2π).
pub fn initial_bearing(from: Point, to: Point) -> Result<f64> {
    validate_coordinate(from.y(), from.x())?;
    validate_coordinate(to.y(), to.x())?;

    let lat1 = from.y().to_radians();
    let lat2 = to.y().to_radians();
    let delta_lon = (to.x() - from.x()).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();

    Ok(y.atan2(x).rem_euclid(std::f64::consts::TAU))
}
