//! Geodesic distance and bearing utilities.

pub mod queries;

pub use queries::{destination_point, distance_meters, haversine_distance, initial_bearing};
