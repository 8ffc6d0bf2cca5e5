//! Location samples as reported by a GPS fix.

use chrono::{DateTime, Utc};
use geo::Point;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackingError};

/// A single recorded position fix.
///
/// Immutable once constructed; samples for one entity are ordered by
/// `timestamp`. Speed is meters per second, heading is degrees clockwise
/// from true north, accuracy is the reported horizontal error in meters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub accuracy: Option<f64>,
}

impl LocationSample {
    /// Construct a sample with just a position, rejecting out-of-range
    /// coordinates.
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Result<Self> {
        validate_coordinate(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
            timestamp,
            speed: None,
            heading: None,
            accuracy: None,
        })
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_heading(mut self, heading: f64) -> Self {
        self.heading = Some(heading);
        self
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Position as a `geo::Point` (x = longitude, y = latitude).
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

/// Check that a latitude/longitude pair is on the globe.
///
/// NaN fails every comparison, so non-finite inputs are rejected too.
pub fn validate_coordinate(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(TrackingError::InvalidCoordinate {
            latitude,
            longitude,
        });
    }
    Ok(())
}
