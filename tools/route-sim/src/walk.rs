//! Random-walk route generation.
//!
//! Produces a plausible vehicle trace: fixed-length legs at a constant
//! cadence, with the bearing drifting by a bounded random turn per leg so
//! routes curve instead of ping-ponging.

use anyhow::{Context, Result};
use buswatch_tracking::spatial::destination_point;
use buswatch_tracking::LocationSample;
use chrono::{DateTime, Duration, Utc};
use geo::Point;
use rand::Rng;

pub struct WalkParams {
    pub origin: Point,
    pub start: DateTime<Utc>,
    /// Number of legs to walk; the output has `legs + 1` samples
    /// (origin included).
    pub legs: usize,
    pub step_m: f64,
    pub interval: Duration,
    /// Maximum bearing change per leg, radians.
    pub max_turn_rad: f64,
}

pub fn generate(params: &WalkParams, rng: &mut impl Rng) -> Result<Vec<LocationSample>> {
    let interval_secs = params.interval.num_milliseconds() as f64 / 1000.0;
    anyhow::ensure!(interval_secs > 0.0, "sample interval must be positive");
    anyhow::ensure!(params.step_m > 0.0, "step distance must be positive");
    anyhow::ensure!(
        params.max_turn_rad.is_finite() && params.max_turn_rad >= 0.0,
        "max turn must be finite and non-negative"
    );

    let speed = params.step_m / interval_secs;
    let mut bearing: f64 = rng.random_range(0.0..std::f64::consts::TAU);
    let mut position = params.origin;
    let mut at = params.start;

    let mut samples = Vec::with_capacity(params.legs + 1);
    samples.push(
        LocationSample::new(position.y(), position.x(), at)
            .context("origin coordinate out of range")?,
    );

    for leg in 0..params.legs {
        bearing = (bearing + rng.random_range(-params.max_turn_rad..=params.max_turn_rad))
            .rem_euclid(std::f64::consts::TAU);
        position = destination_point(position, bearing, params.step_m)
            .with_context(|| format!("walk left the globe at leg {}", leg))?;
        at += params.interval;

        let sample = LocationSample::new(position.y(), position.x(), at)
            .with_context(|| format!("generated invalid coordinate at leg {}", leg))?
            .with_speed(speed)
            .with_heading(bearing.to_degrees());
        samples.push(sample);
    }

    Ok(samples)
}
