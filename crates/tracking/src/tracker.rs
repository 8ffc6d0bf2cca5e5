//! Per-vehicle tracking facade.
//!
//! One `VehicleTracker` owns all mutable state for a tracked vehicle: the
//! latest fix, a write gate for persistence throttling, and one proximity
//! evaluator per rider. State is owned exclusively by the single tracker
//! instance, so no locking is needed; callbacks feed samples in one at a
//! time.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::gate::{WriteDecision, WriteGate, WriteGateConfig};
use crate::identifiers::{RiderIdentifier, VehicleIdentifier};
use crate::proximity::{BoardingTransition, ProximityConfig, ProximityEvaluator};
use crate::sample::{validate_coordinate, LocationSample};
use crate::spatial::{haversine_distance, initial_bearing};

/// Movement below this is treated as jitter; no heading is derived.
const MIN_MOVEMENT_FOR_HEADING_M: f64 = 1.0;

#[derive(Clone, Copy, Debug, Default)]
pub struct TrackerConfig {
    pub proximity: ProximityConfig,
    pub gate: WriteGateConfig,
}

/// Snapshot of a vehicle's latest known state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleStatus {
    pub vehicle_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    pub speed: Option<f64>,
    pub heading: Option<f64>,
    pub riders_on_board: u32,
}

pub struct VehicleTracker {
    vehicle_id: VehicleIdentifier,
    proximity_config: ProximityConfig,
    gate: WriteGate,
    last_fix: Option<LocationSample>,
    riders: HashMap<RiderIdentifier, ProximityEvaluator>,
}

impl VehicleTracker {
    pub fn new(vehicle_id: VehicleIdentifier, config: TrackerConfig) -> Result<Self> {
        config.proximity.validate()?;
        let gate = WriteGate::new(config.gate)?;
        Ok(Self {
            vehicle_id,
            proximity_config: config.proximity,
            gate,
            last_fix: None,
            riders: HashMap::new(),
        })
    }

    pub fn vehicle_id(&self) -> &VehicleIdentifier {
        &self.vehicle_id
    }

    /// Record a new vehicle fix and decide whether it should be persisted.
    ///
    /// The fix always becomes the tracker's current position (recency wins
    /// for proximity checks); the returned decision only governs the
    /// caller's write to the downstream store. Speed and heading missing
    /// from the fix are derived from the previous one.
    pub fn record_vehicle(&mut self, sample: LocationSample) -> Result<WriteDecision> {
        validate_coordinate(sample.latitude, sample.longitude)?;
        let enriched = match self.last_fix {
            Some(prev) => enrich_from_previous(prev, sample),
            None => sample,
        };
        self.last_fix = Some(enriched);

        let decision = self.gate.offer(enriched.timestamp);
        debug!(
            vehicle = %self.vehicle_id,
            accepted = decision.is_accepted(),
            "vehicle fix recorded"
        );
        Ok(decision)
    }

    /// Evaluate a rider fix against the vehicle's latest position.
    ///
    /// Returns `None` until a vehicle fix exists. A boarding or alighting
    /// transition is reported once per state change.
    pub fn record_rider(
        &mut self,
        rider_id: RiderIdentifier,
        sample: LocationSample,
    ) -> Result<Option<BoardingTransition>> {
        let vehicle_fix = match self.last_fix {
            Some(fix) => fix,
            None => return Ok(None),
        };

        let evaluator = match self.riders.entry(rider_id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(ProximityEvaluator::new(self.proximity_config)?),
        };

        let transition = evaluator.observe(sample.point(), vehicle_fix.point())?;
        if let Some(transition) = transition {
            info!(
                vehicle = %self.vehicle_id,
                rider = %rider_id,
                ?transition,
                distance_m = evaluator.state().last_known_distance_m,
                "boarding state changed"
            );
        }
        Ok(transition)
    }

    pub fn riders_on_board(&self) -> u32 {
        self.riders.values().filter(|e| e.state().on_board).count() as u32
    }

    pub fn status(&self) -> Option<VehicleStatus> {
        self.last_fix.map(|fix| VehicleStatus {
            vehicle_id: self.vehicle_id.as_str().to_owned(),
            latitude: fix.latitude,
            longitude: fix.longitude,
            timestamp: fix.timestamp,
            speed: fix.speed,
            heading: fix.heading,
            riders_on_board: self.riders_on_board(),
        })
    }
}

/// Fill in speed (m/s) and heading (degrees) from the previous fix when the
/// new one lacks them.
fn enrich_from_previous(prev: LocationSample, mut sample: LocationSample) -> LocationSample {
    let dt = (sample.timestamp - prev.timestamp).num_milliseconds() as f64 / 1000.0;
    if dt <= 0.0 {
        return sample;
    }

    let travelled = haversine_distance(prev.point(), sample.point());

    if sample.speed.is_none() {
        sample.speed = Some(travelled / dt);
    }
    if sample.heading.is_none() && travelled >= MIN_MOVEMENT_FOR_HEADING_M {
        if let Ok(bearing) = initial_bearing(prev.point(), sample.point()) {
            sample.heading = Some(bearing.to_degrees());
        }
    }
    sample
}
