//! # buswatch-tracking
//!
//! Core logic for live vehicle tracking: geodesic proximity detection and
//! persistence throttling.
//!
//! ## Features
//!
//! - **Geodesic queries**: Haversine distance, forward azimuth, direct
//!   geodesic destination points
//! - **Boarding detection**: enter/exit radius hysteresis over rider and
//!   vehicle fixes, emitting a transition only on state change
//! - **Write gating**: bounded write bursts with a cooling pause to protect
//!   the downstream store
//! - **Status feed**: per-vehicle watch channels republishing the latest
//!   snapshot to subscribers
//!
//! The crate is pure decision logic: it determines *whether* a sample should
//! be persisted and *which* boarding transitions occurred. Persistence,
//! rendering, and notification delivery belong to callers.
//!
//! ## Example
//!
//! ```
//! use buswatch_tracking::prelude::*;
//! use chrono::{TimeZone, Utc};
//!
//! let mut tracker = VehicleTracker::new(
//!     VehicleIdentifier::new("bus_42"),
//!     TrackerConfig::default(),
//! ).unwrap();
//!
//! let at = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
//! let fix = LocationSample::new(28.6139, 77.2090, at).unwrap();
//!
//! let decision = tracker.record_vehicle(fix).unwrap();
//! assert!(decision.is_accepted());
//!
//! // A rider standing at the vehicle's position boards it.
//! let transition = tracker
//!     .record_rider(RiderIdentifier::new("rider_7"), fix)
//!     .unwrap();
//! assert_eq!(transition, Some(BoardingTransition::Boarded));
//! ```

pub mod error;
pub mod feed;
pub mod gate;
pub mod identifiers;
pub mod proximity;
pub mod sample;
pub mod spatial;
pub mod tracker;

// Re-exports for convenience
pub mod prelude {
    pub use crate::error::{Result, TrackingError};
    pub use crate::feed::TrackingFeed;
    pub use crate::gate::{GatePhase, WriteDecision, WriteGate, WriteGateConfig};
    pub use crate::identifiers::{RiderIdentifier, VehicleIdentifier};
    pub use crate::proximity::{
        BoardingTransition, ProximityConfig, ProximityEvaluator, ProximityState,
    };
    pub use crate::sample::LocationSample;
    pub use crate::spatial::{destination_point, distance_meters, haversine_distance, initial_bearing};
    pub use crate::tracker::{TrackerConfig, VehicleStatus, VehicleTracker};
}

pub use prelude::*;
