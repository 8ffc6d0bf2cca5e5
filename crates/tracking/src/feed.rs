//! In-process status feed.
//!
//! Bridges tracker output to consumers (UI, notification dispatch) through
//! watch channels: one channel per vehicle carrying the latest
//! `VehicleStatus`. Late subscribers immediately see the most recent value.
//! The feed is an explicitly constructed handle passed to whoever needs it,
//! never a process-wide singleton.

use std::collections::HashMap;

use tokio::sync::watch;

use crate::identifiers::VehicleIdentifier;
use crate::tracker::VehicleStatus;

pub struct TrackingFeed {
    channels: HashMap<VehicleIdentifier, watch::Sender<Option<VehicleStatus>>>,
}

impl TrackingFeed {
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
        }
    }

    /// Publish the latest status for a vehicle, creating its channel on
    /// first publish.
    pub fn publish(&mut self, status: VehicleStatus) {
        let id = VehicleIdentifier::new(&status.vehicle_id);
        self.sender(id).send_replace(Some(status));
    }

    /// Subscribe to a vehicle's status stream.
    ///
    /// Works before the first publish; the receiver starts at `None` and
    /// observes every subsequent status.
    pub fn subscribe(&mut self, vehicle_id: &VehicleIdentifier) -> watch::Receiver<Option<VehicleStatus>> {
        self.sender(vehicle_id.clone()).subscribe()
    }

    /// Latest published status, if any.
    pub fn latest(&self, vehicle_id: &VehicleIdentifier) -> Option<VehicleStatus> {
        self.channels
            .get(vehicle_id)
            .and_then(|tx| tx.borrow().clone())
    }

    pub fn tracked_vehicles(&self) -> impl Iterator<Item = &VehicleIdentifier> {
        self.channels.keys()
    }

    fn sender(&mut self, id: VehicleIdentifier) -> &watch::Sender<Option<VehicleStatus>> {
        self.channels
            .entry(id)
            .or_insert_with(|| watch::channel(None).0)
    }
}

impl Default for TrackingFeed {
    fn default() -> Self {
        Self::new()
    }
}
