//! # Compare-List Store
//!
//! Holds the vehicles picked for side-by-side comparison. Purely local: no
//! persistence, no network.

use otorite_core::{CompareError, CompareList, VehicleSnapshot};
use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;
use ts_rs::TS;

/// What the comparison view renders.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CompareSnapshot {
    pub entries: Vec<VehicleSnapshot>,
    pub capacity: usize,
}

impl From<&CompareList> for CompareSnapshot {
    fn from(list: &CompareList) -> Self {
        CompareSnapshot {
            entries: list.entries().to_vec(),
            capacity: list.capacity(),
        }
    }
}

#[derive(Debug)]
pub struct CompareStore {
    state: watch::Sender<CompareList>,
}

impl CompareStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(CompareList::new());
        CompareStore { state }
    }

    /// Appends a vehicle, or reports why it cannot be added. Subscribers are
    /// only notified when the list changed.
    pub fn add(&self, vehicle: VehicleSnapshot) -> Result<(), CompareError> {
        let id = vehicle.id.clone();
        let mut outcome = Ok(());

        self.state.send_if_modified(|list| match list.add(vehicle) {
            Ok(()) => true,
            Err(e) => {
                outcome = Err(e);
                false
            }
        });

        match &outcome {
            Ok(()) => debug!(vehicle_id = %id, "Added to compare list"),
            Err(e) => debug!(vehicle_id = %id, reason = %e, "Compare add refused"),
        }
        outcome
    }

    /// Removes a vehicle; absent ids are ignored.
    pub fn remove(&self, id: &str) {
        self.state.send_if_modified(|list| list.remove(id));
    }

    pub fn clear(&self) {
        self.state.send_if_modified(CompareList::clear);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.borrow().contains(id)
    }

    /// Entries in the order they were added.
    pub fn entries(&self) -> Vec<VehicleSnapshot> {
        self.state.borrow().entries().to_vec()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.state.borrow().capacity()
    }

    pub fn snapshot(&self) -> CompareSnapshot {
        CompareSnapshot::from(&*self.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<CompareList> {
        self.state.subscribe()
    }
}

impl Default for CompareStore {
    fn default() -> Self {
        Self::new()
    }
}
