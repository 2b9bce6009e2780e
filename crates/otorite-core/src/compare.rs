//! # Compare List
//!
//! The bounded, ordered selection of vehicles shown side by side.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Compare List Operations                            │
//! │                                                                         │
//! │  "Compare" button ──► add(v) ──┬── len == capacity ──► Err(Full)       │
//! │                                ├── id present ───────► Err(Already…)   │
//! │                                └── otherwise ────────► push(v)         │
//! │                                                                         │
//! │  "x" on a column ───► remove(id) ──► retain(id != id)  (absent: no-op) │
//! │                                                                         │
//! │  "Clear" ───────────► clear() ─────► []                                 │
//! │                                                                         │
//! │  Invariants: len <= capacity, ids unique, insertion order kept          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::error::CompareError;
use crate::types::VehicleSnapshot;
use crate::MAX_COMPARE;

/// Ordered list of vehicle snapshots, unique by id, at most `capacity` long.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareList {
    entries: Vec<VehicleSnapshot>,
    #[serde(skip)]
    capacity: usize,
}

impl CompareList {
    /// Creates an empty list with the standard capacity.
    pub fn new() -> Self {
        Self::with_capacity(MAX_COMPARE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        CompareList {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a vehicle.
    ///
    /// ## Returns
    /// - `Err(Full)` when the list is at capacity
    /// - `Err(AlreadySelected)` when the id is already present
    ///
    /// The list is unchanged on error.
    pub fn add(&mut self, vehicle: VehicleSnapshot) -> Result<(), CompareError> {
        if self.entries.len() >= self.capacity {
            return Err(CompareError::Full { max: self.capacity });
        }

        if self.contains(&vehicle.id) {
            return Err(CompareError::AlreadySelected(vehicle.id));
        }

        self.entries.push(vehicle);
        Ok(())
    }

    /// Removes the vehicle with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|v| v.id != id);
        self.entries.len() != before
    }

    /// Empties the list. Returns whether it held anything.
    pub fn clear(&mut self) -> bool {
        let had_entries = !self.entries.is_empty();
        self.entries.clear();
        had_entries
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|v| v.id == id)
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[VehicleSnapshot] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CompareList {
    fn default() -> Self {
        Self::new()
    }
}
