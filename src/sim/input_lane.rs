//! Input belt
//!
//! Single-slot staging area for a freshly spawned parcel. Travel progress
//! only positions the sprite; the parcel is selectable from the moment it
//! spawns.

use crate::consts::SPAWN_TIME_SECS;

use super::SimError;
use super::parcel::Parcel;

/// The conveyor feeding new parcels to the player.
#[derive(Debug, Clone, Default)]
pub struct InputLane {
    parcel: Option<Parcel>,
    progress: f32,
}

impl InputLane {
    /// An empty belt.
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a parcel at the start of the belt.
    pub fn spawn(&mut self, parcel: Parcel) -> Result<(), SimError> {
        if self.parcel.is_some() {
            return Err(SimError::InputOccupied);
        }
        self.parcel = Some(parcel);
        self.progress = 0.0;
        Ok(())
    }

    /// Remove the current parcel; travel need not be complete.
    pub fn despawn(&mut self) -> Result<Parcel, SimError> {
        let parcel = self.parcel.take().ok_or(SimError::InputEmpty)?;
        self.progress = 0.0;
        Ok(parcel)
    }

    /// Advance travel progress toward 1.0 over `SPAWN_TIME_SECS`.
    pub fn tick(&mut self, dt: f32) {
        if self.parcel.is_some() && self.progress < 1.0 {
            self.progress = (self.progress + dt / SPAWN_TIME_SECS).min(1.0);
        }
    }

    /// True while a parcel is on the belt.
    pub fn has_parcel(&self) -> bool {
        self.parcel.is_some()
    }

    /// The parcel on the belt, if any.
    pub fn parcel(&self) -> Option<&Parcel> {
        self.parcel.as_ref()
    }

    /// Travel progress in [0, 1].
    pub fn progress(&self) -> f32 {
        self.progress
    }
}
