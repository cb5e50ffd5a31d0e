//! Output bay
//!
//! A receiving bay holds at most one active destination with its own
//! departure countdown: Empty --set_destination--> Occupied --expiry or
//! matching delivery--> Empty.

use crate::consts::EXIT_TIME_SECS;

use super::destination::Destination;
use super::parcel::Parcel;

/// One receiving bay.
#[derive(Debug, Clone, Default)]
pub struct OutputSlot {
    destination: Option<Destination>,
    time_left: f32,
}

impl OutputSlot {
    /// An empty bay.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a destination is loading here.
    pub fn is_occupied(&self) -> bool {
        self.destination.is_some()
    }

    /// The active destination, if any.
    pub fn destination(&self) -> Option<Destination> {
        self.destination
    }

    /// Seconds until the truck leaves; meaningful only while occupied.
    pub fn time_left(&self) -> f32 {
        self.time_left
    }

    /// Assign a destination and restart the departure window. By protocol
    /// callers check `is_occupied` first.
    pub fn set_destination(&mut self, destination: Destination) {
        self.destination = Some(destination);
        self.time_left = EXIT_TIME_SECS;
    }

    /// Advance the departure timer. Returns the destination whose truck just
    /// left without a parcel, if the timer crossed zero this tick.
    pub fn tick(&mut self, dt: f32) -> Option<Destination> {
        let destination = self.destination?;
        self.time_left -= dt;
        if self.time_left <= 0.0 {
            self.clear_destination();
            return Some(destination);
        }
        None
    }

    /// Immediately empty the bay (expiry or successful delivery).
    pub fn clear_destination(&mut self) {
        self.destination = None;
        self.time_left = 0.0;
    }

    /// True iff occupied and the parcel is destined here.
    pub fn accepts(&self, parcel: &Parcel) -> bool {
        self.destination
            .is_some_and(|destination| parcel.has_same_destination(destination))
    }
}
