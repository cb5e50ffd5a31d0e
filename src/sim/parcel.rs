//! Parcel entity

use serde::Serialize;

use super::destination::Destination;

/// One deliverable unit, tagged with its destination.
///
/// A parcel lives either on the input belt (`location == None`) or in
/// exactly one stack lane. Ids are allocated by the round controller and
/// stay stable for the parcel's lifetime.
#[derive(Debug, Clone, Serialize)]
pub struct Parcel {
    /// Controller-allocated id
    pub id: u32,
    /// Where this parcel wants to go
    pub destination: Destination,
    /// Stack lane currently holding the parcel, `None` while on the belt
    pub location: Option<usize>,
    /// Set on the most recently pushed parcel of its lane
    pub on_top_of_stack: bool,
}

impl Parcel {
    /// A freshly spawned parcel, not yet stored anywhere.
    pub fn new(id: u32, destination: Destination) -> Self {
        Self {
            id,
            destination,
            location: None,
            on_top_of_stack: false,
        }
    }

    /// True when this parcel may be delivered to `destination`.
    pub fn has_same_destination(&self, destination: Destination) -> bool {
        self.destination == destination
    }
}
