//! Stack lane storage
//!
//! Fixed number of independent LIFO lanes. Invariant: every non-empty lane
//! has exactly one parcel carrying the top-of-stack mark, and it is the most
//! recently pushed one.

use crate::consts::STACK_LANES;

use super::SimError;
use super::parcel::Parcel;

/// The stacking area between the input belt and the output bays.
#[derive(Debug, Clone)]
pub struct Stacks {
    lanes: Vec<Vec<Parcel>>,
}

impl Default for Stacks {
    fn default() -> Self {
        Self::new()
    }
}

impl Stacks {
    /// `STACK_LANES` empty lanes.
    pub fn new() -> Self {
        Self {
            lanes: vec![Vec::new(); STACK_LANES],
        }
    }

    fn lane_mut(&mut self, lane: usize) -> Result<&mut Vec<Parcel>, SimError> {
        self.lanes.get_mut(lane).ok_or(SimError::LaneOutOfRange(lane))
    }

    /// Append `parcel` to `lane`, demoting the previous top.
    pub fn push(&mut self, lane: usize, mut parcel: Parcel) -> Result<(), SimError> {
        let parcels = self.lane_mut(lane)?;
        if let Some(top) = parcels.last_mut() {
            top.on_top_of_stack = false;
        }
        parcel.location = Some(lane);
        parcel.on_top_of_stack = true;
        parcels.push(parcel);
        Ok(())
    }

    /// Remove and return the top parcel of `lane`, promoting the one below.
    pub fn pop(&mut self, lane: usize) -> Result<Parcel, SimError> {
        let parcels = self.lane_mut(lane)?;
        let mut popped = parcels.pop().ok_or(SimError::EmptyLane(lane))?;
        if let Some(top) = parcels.last_mut() {
            top.on_top_of_stack = true;
        }
        popped.location = None;
        popped.on_top_of_stack = false;
        Ok(popped)
    }

    /// Top parcel of `lane` without removing it.
    pub fn peek_top(&self, lane: usize) -> Result<Option<&Parcel>, SimError> {
        self.lanes
            .get(lane)
            .map(|parcels| parcels.last())
            .ok_or(SimError::LaneOutOfRange(lane))
    }

    /// Lane whose top parcel has id `id`, if any.
    pub fn top_lane_of(&self, id: u32) -> Option<usize> {
        self.lanes
            .iter()
            .position(|parcels| parcels.last().is_some_and(|p| p.id == id))
    }

    /// Ordered contents of every lane, bottom first.
    pub fn lanes(&self) -> &[Vec<Parcel>] {
        &self.lanes
    }

    /// Empty every lane (round restart).
    pub fn clear(&mut self) {
        for parcels in &mut self.lanes {
            parcels.clear();
        }
    }
}
