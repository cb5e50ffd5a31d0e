//! Pending-arrival schedule
//!
//! Append-only bag of future destination arrivals, each counting down
//! independently. Entries that cross zero are removed and handed back to
//! the controller in insertion order; they are never revived.

use serde::Serialize;

use super::destination::Destination;

/// A pending future activation of an output bay.
#[derive(Debug, Clone, Serialize)]
pub struct SchedulerEntry {
    /// Destination that will start loading
    pub destination: Destination,
    /// Seconds until the bay lights up
    pub time_until_arrival: f32,
}

/// The set of pending arrivals.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    entries: Vec<SchedulerEntry>,
}

impl Scheduler {
    /// An empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pending arrival. No uniqueness constraint here; the
    /// controller's replenishment policy keeps back-to-back repeats out.
    pub fn add_entry(&mut self, time_until_arrival: f32, destination: Destination) {
        self.entries.push(SchedulerEntry {
            destination,
            time_until_arrival,
        });
    }

    /// Advance every entry, removing those that crossed zero. Returns the
    /// arrived destinations, ties broken by insertion order.
    pub fn tick(&mut self, dt: f32) -> Vec<Destination> {
        let mut arrived = Vec::new();
        for entry in &mut self.entries {
            entry.time_until_arrival -= dt;
        }
        self.entries.retain(|entry| {
            if entry.time_until_arrival <= 0.0 {
                arrived.push(entry.destination);
                false
            } else {
                true
            }
        });
        arrived
    }

    /// Read-only view of the pending entries, in insertion order.
    pub fn entries(&self) -> &[SchedulerEntry] {
        &self.entries
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Largest pending arrival time, 0 when nothing is pending.
    pub fn max_pending(&self) -> f32 {
        self.entries
            .iter()
            .map(|entry| entry.time_until_arrival)
            .fold(0.0, f32::max)
    }

    /// The entry closest to arriving, if any.
    pub fn next_arrival(&self) -> Option<&SchedulerEntry> {
        self.entries
            .iter()
            .min_by(|a, b| a.time_until_arrival.total_cmp(&b.time_until_arrival))
    }

    /// Drop every pending entry (round restart).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
