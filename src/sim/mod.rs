//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order breaks ties)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collide;
pub mod destination;
pub mod input_lane;
pub mod output;
pub mod parcel;
pub mod scheduler;
pub mod stacks;
pub mod state;
pub mod tick;

pub use clock::Clock;
pub use collide::{Shape, overlaps};
pub use destination::{CATALOG, Destination};
pub use input_lane::InputLane;
pub use output::OutputSlot;
pub use parcel::Parcel;
pub use scheduler::{Scheduler, SchedulerEntry};
pub use stacks::Stacks;
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{PlayerAction, TickInput, start_round, tick};

use thiserror::Error;

/// Refusals for caller-protocol violations and out-of-range indices.
///
/// None of these surface during correct play: the round controller checks
/// state before calling into a component, and a component still refuses
/// rather than corrupt its state if the protocol is broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SimError {
    /// Stack lane index outside the configured lane count
    #[error("stack lane {0} out of range")]
    LaneOutOfRange(usize),
    /// Pop attempted on a lane with no parcels
    #[error("stack lane {0} is empty")]
    EmptyLane(usize),
    /// Spawn attempted while a parcel is still in transit
    #[error("input lane already holds a parcel")]
    InputOccupied,
    /// Despawn attempted with nothing on the belt
    #[error("input lane is empty")]
    InputEmpty,
    /// Catalog index or active-count outside the catalog bounds
    #[error("destination index {0} out of range")]
    DestinationOutOfRange(usize),
}
