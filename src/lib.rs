//! Parcel Mover - a conveyor-sorting arcade game
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (state machine, timers, inventory)
//! - `snapshot`: Read-only per-frame feed for a presentation layer
//!
//! Rendering, pointer capture and audio live outside this crate: a frontend
//! reads a [`snapshot::Snapshot`] every frame, forwards clicks as
//! [`sim::PlayerAction`] values, and reacts to drained [`sim::GameEvent`]s.

pub mod sim;
pub mod snapshot;

pub use sim::{GamePhase, GameState, PlayerAction, TickInput, start_round, tick};
pub use snapshot::Snapshot;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Round length in seconds
    pub const ROUND_TIME_SECS: f32 = 300.0;

    /// How long an occupied output bay waits before the truck leaves
    pub const EXIT_TIME_SECS: f32 = 8.0;

    /// Travel time for a freshly spawned parcel along the input belt
    pub const SPAWN_TIME_SECS: f32 = 2.0;
    /// Cooldown between parcel spawns
    pub const SPAWN_INTERVAL_SECS: f32 = 2.0;

    /// Number of stack lanes
    pub const STACK_LANES: usize = 3;
    /// Number of output bays
    pub const OUTPUT_SLOTS: usize = 3;

    /// Pending scheduler entries are topped up to this count
    pub const SCHEDULER_CAP: usize = 3;
    /// Minimum gap between consecutive scheduled arrivals
    pub const SCHEDULE_MIN_GAP_SECS: f32 = EXIT_TIME_SECS + 2.0;
    /// Additive random jitter on top of the minimum gap
    pub const SCHEDULE_JITTER_SECS: f32 = 10.0;

    /// Destinations in play when a round starts
    pub const INITIAL_ACTIVE_DESTINATIONS: usize = 6;
    /// Remaining-time fractions at which the next destination unlocks
    pub const UNLOCK_THRESHOLDS: [f32; 2] = [2.0 / 3.0, 1.0 / 3.0];

    /// Points per successful delivery
    pub const SCORE_PER_DELIVERY: u32 = 1;
}
