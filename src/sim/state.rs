//! Round state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::*;

use super::clock::Clock;
use super::destination::Destination;
use super::input_lane::InputLane;
use super::output::OutputSlot;
use super::parcel::Parcel;
use super::scheduler::Scheduler;
use super::stacks::Stacks;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Idle start screen, no simulation ticking
    Menu,
    /// Simulation active
    Running,
    /// Terminal display state; only an explicit restart leaves it
    GameOver,
}

/// Fire-and-forget notifications for sound and scoreboard collaborators.
///
/// Accumulated during [`super::tick`] and drained once per frame via
/// [`GameState::take_events`]; the core never waits on consumers.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A scheduled arrival occupied an output bay
    OutputActivated {
        /// Bay index
        slot: usize,
        /// Destination now loading there
        destination: Destination,
    },
    /// An occupied bay timed out without a delivery
    OutputExpired {
        /// Bay index
        slot: usize,
        /// Destination whose truck left empty
        destination: Destination,
    },
    /// A parcel reached a matching bay
    Delivered {
        /// Bay index
        slot: usize,
        /// Destination delivered to
        destination: Destination,
    },
    /// The round clock ran out
    RoundOver {
        /// Final score for display
        score: u32,
    },
}

/// Complete round state, deterministic given a seed and an input script.
///
/// The round controller in [`super::tick`] is the sole mutator; everything
/// here is advanced once per frame in a fixed order.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    /// Current phase
    pub phase: GamePhase,
    /// Round countdown
    pub clock: Clock,
    /// Pending destination arrivals
    pub scheduler: Scheduler,
    /// Receiving bays
    pub outputs: Vec<OutputSlot>,
    /// LIFO storage lanes
    pub stacks: Stacks,
    /// Conveyor feeding new parcels
    pub input_lane: InputLane,
    /// Parcels delivered this round
    pub score: u32,
    /// Destinations currently eligible for random selection, maintained by
    /// the unlock schedule
    pub active_destinations: usize,
    /// The single movable selection, by parcel id
    pub(crate) selected: Option<u32>,
    pub(crate) spawn_cooldown: f32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// A fresh state on the menu screen.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            clock: Clock::new(ROUND_TIME_SECS),
            scheduler: Scheduler::new(),
            outputs: vec![OutputSlot::new(); OUTPUT_SLOTS],
            stacks: Stacks::new(),
            input_lane: InputLane::new(),
            score: 0,
            active_destinations: INITIAL_ACTIVE_DESTINATIONS,
            selected: None,
            spawn_cooldown: 0.0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new parcel id.
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain the events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Id of the currently selected parcel, if any.
    pub fn selected_id(&self) -> Option<u32> {
        self.selected
    }

    /// The currently selected parcel, looked up wherever it resides.
    pub fn selected_parcel(&self) -> Option<&Parcel> {
        let id = self.selected?;
        if let Some(parcel) = self.input_lane.parcel() {
            if parcel.id == id {
                return Some(parcel);
            }
        }
        let lane = self.stacks.top_lane_of(id)?;
        self.stacks.peek_top(lane).ok().flatten()
    }
}
