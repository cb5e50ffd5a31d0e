//! Renderer feed
//!
//! Read-only, plain-data view of a round captured once per frame. The
//! presentation layer turns these values into shapes, text and sprites; the
//! core exposes nothing beyond each destination's declared name and color.

use serde::Serialize;

use crate::sim::destination::Destination;
use crate::sim::parcel::Parcel;
use crate::sim::state::{GamePhase, GameState};

/// A pending schedule entry for list display.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleView {
    /// Destination that will start loading
    pub destination: Destination,
    /// Seconds until it does
    pub time_until_arrival: f32,
}

/// One output bay.
#[derive(Debug, Clone, Serialize)]
pub struct OutputView {
    /// Active destination, if any
    pub destination: Option<Destination>,
    /// Seconds until the truck leaves; 0 while empty
    pub time_until_departure: f32,
}

/// One parcel, wherever it sits.
#[derive(Debug, Clone, Serialize)]
pub struct ParcelView {
    /// Stable parcel id
    pub id: u32,
    /// Where it wants to go
    pub destination: Destination,
    /// Highlightable top-of-lane flag
    pub on_top_of_stack: bool,
    /// True for the player's current selection
    pub selected: bool,
}

/// The input belt.
#[derive(Debug, Clone, Serialize)]
pub struct InputLaneView {
    /// Parcel in transit
    pub parcel: ParcelView,
    /// Travel progress in [0, 1]
    pub progress: f32,
}

/// Everything a frame needs to draw.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Menu, running or game over
    pub phase: GamePhase,
    /// Remaining round time, clamped to zero for display
    pub time_left: f32,
    /// Parcels delivered so far
    pub score: u32,
    /// Pending arrivals, longest wait first (display order)
    pub schedule: Vec<ScheduleView>,
    /// Receiving bays, by slot index
    pub outputs: Vec<OutputView>,
    /// Stack lanes, each bottom first
    pub lanes: Vec<Vec<ParcelView>>,
    /// Input belt, when a parcel is in transit
    pub input: Option<InputLaneView>,
    /// Size of the destination pool currently in play
    pub active_destinations: usize,
}

impl Snapshot {
    /// Capture the current frame.
    pub fn capture(state: &GameState) -> Self {
        let selected = state.selected_id();
        let view = |parcel: &Parcel| ParcelView {
            id: parcel.id,
            destination: parcel.destination,
            on_top_of_stack: parcel.on_top_of_stack,
            selected: selected == Some(parcel.id),
        };

        let mut schedule: Vec<ScheduleView> = state
            .scheduler
            .entries()
            .iter()
            .map(|entry| ScheduleView {
                destination: entry.destination,
                time_until_arrival: entry.time_until_arrival,
            })
            .collect();
        schedule.sort_by(|a, b| b.time_until_arrival.total_cmp(&a.time_until_arrival));

        Snapshot {
            phase: state.phase,
            time_left: state.clock.time_left().max(0.0),
            score: state.score,
            schedule,
            outputs: state
                .outputs
                .iter()
                .map(|output| OutputView {
                    destination: output.destination(),
                    time_until_departure: output.time_left(),
                })
                .collect(),
            lanes: state
                .stacks
                .lanes()
                .iter()
                .map(|lane| lane.iter().map(view).collect())
                .collect(),
            input: state.input_lane.parcel().map(|parcel| InputLaneView {
                parcel: view(parcel),
                progress: state.input_lane.progress(),
            }),
            active_destinations: state.active_destinations,
        }
    }
}
