//! Parcel Mover headless demo
//!
//! Runs one scripted round at the fixed timestep: a trivial bot delivers
//! parcels whose destination is loading somewhere and stacks the rest.
//! Useful for watching a round unfold in the log and for exercising the
//! public surface end to end. Pass a seed as the first argument to replay a
//! specific round.

use std::collections::VecDeque;

use parcel_mover::consts::SIM_DT;
use parcel_mover::sim::{GameEvent, GamePhase, GameState, PlayerAction, TickInput, tick};
use parcel_mover::snapshot::Snapshot;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0x5EED);
    let mut state = GameState::new(seed);
    let mut planned: VecDeque<PlayerAction> = VecDeque::new();
    let mut input = TickInput {
        start: true,
        ..Default::default()
    };

    loop {
        tick(&mut state, &input, SIM_DT);

        for event in state.take_events() {
            match event {
                GameEvent::OutputActivated { slot, destination } => {
                    log::info!("bay {slot} now loading for {}", destination.name);
                }
                GameEvent::OutputExpired { slot, destination } => {
                    log::info!("truck for {} left bay {slot} empty", destination.name);
                }
                GameEvent::Delivered { slot, destination } => {
                    log::info!("delivered a {} parcel at bay {slot}", destination.code);
                }
                GameEvent::RoundOver { score } => {
                    log::info!("shift done: {score} parcels delivered");
                }
            }
        }

        if state.phase == GamePhase::GameOver {
            break;
        }
        if planned.is_empty() {
            plan(&state, &mut planned);
        }
        input = TickInput {
            action: planned.pop_front(),
            start: false,
        };
    }

    match serde_json::to_string_pretty(&Snapshot::capture(&state)) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("snapshot serialization failed: {err}"),
    }
    println!("final score: {}", state.score);
}

/// Queue the next couple of clicks: deliver a parcel whose destination is
/// active on some bay, otherwise move the belt parcel onto the least loaded
/// stack lane.
fn plan(state: &GameState, planned: &mut VecDeque<PlayerAction>) {
    for (slot, output) in state.outputs.iter().enumerate() {
        let Some(destination) = output.destination() else {
            continue;
        };
        if let Some(parcel) = state
            .input_lane
            .parcel()
            .filter(|parcel| parcel.destination == destination)
        {
            planned.push_back(PlayerAction::SelectParcel(parcel.id));
            planned.push_back(PlayerAction::SelectOutput(slot));
            return;
        }
        for lane in state.stacks.lanes() {
            if let Some(top) = lane
                .last()
                .filter(|parcel| parcel.destination == destination)
            {
                planned.push_back(PlayerAction::SelectParcel(top.id));
                planned.push_back(PlayerAction::SelectOutput(slot));
                return;
            }
        }
    }

    if let Some(parcel) = state.input_lane.parcel() {
        let lane = state
            .stacks
            .lanes()
            .iter()
            .enumerate()
            .min_by_key(|(_, parcels)| parcels.len())
            .map(|(lane, _)| lane)
            .unwrap_or(0);
        planned.push_back(PlayerAction::SelectParcel(parcel.id));
        planned.push_back(PlayerAction::SelectStackLane(lane));
    }
}
