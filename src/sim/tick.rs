//! Per-frame round protocol
//!
//! Advances the round one frame: component timers, destination unlocks,
//! parcel spawning, schedule replenishment, arrival assignment and the loss
//! check, plus resolution of the queued player click.

use rand::Rng;

use crate::consts::*;

use super::SimError;
use super::destination::{CATALOG, Destination};
use super::parcel::Parcel;
use super::state::{GameEvent, GamePhase, GameState};

/// Input for a single tick.
///
/// At most one discrete click is applied per frame; the presentation layer
/// queues a click and clears it after the tick consumes it.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Queued click, consumed at the start of the update
    pub action: Option<PlayerAction>,
    /// Start or restart the round (menu / game-over screens)
    pub start: bool,
}

/// A discrete click forwarded by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Click on a parcel, on the belt or on top of a stack lane
    SelectParcel(u32),
    /// Click on a stack lane: pick up its top, or place the selection
    SelectStackLane(usize),
    /// Click on an output bay: deliver the selection if it matches
    SelectOutput(usize),
}

/// (Re)initialize the round and enter `Running`.
///
/// Fills the schedule to cap and puts the first parcel on the belt so the
/// opening frame already has work in flight.
pub fn start_round(state: &mut GameState) {
    state.clock.set_deadline(ROUND_TIME_SECS);
    state.score = 0;
    state.scheduler.clear();
    state.stacks.clear();
    let _ = state.input_lane.despawn();
    for output in &mut state.outputs {
        output.clear_destination();
    }
    state.selected = None;
    state.active_destinations = INITIAL_ACTIVE_DESTINATIONS;
    state.phase = GamePhase::Running;

    while state.scheduler.len() < SCHEDULER_CAP {
        replenish_one(state);
    }
    spawn_parcel(state);

    log::info!("round started (seed {})", state.seed);
}

/// Advance the round by one frame.
///
/// Order while `Running`: player action, component timers, destination
/// unlocks, parcel spawn, schedule replenishment, arrival assignment, loss
/// check. Nothing ticks in `Menu` or `GameOver`.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.start && state.phase != GamePhase::Running {
        start_round(state);
    }
    if state.phase != GamePhase::Running {
        return;
    }

    if let Some(action) = input.action {
        if let Err(err) = apply_action(state, action) {
            log::debug!("ignored action {action:?}: {err}");
        }
    }

    state.input_lane.tick(dt);
    state.clock.tick(dt);
    let arrivals = state.scheduler.tick(dt);

    let mut expired = Vec::new();
    for (slot, output) in state.outputs.iter_mut().enumerate() {
        if let Some(destination) = output.tick(dt) {
            expired.push((slot, destination));
        }
    }
    for (slot, destination) in expired {
        state.push_event(GameEvent::OutputExpired { slot, destination });
    }

    update_unlocks(state);

    state.spawn_cooldown = (state.spawn_cooldown - dt).max(0.0);
    if !state.input_lane.has_parcel() && state.spawn_cooldown <= 0.0 {
        spawn_parcel(state);
    }

    while state.scheduler.len() < SCHEDULER_CAP {
        replenish_one(state);
    }

    for destination in arrivals {
        match state.outputs.iter().position(|o| !o.is_occupied()) {
            Some(slot) => {
                state.outputs[slot].set_destination(destination);
                state.push_event(GameEvent::OutputActivated { slot, destination });
            }
            // all bays busy: the arrival is dropped, no retry or backlog
            None => log::debug!("arrival for {} dropped, all bays busy", destination.code),
        }
    }

    if state.clock.time_left() <= 0.0 {
        state.clock.set_deadline(0.0);
        state.phase = GamePhase::GameOver;
        state.selected = None;
        state.push_event(GameEvent::RoundOver { score: state.score });
        log::info!("round over, delivered {}", state.score);
    }
}

/// Enlarge the active destination pool as remaining time crosses the unlock
/// thresholds. Difficulty ramps by widening the eligible set, not by speed.
fn update_unlocks(state: &mut GameState) {
    let fraction = state.clock.time_left() / ROUND_TIME_SECS;
    let crossed = UNLOCK_THRESHOLDS.iter().filter(|&&t| fraction <= t).count();
    let unlocked = (INITIAL_ACTIVE_DESTINATIONS + crossed).min(CATALOG.len());
    if unlocked > state.active_destinations {
        log::debug!("destinations in play: {unlocked}");
        state.active_destinations = unlocked;
    }
}

/// Spawn a new parcel onto the belt, destination drawn uniformly from the
/// active pool, and rearm the spawn cooldown.
fn spawn_parcel(state: &mut GameState) {
    if let Ok(destination) = Destination::random_from(&mut state.rng, state.active_destinations) {
        let id = state.next_entity_id();
        if state.input_lane.spawn(Parcel::new(id, destination)).is_ok() {
            state.spawn_cooldown = SPAWN_INTERVAL_SECS;
        }
    }
}

/// Add one scheduler entry behind the latest pending arrival: at least the
/// minimum gap out, plus additive jitter. The destination of the
/// nearest-arriving pending entry is excluded so the same bay never lights
/// up twice back to back.
fn replenish_one(state: &mut GameState) {
    let base = state.scheduler.max_pending();
    let jitter = state.rng.random_range(0.0..SCHEDULE_JITTER_SECS);
    let destination = pick_scheduled_destination(state);
    state
        .scheduler
        .add_entry(base + SCHEDULE_MIN_GAP_SECS + jitter, destination);
}

fn pick_scheduled_destination(state: &mut GameState) -> Destination {
    let active = state.active_destinations;
    let excluded = state
        .scheduler
        .next_arrival()
        .and_then(|entry| CATALOG[..active].iter().position(|d| *d == entry.destination));
    match excluded {
        Some(skip) if active > 1 => {
            // uniform over the active pool minus the excluded entry
            let mut index = state.rng.random_range(0..active - 1);
            if index >= skip {
                index += 1;
            }
            CATALOG[index]
        }
        _ => CATALOG[state.rng.random_range(0..active)],
    }
}

fn apply_action(state: &mut GameState, action: PlayerAction) -> Result<(), SimError> {
    match action {
        PlayerAction::SelectParcel(id) => select_parcel(state, id),
        PlayerAction::SelectStackLane(lane) => select_stack_lane(state, lane),
        PlayerAction::SelectOutput(slot) => select_output(state, slot),
    }
}

/// Only the belt parcel and stack tops are selectable; clicks on buried
/// parcels fall through without clearing the current selection.
fn select_parcel(state: &mut GameState, id: u32) -> Result<(), SimError> {
    let selectable = state.input_lane.parcel().is_some_and(|p| p.id == id)
        || state.stacks.top_lane_of(id).is_some();
    if selectable {
        state.selected = Some(id);
    }
    Ok(())
}

/// Without a selection, pick up the lane's top parcel. With one, the lane
/// is a placement target: the selection moves there and is cleared.
fn select_stack_lane(state: &mut GameState, lane: usize) -> Result<(), SimError> {
    match state.selected {
        None => {
            if let Some(top) = state.stacks.peek_top(lane)? {
                state.selected = Some(top.id);
            }
            Ok(())
        }
        Some(id) => {
            // validate the target before lifting the parcel out of its origin
            let _ = state.stacks.peek_top(lane)?;
            if let Some(parcel) = remove_selected(state, id) {
                state.stacks.push(lane, parcel)?;
            }
            state.selected = None;
            Ok(())
        }
    }
}

/// Deliver the selection to the bay if the destination matches; otherwise
/// the click is a no-op and the parcel stays selected.
fn select_output(state: &mut GameState, slot: usize) -> Result<(), SimError> {
    let Some(id) = state.selected else {
        return Ok(());
    };
    if slot >= state.outputs.len() {
        return Ok(());
    }
    let Some(parcel) = state.selected_parcel() else {
        state.selected = None;
        return Ok(());
    };
    if !state.outputs[slot].accepts(parcel) {
        return Ok(());
    }
    let destination = parcel.destination;
    if remove_selected(state, id).is_some() {
        state.outputs[slot].clear_destination();
        state.score += SCORE_PER_DELIVERY;
        state.push_event(GameEvent::Delivered { slot, destination });
    }
    state.selected = None;
    Ok(())
}

/// Lift the selected parcel out of wherever it resides.
fn remove_selected(state: &mut GameState, id: u32) -> Option<Parcel> {
    if state.input_lane.parcel().is_some_and(|p| p.id == id) {
        return state.input_lane.despawn().ok();
    }
    let lane = state.stacks.top_lane_of(id)?;
    state.stacks.pop(lane).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;

    fn started(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        start_round(&mut state);
        state
    }

    fn input_parcel_id(state: &GameState) -> u32 {
        state.input_lane.parcel().map(|p| p.id).unwrap()
    }

    fn click(action: PlayerAction) -> TickInput {
        TickInput {
            action: Some(action),
            ..Default::default()
        }
    }

    #[test]
    fn test_start_round_initializes() {
        let state = started(7);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.scheduler.len(), SCHEDULER_CAP);
        assert!(state.input_lane.has_parcel());
        assert_eq!(state.active_destinations, INITIAL_ACTIVE_DESTINATIONS);
        assert!((state.clock.time_left() - ROUND_TIME_SECS).abs() < 1e-6);
    }

    #[test]
    fn test_menu_does_not_tick() {
        let mut state = GameState::new(7);
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!((state.clock.time_left() - ROUND_TIME_SECS).abs() < 1e-6);
        assert!(!state.input_lane.has_parcel());
        assert!(state.scheduler.is_empty());
    }

    #[test]
    fn test_first_scheduled_entry_window() {
        let mut state = GameState::new(7);
        state.phase = GamePhase::Running;
        replenish_one(&mut state);
        assert_eq!(state.scheduler.len(), 1);
        let t = state.scheduler.entries()[0].time_until_arrival;
        assert!(t >= SCHEDULE_MIN_GAP_SECS);
        assert!(t < SCHEDULE_MIN_GAP_SECS + SCHEDULE_JITTER_SECS);
    }

    #[test]
    fn test_entries_stack_behind_latest_arrival() {
        let mut state = GameState::new(7);
        replenish_one(&mut state);
        replenish_one(&mut state);
        let first = state.scheduler.entries()[0].time_until_arrival;
        let second = state.scheduler.entries()[1].time_until_arrival;
        assert!(second >= first + SCHEDULE_MIN_GAP_SECS);
    }

    #[test]
    fn test_no_back_to_back_destination() {
        let mut state = GameState::new(42);
        for _ in 0..50 {
            state.scheduler.clear();
            replenish_one(&mut state);
            let first = state.scheduler.entries()[0].destination;
            replenish_one(&mut state);
            let second = state.scheduler.entries()[1].destination;
            assert_ne!(first, second);
        }
    }

    #[test]
    fn test_arrival_occupies_first_free_bay() {
        let mut state = started(9);
        state.scheduler.clear();
        state.scheduler.add_entry(0.5, CATALOG[2]);
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.outputs[0].destination(), Some(CATALOG[2]));
        let events = state.take_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::OutputActivated { slot: 0, .. }))
        );
    }

    #[test]
    fn test_arrival_dropped_when_bays_full() {
        let mut state = started(9);
        for output in &mut state.outputs {
            output.set_destination(CATALOG[0]);
        }
        state.scheduler.clear();
        state.scheduler.add_entry(0.5, CATALOG[3]);
        tick(&mut state, &TickInput::default(), 1.0);

        assert!(
            state
                .outputs
                .iter()
                .all(|o| o.destination() == Some(CATALOG[0]))
        );
        // entry consumed, nothing queued again in its place for the bay
        assert!(
            state
                .scheduler
                .entries()
                .iter()
                .all(|e| e.time_until_arrival > 0.0)
        );
        let events = state.take_events();
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::OutputActivated { .. }))
        );
    }

    #[test]
    fn test_output_expiry_reports_event() {
        let mut state = started(10);
        state.outputs[2].set_destination(CATALOG[1]);
        tick(&mut state, &TickInput::default(), EXIT_TIME_SECS + 0.1);
        assert!(!state.outputs[2].is_occupied());
        let events = state.take_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::OutputExpired { slot: 2, .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_delivery_flow() {
        let mut state = started(11);
        let parcel_id = input_parcel_id(&state);
        let destination = state.input_lane.parcel().unwrap().destination;
        state.outputs[1].set_destination(destination);

        tick(&mut state, &click(PlayerAction::SelectParcel(parcel_id)), 0.0);
        assert_eq!(state.selected_parcel().map(|p| p.id), Some(parcel_id));

        tick(&mut state, &click(PlayerAction::SelectOutput(1)), 0.0);
        assert_eq!(state.score, 1);
        assert!(!state.outputs[1].is_occupied());
        assert!(!state.input_lane.has_parcel());
        assert!(state.selected_parcel().is_none());
        let events = state.take_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::Delivered { slot: 1, .. }))
                .count(),
            1
        );
    }

    #[test]
    fn test_wrong_destination_is_noop() {
        let mut state = started(13);
        let parcel_id = input_parcel_id(&state);
        let destination = state.input_lane.parcel().unwrap().destination;
        let other = CATALOG.iter().copied().find(|d| *d != destination).unwrap();
        state.outputs[0].set_destination(other);

        tick(&mut state, &click(PlayerAction::SelectParcel(parcel_id)), 0.0);
        tick(&mut state, &click(PlayerAction::SelectOutput(0)), 0.0);

        assert_eq!(state.score, 0);
        assert!(state.outputs[0].is_occupied());
        assert!(state.input_lane.has_parcel());
        assert_eq!(state.selected_parcel().map(|p| p.id), Some(parcel_id));
    }

    #[test]
    fn test_unoccupied_bay_is_noop() {
        let mut state = started(13);
        let parcel_id = input_parcel_id(&state);
        tick(&mut state, &click(PlayerAction::SelectParcel(parcel_id)), 0.0);
        tick(&mut state, &click(PlayerAction::SelectOutput(0)), 0.0);
        assert_eq!(state.score, 0);
        assert_eq!(state.selected_parcel().map(|p| p.id), Some(parcel_id));
    }

    #[test]
    fn test_stack_pickup_and_place() {
        let mut state = started(17);
        let parcel_id = input_parcel_id(&state);

        tick(&mut state, &click(PlayerAction::SelectParcel(parcel_id)), 0.0);
        tick(&mut state, &click(PlayerAction::SelectStackLane(2)), 0.0);
        assert!(state.selected_parcel().is_none());
        assert_eq!(state.stacks.peek_top(2).unwrap().map(|p| p.id), Some(parcel_id));

        // clicking the lane with no selection picks its top back up
        tick(&mut state, &click(PlayerAction::SelectStackLane(2)), 0.0);
        assert_eq!(state.selected_parcel().map(|p| p.id), Some(parcel_id));

        // and the next lane click places it there
        tick(&mut state, &click(PlayerAction::SelectStackLane(0)), 0.0);
        assert_eq!(state.stacks.peek_top(0).unwrap().map(|p| p.id), Some(parcel_id));
        assert!(state.stacks.peek_top(2).unwrap().is_none());
        assert!(state.selected_parcel().is_none());
    }

    #[test]
    fn test_buried_parcel_not_selectable() {
        let mut state = started(19);
        let first = input_parcel_id(&state);
        tick(&mut state, &click(PlayerAction::SelectParcel(first)), 0.0);
        tick(&mut state, &click(PlayerAction::SelectStackLane(0)), 0.0);

        // wait out the spawn cooldown for the next parcel
        for _ in 0..150 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let second = input_parcel_id(&state);
        tick(&mut state, &click(PlayerAction::SelectParcel(second)), 0.0);
        tick(&mut state, &click(PlayerAction::SelectStackLane(0)), 0.0);

        // `first` is buried under `second` now
        tick(&mut state, &click(PlayerAction::SelectParcel(first)), 0.0);
        assert!(state.selected_parcel().is_none());
        tick(&mut state, &click(PlayerAction::SelectParcel(second)), 0.0);
        assert_eq!(state.selected_parcel().map(|p| p.id), Some(second));
    }

    #[test]
    fn test_spawn_cooldown_gates_respawn() {
        let mut state = started(43);
        let parcel_id = input_parcel_id(&state);
        tick(&mut state, &click(PlayerAction::SelectParcel(parcel_id)), 0.0);
        tick(&mut state, &click(PlayerAction::SelectStackLane(0)), 0.0);
        assert!(!state.input_lane.has_parcel());

        // half the interval: still empty
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(!state.input_lane.has_parcel());

        for _ in 0..100 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(state.input_lane.has_parcel());
    }

    #[test]
    fn test_unlocks_follow_thresholds() {
        let mut state = started(41);
        assert_eq!(state.active_destinations, INITIAL_ACTIVE_DESTINATIONS);

        state.clock.set_deadline(ROUND_TIME_SECS * 0.6);
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.active_destinations, INITIAL_ACTIVE_DESTINATIONS + 1);

        state.clock.set_deadline(ROUND_TIME_SECS * 0.2);
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.active_destinations, CATALOG.len());
    }

    #[test]
    fn test_game_over_freezes() {
        let mut state = started(23);
        state.clock.set_deadline(0.05);
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.take_events();
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::RoundOver { score: 0 }))
        );

        assert_eq!(state.clock.time_left(), 0.0);
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.clock.time_left(), 0.0);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_restart_from_game_over() {
        let mut state = started(29);
        state.clock.set_deadline(0.01);
        tick(&mut state, &TickInput::default(), 1.0);
        assert_eq!(state.phase, GamePhase::GameOver);

        let restart = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &restart, 0.0);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.scheduler.len(), SCHEDULER_CAP);
        assert!((state.clock.time_left() - ROUND_TIME_SECS).abs() < 1e-6);
    }

    #[test]
    fn test_start_ignored_while_running() {
        let mut state = started(31);
        state.score = 5;
        let restart = TickInput {
            start: true,
            ..Default::default()
        };
        tick(&mut state, &restart, 0.0);
        assert_eq!(state.score, 5);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_tick_zero_is_idempotent() {
        let mut state = started(37);
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let _ = state.take_events();

        let before = serde_json::to_string(&Snapshot::capture(&state)).unwrap();
        for _ in 0..5 {
            tick(&mut state, &TickInput::default(), 0.0);
        }
        let after = serde_json::to_string(&Snapshot::capture(&state)).unwrap();
        assert_eq!(before, after);
        assert!(state.take_events().is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = started(99999);
        let mut b = started(99999);
        for frame in 0..1200 {
            // stack the belt parcel every few seconds on both runs
            let action = if frame % 240 == 120 {
                a.input_lane.parcel().map(|p| PlayerAction::SelectParcel(p.id))
            } else if frame % 240 == 121 {
                Some(PlayerAction::SelectStackLane((frame / 240) % STACK_LANES))
            } else {
                None
            };
            let input = TickInput {
                action,
                ..Default::default()
            };
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        let snap_a = serde_json::to_string(&Snapshot::capture(&a)).unwrap();
        let snap_b = serde_json::to_string(&Snapshot::capture(&b)).unwrap();
        assert_eq!(snap_a, snap_b);
    }
}
