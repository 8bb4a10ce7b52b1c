//! Fixed timestep simulation tick for the lane runner
//!
//! Order inside one tick: pending intents, jump arc, motion, accrual, spawn,
//! collision, progression.

use super::state::{GameEvent, GamePhase, GameState};
use super::{collision, motion, progression, spawn};

/// Discrete control commands accepted by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Jump,
}

impl Command {
    /// Map a DOM `KeyboardEvent.key` value to a command
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Command::MoveLeft),
            "ArrowRight" | "d" | "D" => Some(Command::MoveRight),
            " " | "Space" | "ArrowUp" | "w" | "W" => Some(Command::Jump),
            _ => None,
        }
    }
}

/// Intents latched between ticks; consumed at the start of the next tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
}

impl TickInput {
    pub fn push(&mut self, command: Command) {
        match command {
            Command::MoveLeft => self.move_left = true,
            Command::MoveRight => self.move_right = true,
            Command::Jump => self.jump = true,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.move_left || self.move_right || self.jump)
    }
}

/// Advance the runner by one timestep.
///
/// Does nothing unless the session is Running and `dt` is a positive finite
/// number.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Running || !(dt.is_finite() && dt > 0.0) {
        return events;
    }

    state.time_ticks += 1;

    apply_intents(state, input, &mut events);
    update_jump(state, dt, &mut events);

    motion::advance(
        &mut state.objects,
        state.actor.speed,
        dt,
        state.tuning.despawn_position,
    );

    state.actor.distance += state.tuning.distance_rate * dt;
    state.score_carry += state.tuning.score_rate * dt;
    let whole = state.score_carry.floor();
    state.actor.score += whole as u64;
    state.score_carry -= whole;

    spawn::spawn_tick(state, dt, &mut events);
    collision::resolve(state, &mut events);

    if state.phase == GamePhase::Running {
        state.actor.speed =
            progression::next_speed(&state.tuning, state.actor.speed, state.actor.distance);
    }

    events
}

/// Apply lane changes (within the lane set) and jump requests (ignored while airborne)
fn apply_intents(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    let delta = input.move_right as i32 - input.move_left as i32;
    if delta != 0 {
        let lane = state.tuning.step_lane(state.actor.lane, delta);
        if lane != state.actor.lane {
            state.actor.lane = lane;
            events.push(GameEvent::LaneChanged { lane });
        }
    }

    if input.jump && state.actor.is_grounded() {
        state.actor.airborne = true;
        state.actor.rising = true;
        events.push(GameEvent::Jumped);
    }
}

/// Linear jump arc: rise to the apex, fall back, land exactly on 0
fn update_jump(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    let actor = &mut state.actor;
    if !actor.airborne {
        actor.vertical_offset = 0.0;
        return;
    }

    let step = state.tuning.jump_speed * dt;
    if actor.rising {
        actor.vertical_offset = (actor.vertical_offset + step).min(state.tuning.jump_apex);
        if actor.vertical_offset >= state.tuning.jump_apex {
            actor.rising = false;
        }
    } else {
        actor.vertical_offset -= step;
        if actor.vertical_offset <= 0.0 {
            actor.vertical_offset = 0.0;
            actor.airborne = false;
            events.push(GameEvent::Landed);
        }
    }
}
