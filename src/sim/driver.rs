//! Loop driver shared by every mini-game
//!
//! Owns one `Simulation`, the latched input, the fixed-step accumulator and
//! the event queue. The phase machine lives here:
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            v
//!          Ended  (only via health reaching 0 inside a step)
//! ```
//!
//! `reset()` returns any phase to Idle.

use super::state::{GameEvent, GamePhase, GameState, RunnerSnapshot};
use super::tick::{self, Command, TickInput};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// A mini-game the driver can step
pub trait Simulation {
    /// Per-tick control input
    type Input: Default + Clone;
    /// Read-only view for the renderer
    type Snapshot;

    /// Fixed step length in seconds
    fn fixed_dt(&self) -> f32;
    fn phase(&self) -> GamePhase;
    fn set_phase(&mut self, phase: GamePhase);
    /// One fixed step. Must be a no-op unless Running.
    fn step(&mut self, input: &Self::Input, dt: f32) -> Vec<GameEvent>;
    /// Back to Idle with default state
    fn reset(&mut self);
    fn snapshot(&self) -> Self::Snapshot;
    /// Drop one-shot intents after a step consumed them
    fn clear_one_shot(input: &mut Self::Input);
}

impl Simulation for GameState {
    type Input = TickInput;
    type Snapshot = RunnerSnapshot;

    fn fixed_dt(&self) -> f32 {
        SIM_DT
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
    }

    fn step(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        tick::tick(self, input, dt)
    }

    fn reset(&mut self) {
        GameState::reset(self);
    }

    fn snapshot(&self) -> RunnerSnapshot {
        GameState::snapshot(self)
    }

    fn clear_one_shot(input: &mut TickInput) {
        *input = TickInput::default();
    }
}

/// Frame-driven wrapper around a simulation
pub struct LoopDriver<S: Simulation> {
    sim: S,
    input: S::Input,
    accumulator: f32,
    events: Vec<GameEvent>,
}

impl<S: Simulation> LoopDriver<S> {
    pub fn new(sim: S) -> Self {
        Self {
            sim,
            input: S::Input::default(),
            accumulator: 0.0,
            events: Vec::new(),
        }
    }

    pub fn sim(&self) -> &S {
        &self.sim
    }

    /// Direct access for scripted setups and tests
    pub fn sim_mut(&mut self) -> &mut S {
        &mut self.sim
    }

    pub fn phase(&self) -> GamePhase {
        self.sim.phase()
    }

    pub fn is_running(&self) -> bool {
        self.sim.phase() == GamePhase::Running
    }

    pub fn input(&self) -> &S::Input {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut S::Input {
        &mut self.input
    }

    /// Idle or Paused -> Running. No-op when Running or Ended.
    pub fn start(&mut self) {
        match self.sim.phase() {
            GamePhase::Idle => {
                self.sim.set_phase(GamePhase::Running);
                self.events.push(GameEvent::Started);
                log::info!("Game started");
            }
            GamePhase::Paused => {
                self.sim.set_phase(GamePhase::Running);
                self.events.push(GameEvent::Resumed);
                log::info!("Game resumed");
            }
            GamePhase::Running | GamePhase::Ended => {}
        }
    }

    /// Running -> Paused. Any other phase is left alone, so repeated calls
    /// are harmless.
    pub fn stop(&mut self) {
        if self.sim.phase() == GamePhase::Running {
            self.sim.set_phase(GamePhase::Paused);
            self.accumulator = 0.0;
            self.events.push(GameEvent::Paused);
            log::info!("Game paused");
        }
    }

    /// Any phase -> Idle with fresh state
    pub fn reset(&mut self) {
        self.sim.reset();
        self.input = S::Input::default();
        self.accumulator = 0.0;
        self.events.push(GameEvent::Reset);
        log::info!("Game reset");
    }

    /// Run exactly one step of `dt` seconds if Running
    pub fn step(&mut self, dt: f32) {
        if !self.is_running() || !(dt.is_finite() && dt > 0.0) {
            return;
        }
        let events = self.sim.step(&self.input, dt);
        S::clear_one_shot(&mut self.input);
        self.events.extend(events);
    }

    /// Feed one display frame of `elapsed` seconds.
    ///
    /// Runs as many fixed steps as the accumulated time allows, up to
    /// `MAX_SUBSTEPS`, and stops as soon as the phase leaves Running.
    /// Returns the number of steps taken.
    pub fn frame(&mut self, elapsed: f32) -> u32 {
        if !(elapsed.is_finite() && elapsed > 0.0) {
            return 0;
        }
        if !self.is_running() {
            self.accumulator = 0.0;
            return 0;
        }

        let dt = self.sim.fixed_dt();
        self.accumulator += elapsed.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= dt && substeps < MAX_SUBSTEPS {
            self.step(dt);
            self.accumulator -= dt;
            substeps += 1;
            if !self.is_running() {
                self.accumulator = 0.0;
                break;
            }
        }

        // Drop the backlog instead of spiralling
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(dt);
        }

        substeps
    }

    /// Take every event produced since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> S::Snapshot {
        self.sim.snapshot()
    }
}

impl LoopDriver<GameState> {
    /// Latch a runner command for the next step. Ignored unless Running.
    pub fn command(&mut self, command: Command) {
        if self.is_running() {
            self.input.push(command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObjectKind;
    use crate::tuning::Tuning;

    fn quiet_driver() -> LoopDriver<GameState> {
        let mut tuning = Tuning::classic();
        tuning.spawns.clear();
        LoopDriver::new(GameState::new(1, tuning))
    }

    #[test]
    fn test_phase_machine() {
        let mut driver = quiet_driver();
        assert_eq!(driver.phase(), GamePhase::Idle);

        driver.stop();
        assert_eq!(driver.phase(), GamePhase::Idle);

        driver.start();
        assert_eq!(driver.phase(), GamePhase::Running);
        driver.start();
        assert_eq!(driver.phase(), GamePhase::Running);

        driver.stop();
        assert_eq!(driver.phase(), GamePhase::Paused);
        driver.start();
        assert_eq!(driver.phase(), GamePhase::Running);

        assert_eq!(
            driver.drain_events(),
            vec![GameEvent::Started, GameEvent::Paused, GameEvent::Resumed]
        );
    }

    #[test]
    fn test_ended_is_terminal_until_reset() {
        let mut driver = quiet_driver();
        driver.start();
        driver.sim_mut().actor.health = 10;
        driver.sim_mut().insert_object(ObjectKind::Hazard, 0, 0.0);
        driver.step(SIM_DT);
        assert_eq!(driver.phase(), GamePhase::Ended);

        driver.start();
        driver.stop();
        assert_eq!(driver.phase(), GamePhase::Ended);

        driver.reset();
        assert_eq!(driver.phase(), GamePhase::Idle);
        assert_eq!(driver.sim().actor.health, 100);
    }

    #[test]
    fn test_frame_runs_fixed_substeps() {
        let mut driver = quiet_driver();
        driver.start();
        let steps = driver.frame(SIM_DT * 3.5);
        assert_eq!(steps, 3);
        assert_eq!(driver.sim().time_ticks, 3);
        // Leftover half step carries into the next frame
        assert_eq!(driver.frame(SIM_DT * 0.75), 1);
        assert_eq!(driver.sim().time_ticks, 4);
    }

    #[test]
    fn test_frame_caps_substeps() {
        let mut driver = quiet_driver();
        driver.start();
        assert_eq!(driver.frame(10.0), MAX_SUBSTEPS);
        assert!(driver.frame(SIM_DT * 0.5) <= 1);
    }

    #[test]
    fn test_no_steps_when_paused() {
        let mut driver = quiet_driver();
        driver.start();
        driver.stop();
        assert_eq!(driver.frame(0.05), 0);
        driver.step(SIM_DT);
        assert_eq!(driver.sim().time_ticks, 0);
    }

    #[test]
    fn test_frame_stops_after_game_over() {
        let mut driver = quiet_driver();
        driver.start();
        driver.sim_mut().actor.health = 5;
        driver.sim_mut().insert_object(ObjectKind::Obstacle, 0, 0.0);
        let steps = driver.frame(0.05);
        assert_eq!(steps, 1);
        assert_eq!(driver.phase(), GamePhase::Ended);
    }

    #[test]
    fn test_commands_are_one_shot() {
        let mut driver = quiet_driver();
        driver.command(Command::MoveLeft);
        assert!(driver.input().is_empty());

        driver.start();
        driver.command(Command::MoveLeft);
        driver.step(SIM_DT);
        assert_eq!(driver.sim().actor.lane, -1);
        assert!(driver.input().is_empty());

        driver.command(Command::MoveRight);
        driver.command(Command::MoveRight);
        driver.step(SIM_DT);
        assert_eq!(driver.sim().actor.lane, 0);
    }
}
