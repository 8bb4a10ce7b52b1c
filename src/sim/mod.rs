//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of objects)
//! - No rendering or platform dependencies

pub mod arena;
pub mod autopilot;
pub mod collision;
pub mod driver;
pub mod motion;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod tick;

pub use arena::{ArenaInput, ArenaSnapshot, ArenaState};
pub use autopilot::Autopilot;
pub use driver::{LoopDriver, Simulation};
pub use state::{
    ActorState, GameEvent, GamePhase, GameState, MAX_HEALTH, ObjectKind, PickupKind,
    RunnerSnapshot, TransientObject,
};
pub use tick::{Command, TickInput, tick};
