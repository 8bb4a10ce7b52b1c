//! Eclipse Realms - mini-game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (lane runner, arena shooter, loop driver)
//! - `tuning`: Data-driven game balance
//! - `settings`: Persisted player preferences
//! - `notify`: Toast-style notifications derived from game events
//! - `checkout`: Typed boundary to the hosted checkout flow
//! - `web`: Browser adapter (wasm32 only)

pub mod checkout;
pub mod notify;
pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use checkout::{CheckoutError, ProductTier};
pub use notify::{Notification, Notifier};
pub use settings::{GameMode, Settings};
pub use tuning::{ArenaTuning, Difficulty, Tuning};

/// Game loop constants
pub mod consts {
    /// Fixed runner timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the accumulator accepts (tab switches, debugger pauses)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Fixed arena timestep (20 Hz)
    pub const ARENA_DT: f32 = 1.0 / 20.0;
}
