//! Game state and core simulation types
//!
//! Everything a runner session owns lives here: the actor, the transient
//! objects on the track, the phase, and the seeded RNG.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Upper bound for health in every mode
pub const MAX_HEALTH: u32 = 100;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Mounted, waiting for start
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Stopped by the player, resumable
    Paused,
    /// Health ran out; terminal until reset
    Ended,
}

/// What a transient object does when it touches the actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    Obstacle,
    Hazard,
    Collectible,
}

impl ObjectKind {
    /// Obstacles and hazards block a lane and deal damage
    pub fn is_blocking(&self) -> bool {
        matches!(self, ObjectKind::Obstacle | ObjectKind::Hazard)
    }
}

/// Arena orb types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Health,
    Energy,
}

/// The controllable runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    pub lane: i32,
    /// Height above the track (0 = grounded)
    pub vertical_offset: f32,
    pub airborne: bool,
    /// Ascending half of the jump arc
    pub rising: bool,
    pub health: u32,
    pub coins: u32,
    pub score: u64,
    pub distance: f32,
    pub speed: f32,
}

impl ActorState {
    pub fn new(base_speed: f32) -> Self {
        Self {
            lane: 0,
            vertical_offset: 0.0,
            airborne: false,
            rising: false,
            health: MAX_HEALTH,
            coins: 0,
            score: 0,
            distance: 0.0,
            speed: base_speed,
        }
    }

    pub fn is_grounded(&self) -> bool {
        !self.airborne && self.vertical_offset == 0.0
    }

    /// Apply damage, saturating at zero. Returns true if this hit emptied health.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.health > 0;
        self.health = self.health.saturating_sub(amount);
        was_alive && self.health == 0
    }
}

/// An obstacle, hazard or collectible travelling toward the actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransientObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub lane: i32,
    /// Distance ahead of the actor plane (negative = behind)
    pub position: f32,
    /// Position at the start of the last motion update
    pub previous_position: f32,
}

impl TransientObject {
    pub fn new(id: u32, kind: ObjectKind, lane: i32, position: f32) -> Self {
        Self {
            id,
            kind,
            lane,
            position,
            previous_position: position,
        }
    }
}

/// Events emitted during a simulation step.
/// The presentation layer turns these into notifications and sounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    Started,
    Paused,
    Resumed,
    Reset,
    LaneChanged { lane: i32 },
    Jumped,
    Landed,
    Spawned { id: u32, kind: ObjectKind, lane: i32 },
    /// Arena spawn; the arena has no lanes, so it reports where the object appeared
    ArenaSpawned { id: u32, kind: ObjectKind, pos: Vec2 },
    Damaged { amount: u32, health: u32 },
    CoinCollected { coins: u32, score: u64 },
    PickupCollected { kind: PickupKind, score: u64 },
    EnemiesDefeated { count: u32, score: u64 },
    LevelUp { level: u32 },
    /// Run over; `distance` is only tracked by the runner
    Ended { score: u64, distance: Option<f32> },
}

/// Read-only view handed to the renderer each frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunnerSnapshot {
    pub phase: GamePhase,
    pub actor: ActorState,
    pub objects: Vec<TransientObject>,
    pub lanes: Vec<i32>,
    pub time_ticks: u64,
}

/// Complete runner session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub actor: ActorState,
    /// Track objects, in spawn order
    pub objects: Vec<TransientObject>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Fractional score not yet credited
    pub(crate) score_carry: f32,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let actor = ActorState::new(tuning.base_speed);
        Self {
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            actor,
            objects: Vec::new(),
            time_ticks: 0,
            score_carry: 0.0,
            next_id: 1,
        }
    }

    /// Allocate a new object ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place an object directly on the track (tests, scripted sequences)
    pub fn insert_object(&mut self, kind: ObjectKind, lane: i32, position: f32) -> u32 {
        let id = self.next_entity_id();
        self.objects
            .push(TransientObject::new(id, kind, lane, position));
        id
    }

    /// Back to Idle with default actor and an empty track. The RNG keeps its
    /// stream so consecutive runs differ.
    pub fn reset(&mut self) {
        self.actor = ActorState::new(self.tuning.base_speed);
        self.objects.clear();
        self.phase = GamePhase::Idle;
        self.time_ticks = 0;
        self.score_carry = 0.0;
    }

    pub fn snapshot(&self) -> RunnerSnapshot {
        RunnerSnapshot {
            phase: self.phase,
            actor: self.actor.clone(),
            objects: self.objects.clone(),
            lanes: self.tuning.lanes.clone(),
            time_ticks: self.time_ticks,
        }
    }
}
