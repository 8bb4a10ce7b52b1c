//! Data-driven game balance
//!
//! Every constant the simulation reads lives here so the runner presets and the
//! arena can share one core. Rates are per second; the widgets these presets
//! come from ticked at 60 Hz (runner) and 20 Hz (arena).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::state::ObjectKind;

/// Errors raised when validating a tuning table.
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("lane set must contain at least one lane")]
    NoLanes,
    #[error("lane set must contain lane 0 (the starting lane)")]
    MissingCenterLane,
    #[error("lanes must be strictly ascending")]
    UnorderedLanes,
    #[error("{field} must be a finite non-negative number, got {value}")]
    InvalidValue { field: &'static str, value: f32 },
    #[error("base speed {base} exceeds max speed {max}")]
    SpeedBounds { base: f32, max: f32 },
    #[error("spawn position {start} for {kind:?} is not ahead of the proximity window")]
    SpawnInsideWindow { kind: ObjectKind, start: f32 },
}

/// Speed preset chosen on the selection screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Slow,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Slow => "slow",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "slow" | "easy" => Some(Difficulty::Slow),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier applied to both speed bounds
    pub fn speed_multiplier(&self) -> f32 {
        match self {
            Difficulty::Slow => 0.6,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.8,
        }
    }
}

/// One entry of the spawn table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRule {
    pub kind: ObjectKind,
    /// Expected spawns per second
    pub rate_per_sec: f32,
    /// Distance ahead of the actor plane where the object appears
    pub start_position: f32,
}

/// Balance table for the lane runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    /// Valid lane indices, ascending, must include 0
    pub lanes: Vec<i32>,
    pub spawns: Vec<SpawnRule>,
    /// Same-lane spacing below which a new spawn is skipped
    pub min_separation: f32,
    /// Objects behind this position are culled
    pub despawn_position: f32,
    /// Half-width of the collision window around the actor plane
    pub proximity_window: f32,
    /// Vertical offset at or above which obstacles and hazards miss
    pub clearance: f32,
    pub jump_speed: f32,
    pub jump_apex: f32,
    pub obstacle_damage: u32,
    pub hazard_damage: u32,
    pub coin_bonus: u64,
    /// Track units per second, before progression
    pub base_speed: f32,
    pub max_speed: f32,
    /// Distance needed for +1 speed
    pub speed_scale: f32,
    pub distance_rate: f32,
    pub score_rate: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self::classic()
    }
}

impl Tuning {
    /// Fast three-lane runner
    pub fn classic() -> Self {
        Self {
            lanes: vec![-1, 0, 1],
            spawns: vec![
                SpawnRule {
                    kind: ObjectKind::Obstacle,
                    rate_per_sec: 0.84,
                    start_position: 30.0,
                },
                SpawnRule {
                    kind: ObjectKind::Hazard,
                    rate_per_sec: 0.36,
                    start_position: 30.0,
                },
                SpawnRule {
                    kind: ObjectKind::Collectible,
                    rate_per_sec: 0.9,
                    start_position: 25.0,
                },
            ],
            min_separation: 6.0,
            despawn_position: -15.0,
            proximity_window: 2.0,
            clearance: 2.0,
            jump_speed: 18.0,
            jump_apex: 3.0,
            obstacle_damage: 25,
            hazard_damage: 25,
            coin_bonus: 50,
            base_speed: 120.0,
            max_speed: 480.0,
            speed_scale: 5.0 / 3.0,
            distance_rate: 30.0,
            score_rate: 60.0,
        }
    }

    /// Slower runner with a difficulty choice
    pub fn realms(difficulty: Difficulty) -> Self {
        let scale = difficulty.speed_multiplier();
        Self {
            lanes: vec![-1, 0, 1],
            spawns: vec![
                SpawnRule {
                    kind: ObjectKind::Obstacle,
                    rate_per_sec: 0.336,
                    start_position: 35.0,
                },
                SpawnRule {
                    kind: ObjectKind::Hazard,
                    rate_per_sec: 0.144,
                    start_position: 35.0,
                },
                SpawnRule {
                    kind: ObjectKind::Collectible,
                    rate_per_sec: 0.36,
                    start_position: 30.0,
                },
            ],
            min_separation: 6.0,
            despawn_position: -15.0,
            proximity_window: 2.0,
            clearance: 1.5,
            jump_speed: 9.0,
            jump_apex: 2.5,
            obstacle_damage: 20,
            hazard_damage: 20,
            coin_bonus: 100,
            base_speed: 38.4 * scale,
            max_speed: 144.0 * scale,
            speed_scale: 6.25,
            distance_rate: 12.0,
            score_rate: 60.0,
        }
    }

    /// Lane reached by moving `steps` places through the lane set from
    /// `lane`, stopping at either end. Always a member of `lanes` unless the
    /// set is empty.
    pub fn step_lane(&self, lane: i32, steps: i32) -> i32 {
        let Some(last) = self.lanes.len().checked_sub(1) else {
            return lane;
        };
        let index = match self.lanes.binary_search(&lane) {
            Ok(i) => i,
            Err(i) => i.min(last),
        };
        let target = (index as i64 + steps as i64).clamp(0, last as i64) as usize;
        self.lanes[target]
    }

    pub fn damage_for(&self, kind: ObjectKind) -> u32 {
        match kind {
            ObjectKind::Obstacle => self.obstacle_damage,
            ObjectKind::Hazard => self.hazard_damage,
            ObjectKind::Collectible => 0,
        }
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.lanes.is_empty() {
            return Err(TuningError::NoLanes);
        }
        if !self.lanes.windows(2).all(|w| w[0] < w[1]) {
            return Err(TuningError::UnorderedLanes);
        }
        if !self.lanes.contains(&0) {
            return Err(TuningError::MissingCenterLane);
        }

        let fields = [
            ("min_separation", self.min_separation),
            ("proximity_window", self.proximity_window),
            ("clearance", self.clearance),
            ("jump_speed", self.jump_speed),
            ("jump_apex", self.jump_apex),
            ("base_speed", self.base_speed),
            ("max_speed", self.max_speed),
            ("distance_rate", self.distance_rate),
            ("score_rate", self.score_rate),
        ];
        for (field, value) in fields {
            check_non_negative(field, value)?;
        }
        if !(self.speed_scale.is_finite() && self.speed_scale > 0.0) {
            return Err(TuningError::InvalidValue {
                field: "speed_scale",
                value: self.speed_scale,
            });
        }
        if !self.despawn_position.is_finite() {
            return Err(TuningError::InvalidValue {
                field: "despawn_position",
                value: self.despawn_position,
            });
        }
        if self.base_speed > self.max_speed {
            return Err(TuningError::SpeedBounds {
                base: self.base_speed,
                max: self.max_speed,
            });
        }

        for rule in &self.spawns {
            check_non_negative("rate_per_sec", rule.rate_per_sec)?;
            if !(rule.start_position.is_finite() && rule.start_position > self.proximity_window) {
                return Err(TuningError::SpawnInsideWindow {
                    kind: rule.kind,
                    start: rule.start_position,
                });
            }
        }

        Ok(())
    }
}

/// Balance table for the arena shooter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaTuning {
    pub width: f32,
    pub height: f32,
    /// Player keeps this far from every edge
    pub margin: f32,
    pub player_speed: f32,
    pub enemy_speed: f32,
    pub pickup_speed: f32,
    pub enemy_rate_per_sec: f32,
    pub pickup_rate_per_sec: f32,
    pub spawn_y: f32,
    /// Objects further than this below the field are culled
    pub despawn_margin: f32,
    pub contact_radius: f32,
    pub attack_radius: f32,
    pub attack_cost: f32,
    pub energy_regen: f32,
    pub enemy_damage: u32,
    pub health_pickup: u32,
    pub energy_pickup: f32,
    pub pickup_bonus: u64,
    pub kill_bonus: u64,
    pub score_rate: f32,
    pub points_per_level: u64,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 300.0,
            margin: 20.0,
            player_speed: 100.0,
            enemy_speed: 40.0,
            pickup_speed: 20.0,
            enemy_rate_per_sec: 0.4,
            pickup_rate_per_sec: 0.2,
            spawn_y: -20.0,
            despawn_margin: 50.0,
            contact_radius: 25.0,
            attack_radius: 60.0,
            attack_cost: 10.0,
            energy_regen: 10.0,
            enemy_damage: 10,
            health_pickup: 20,
            energy_pickup: 30.0,
            pickup_bonus: 50,
            kill_bonus: 100,
            score_rate: 20.0,
            points_per_level: 1000,
        }
    }
}

impl ArenaTuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("margin", self.margin),
            ("player_speed", self.player_speed),
            ("enemy_speed", self.enemy_speed),
            ("pickup_speed", self.pickup_speed),
            ("enemy_rate_per_sec", self.enemy_rate_per_sec),
            ("pickup_rate_per_sec", self.pickup_rate_per_sec),
            ("despawn_margin", self.despawn_margin),
            ("contact_radius", self.contact_radius),
            ("attack_radius", self.attack_radius),
            ("attack_cost", self.attack_cost),
            ("energy_regen", self.energy_regen),
            ("energy_pickup", self.energy_pickup),
            ("score_rate", self.score_rate),
        ];
        for (field, value) in fields {
            check_non_negative(field, value)?;
        }
        if self.width <= 2.0 * self.margin || self.height <= 2.0 * self.margin {
            return Err(TuningError::InvalidValue {
                field: "margin",
                value: self.margin,
            });
        }
        if self.points_per_level == 0 {
            return Err(TuningError::InvalidValue {
                field: "points_per_level",
                value: 0.0,
            });
        }
        Ok(())
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::InvalidValue { field, value })
    }
}
