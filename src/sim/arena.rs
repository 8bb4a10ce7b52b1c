//! Top-down arena shooter
//!
//! Second mini-game on the same driver. The player moves freely inside the
//! field while wraiths and orbs fall from the top edge. Contact is a plain
//! circle test against `contact_radius`.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::driver::Simulation;
use super::spawn;
use super::state::{GameEvent, GamePhase, MAX_HEALTH, ObjectKind, PickupKind};
use crate::consts::ARENA_DT;
use crate::tuning::ArenaTuning;

/// Upper bound for energy
pub const MAX_ENERGY: f32 = 100.0;

/// Held keys; they stay set until released
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArenaInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub attack: bool,
}

impl ArenaInput {
    /// Update from a key press or release. Returns false for unmapped keys.
    pub fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        let slot = match key {
            "ArrowLeft" | "a" | "A" => &mut self.left,
            "ArrowRight" | "d" | "D" => &mut self.right,
            "ArrowUp" | "w" | "W" => &mut self.up,
            "ArrowDown" | "s" | "S" => &mut self.down,
            " " | "Space" => &mut self.attack,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    fn direction(&self) -> Vec2 {
        Vec2::new(
            self.right as i32 as f32 - self.left as i32 as f32,
            self.down as i32 as f32 - self.up as i32 as f32,
        )
    }
}

/// A wraith or an orb
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArenaObject {
    pub id: u32,
    pub kind: ObjectKind,
    /// Set for collectibles only
    pub pickup: Option<PickupKind>,
    pub pos: Vec2,
}

/// Read-only view handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArenaSnapshot {
    pub phase: GamePhase,
    pub player: Vec2,
    pub health: u32,
    pub energy: f32,
    pub score: u64,
    pub level: u32,
    pub enemies: Vec<ArenaObject>,
    pub pickups: Vec<ArenaObject>,
}

/// Complete arena session state
#[derive(Debug, Clone)]
pub struct ArenaState {
    pub tuning: ArenaTuning,
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub player: Vec2,
    pub health: u32,
    pub energy: f32,
    pub score: u64,
    pub level: u32,
    pub enemies: Vec<ArenaObject>,
    pub pickups: Vec<ArenaObject>,
    pub time_ticks: u64,
    score_carry: f32,
    next_id: u32,
}

impl ArenaState {
    pub fn new(seed: u64, tuning: ArenaTuning) -> Self {
        let player = Self::start_position(&tuning);
        Self {
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Idle,
            player,
            health: MAX_HEALTH,
            energy: MAX_ENERGY,
            score: 0,
            level: 1,
            enemies: Vec::new(),
            pickups: Vec::new(),
            time_ticks: 0,
            score_carry: 0.0,
            next_id: 1,
        }
    }

    fn start_position(tuning: &ArenaTuning) -> Vec2 {
        Vec2::new(tuning.width / 2.0, tuning.height - 40.0)
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place a wraith directly (tests, scripted sequences)
    pub fn insert_enemy(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(ArenaObject {
            id,
            kind: ObjectKind::Hazard,
            pickup: None,
            pos,
        });
        id
    }

    /// Place an orb directly (tests, scripted sequences)
    pub fn insert_pickup(&mut self, kind: PickupKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.pickups.push(ArenaObject {
            id,
            kind: ObjectKind::Collectible,
            pickup: Some(kind),
            pos,
        });
        id
    }

    fn random_spawn_x(&mut self) -> f32 {
        let lo = self.tuning.margin;
        let hi = self.tuning.width - self.tuning.margin;
        self.rng.random_range(lo..hi)
    }

    fn tick(&mut self, input: &ArenaInput, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != GamePhase::Running || !(dt.is_finite() && dt > 0.0) {
            return events;
        }
        self.time_ticks += 1;

        // Move player, clamped to the field margin
        let t = &self.tuning;
        let next = self.player + input.direction() * t.player_speed * dt;
        self.player = next.clamp(
            Vec2::splat(t.margin),
            Vec2::new(t.width - t.margin, t.height - t.margin),
        );

        // Spawn, then fall and cull
        if spawn::roll(&mut self.rng, self.tuning.enemy_rate_per_sec, dt) {
            let pos = Vec2::new(self.random_spawn_x(), self.tuning.spawn_y);
            let id = self.insert_enemy(pos);
            events.push(GameEvent::ArenaSpawned {
                id,
                kind: ObjectKind::Hazard,
                pos,
            });
        }
        if spawn::roll(&mut self.rng, self.tuning.pickup_rate_per_sec, dt) {
            let kind = if self.rng.random_bool(0.5) {
                PickupKind::Health
            } else {
                PickupKind::Energy
            };
            let pos = Vec2::new(self.random_spawn_x(), self.tuning.spawn_y);
            let id = self.insert_pickup(kind, pos);
            events.push(GameEvent::ArenaSpawned {
                id,
                kind: ObjectKind::Collectible,
                pos,
            });
        }

        let floor = self.tuning.height + self.tuning.despawn_margin;
        let enemy_step = self.tuning.enemy_speed * dt;
        let pickup_step = self.tuning.pickup_speed * dt;
        for enemy in self.enemies.iter_mut() {
            enemy.pos.y += enemy_step;
        }
        for pickup in self.pickups.iter_mut() {
            pickup.pos.y += pickup_step;
        }
        self.enemies.retain(|e| e.pos.y < floor);
        self.pickups.retain(|p| p.pos.y < floor);

        self.resolve_contacts(&mut events);
        if self.phase != GamePhase::Running {
            return events;
        }

        // Area attack
        if input.attack && self.energy >= self.tuning.attack_cost {
            self.energy -= self.tuning.attack_cost;
            let player = self.player;
            let radius = self.tuning.attack_radius;
            let before = self.enemies.len();
            self.enemies.retain(|e| e.pos.distance(player) >= radius);
            let count = (before - self.enemies.len()) as u32;
            if count > 0 {
                self.score += self.tuning.kill_bonus * count as u64;
                events.push(GameEvent::EnemiesDefeated {
                    count,
                    score: self.score,
                });
            }
        }

        self.energy = (self.energy + self.tuning.energy_regen * dt).min(MAX_ENERGY);

        self.score_carry += self.tuning.score_rate * dt;
        let whole = self.score_carry.floor();
        self.score += whole as u64;
        self.score_carry -= whole;

        let level = (self.score / self.tuning.points_per_level) as u32 + 1;
        if level > self.level {
            self.level = level;
            log::info!("Arena level {}", level);
            events.push(GameEvent::LevelUp { level });
        }

        events
    }

    fn end_run(&mut self, events: &mut Vec<GameEvent>) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Ended;
            log::info!("Arena run ended: score {}", self.score);
            events.push(GameEvent::Ended {
                score: self.score,
                distance: None,
            });
        }
    }

    /// Apply wraith hits and orb pickups touching the player.
    ///
    /// Hits land first. If they empty health the run ends here and orbs
    /// touched in the same step are left alone.
    fn resolve_contacts(&mut self, events: &mut Vec<GameEvent>) {
        let player = self.player;
        let radius = self.tuning.contact_radius;

        let mut hits = 0u32;
        self.enemies.retain(|e| {
            if e.pos.distance(player) < radius {
                hits += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..hits {
            let amount = self.tuning.enemy_damage;
            self.health = self.health.saturating_sub(amount);
            events.push(GameEvent::Damaged {
                amount,
                health: self.health,
            });
        }
        if self.health == 0 {
            self.end_run(events);
            return;
        }

        let mut collected = Vec::new();
        self.pickups.retain(|p| {
            if p.pos.distance(player) < radius {
                collected.extend(p.pickup);
                false
            } else {
                true
            }
        });
        for kind in collected {
            match kind {
                PickupKind::Health => {
                    self.health = (self.health + self.tuning.health_pickup).min(MAX_HEALTH);
                }
                PickupKind::Energy => {
                    self.energy = (self.energy + self.tuning.energy_pickup).min(MAX_ENERGY);
                }
            }
            self.score += self.tuning.pickup_bonus;
            events.push(GameEvent::PickupCollected {
                kind,
                score: self.score,
            });
        }
    }
}

impl Simulation for ArenaState {
    type Input = ArenaInput;
    type Snapshot = ArenaSnapshot;

    fn fixed_dt(&self) -> f32 {
        ARENA_DT
    }

    fn phase(&self) -> GamePhase {
        self.phase
    }

    fn set_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
    }

    fn step(&mut self, input: &ArenaInput, dt: f32) -> Vec<GameEvent> {
        self.tick(input, dt)
    }

    fn reset(&mut self) {
        let rng = self.rng.clone();
        *self = ArenaState::new(self.seed, self.tuning.clone());
        self.rng = rng;
    }

    fn snapshot(&self) -> ArenaSnapshot {
        ArenaSnapshot {
            phase: self.phase,
            player: self.player,
            health: self.health,
            energy: self.energy,
            score: self.score,
            level: self.level,
            enemies: self.enemies.clone(),
            pickups: self.pickups.clone(),
        }
    }

    fn clear_one_shot(_input: &mut ArenaInput) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::driver::LoopDriver;

    fn quiet_arena() -> ArenaState {
        let tuning = ArenaTuning {
            enemy_rate_per_sec: 0.0,
            pickup_rate_per_sec: 0.0,
            ..Default::default()
        };
        let mut state = ArenaState::new(3, tuning);
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_player_stays_in_field() {
        let mut state = quiet_arena();
        let input = ArenaInput {
            left: true,
            up: true,
            ..Default::default()
        };
        for _ in 0..200 {
            state.tick(&input, ARENA_DT);
        }
        assert_eq!(state.player, Vec2::splat(state.tuning.margin));
    }

    #[test]
    fn test_enemy_contact_damages() {
        let mut state = quiet_arena();
        let p = state.player;
        state.insert_enemy(p + Vec2::new(0.0, -5.0));
        let events = state.tick(&ArenaInput::default(), ARENA_DT);
        assert_eq!(state.health, 90);
        assert!(state.enemies.is_empty());
        assert!(events.contains(&GameEvent::Damaged {
            amount: 10,
            health: 90
        }));
    }

    #[test]
    fn test_pickups_cap_at_max() {
        let mut state = quiet_arena();
        let p = state.player;
        state.health = 95;
        state.insert_pickup(PickupKind::Health, p);
        state.insert_pickup(PickupKind::Energy, p);
        state.tick(&ArenaInput::default(), ARENA_DT);
        assert_eq!(state.health, MAX_HEALTH);
        assert_eq!(state.energy, MAX_ENERGY);
        assert!(state.score >= 100);
    }

    #[test]
    fn test_attack_clears_nearby_and_costs_energy() {
        let mut state = quiet_arena();
        let p = state.player;
        state.insert_enemy(p + Vec2::new(40.0, -40.0));
        state.insert_enemy(p + Vec2::new(0.0, -200.0));
        let input = ArenaInput {
            attack: true,
            ..Default::default()
        };
        let events = state.tick(&input, ARENA_DT);
        assert_eq!(state.enemies.len(), 1);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::EnemiesDefeated { count: 1, .. })));
        assert!((state.energy - (MAX_ENERGY - 10.0 + 10.0 * ARENA_DT)).abs() < 1e-3);
    }

    #[test]
    fn test_attack_needs_energy() {
        let mut state = quiet_arena();
        state.energy = 5.0;
        let p = state.player;
        state.insert_enemy(p + Vec2::new(40.0, -40.0));
        let input = ArenaInput {
            attack: true,
            ..Default::default()
        };
        state.tick(&input, ARENA_DT);
        assert_eq!(state.enemies.len(), 1);
    }

    #[test]
    fn test_level_up_every_thousand_points() {
        let mut state = quiet_arena();
        state.score = 1000;
        let events = state.tick(&ArenaInput::default(), ARENA_DT);
        assert_eq!(state.level, 2);
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_game_over_once() {
        let mut driver = LoopDriver::new(quiet_arena());
        driver.sim_mut().health = 10;
        let p = driver.sim().player;
        driver.sim_mut().insert_enemy(p);
        driver.sim_mut().insert_enemy(p);
        driver.frame(ARENA_DT);
        assert_eq!(driver.phase(), GamePhase::Ended);
        assert_eq!(driver.sim().health, 0);

        let events = driver.drain_events();
        let ended = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Ended { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_lethal_hit_ends_before_orbs_heal() {
        let mut driver = LoopDriver::new(quiet_arena());
        driver.sim_mut().health = 10;
        let p = driver.sim().player;
        driver.sim_mut().insert_enemy(p);
        driver.sim_mut().insert_pickup(PickupKind::Health, p);
        driver.step(ARENA_DT);

        assert_eq!(driver.phase(), GamePhase::Ended);
        assert_eq!(driver.sim().health, 0);
        assert_eq!(driver.sim().pickups.len(), 1);
        let events = driver.drain_events();
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::PickupCollected { .. }))
        );
        assert!(matches!(
            events.last(),
            Some(GameEvent::Ended { distance: None, .. })
        ));
    }

    #[test]
    fn test_spawn_events_carry_position() {
        let tuning = ArenaTuning {
            enemy_rate_per_sec: 1000.0,
            pickup_rate_per_sec: 1000.0,
            ..Default::default()
        };
        let mut state = ArenaState::new(11, tuning);
        state.phase = GamePhase::Running;
        let events = state.tick(&ArenaInput::default(), ARENA_DT);
        let spawned: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ArenaSpawned { pos, .. } => Some(*pos),
                _ => None,
            })
            .collect();
        assert_eq!(spawned.len(), 2);
        for pos in spawned {
            assert_eq!(pos.y, state.tuning.spawn_y);
            assert!(pos.x >= state.tuning.margin);
            assert!(pos.x < state.tuning.width - state.tuning.margin);
        }
    }

    #[test]
    fn test_key_mapping() {
        let mut input = ArenaInput::default();
        assert!(input.set_key("ArrowLeft", true));
        assert!(input.set_key(" ", true));
        assert!(!input.set_key("q", true));
        assert!(input.left && input.attack);
        input.set_key("a", false);
        assert!(!input.left);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut driver = LoopDriver::new(quiet_arena());
        driver.sim_mut().score = 4000;
        driver.sim_mut().health = 3;
        driver.reset();
        let snap = driver.snapshot();
        assert_eq!(snap.phase, GamePhase::Idle);
        assert_eq!(snap.health, MAX_HEALTH);
        assert_eq!(snap.score, 0);
        assert_eq!(snap.level, 1);
    }
}
