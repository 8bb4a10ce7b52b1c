//! Spawn policy
//!
//! One Bernoulli trial per spawn rule per tick, scaled by the tick length so
//! the expected spawn rate does not depend on the frame rate.

use rand::Rng;

use super::state::{GameEvent, GameState, TransientObject};
use crate::tuning::SpawnRule;

/// Probability of at least one arrival in `dt` for a Poisson process with
/// the given rate.
#[inline]
pub fn spawn_chance(rate_per_sec: f32, dt: f32) -> f32 {
    if rate_per_sec <= 0.0 || dt <= 0.0 {
        return 0.0;
    }
    1.0 - (-rate_per_sec * dt).exp()
}

/// Roll a spawn trial
pub fn roll<R: Rng>(rng: &mut R, rate_per_sec: f32, dt: f32) -> bool {
    let p = spawn_chance(rate_per_sec, dt);
    p > 0.0 && rng.random::<f32>() < p
}

/// True if `objects` already has something in `lane` closer than
/// `min_separation` to `position`.
pub fn lane_crowded(
    objects: &[TransientObject],
    lane: i32,
    position: f32,
    min_separation: f32,
) -> bool {
    objects
        .iter()
        .any(|o| o.lane == lane && (o.position - position).abs() < min_separation)
}

/// True if a blocking object in `lane` at `position` would leave no lane
/// free of blockers near that position.
///
/// A single-lane track can never be walled off this way; the player jumps.
pub fn would_wall_off(
    objects: &[TransientObject],
    lanes: &[i32],
    lane: i32,
    position: f32,
    min_separation: f32,
) -> bool {
    if lanes.len() < 2 {
        return false;
    }
    lanes.iter().filter(|&&l| l != lane).all(|&l| {
        objects.iter().any(|o| {
            o.lane == l && o.kind.is_blocking() && (o.position - position).abs() < min_separation
        })
    })
}

/// Try one rule. Returns the new object's id and lane if it spawned.
pub fn try_spawn(state: &mut GameState, rule: &SpawnRule, dt: f32) -> Option<(u32, i32)> {
    if state.tuning.lanes.is_empty() || !roll(&mut state.rng, rule.rate_per_sec, dt) {
        return None;
    }

    let lane_index = state.rng.random_range(0..state.tuning.lanes.len());
    let lane = state.tuning.lanes[lane_index];
    let min_sep = state.tuning.min_separation;

    if lane_crowded(&state.objects, lane, rule.start_position, min_sep) {
        log::debug!("Skipped {:?} spawn in crowded lane {}", rule.kind, lane);
        return None;
    }
    if rule.kind.is_blocking()
        && would_wall_off(
            &state.objects,
            &state.tuning.lanes,
            lane,
            rule.start_position,
            min_sep,
        )
    {
        log::debug!("Skipped {:?} spawn that would block every lane", rule.kind);
        return None;
    }

    let id = state.insert_object(rule.kind, lane, rule.start_position);
    Some((id, lane))
}

/// Run every spawn rule once, recording spawn events
pub fn spawn_tick(state: &mut GameState, dt: f32, events: &mut Vec<GameEvent>) {
    let rules = state.tuning.spawns.clone();
    for rule in &rules {
        if let Some((id, lane)) = try_spawn(state, rule, dt) {
            log::debug!("Spawned {:?} #{} in lane {}", rule.kind, id, lane);
            events.push(GameEvent::Spawned {
                id,
                kind: rule.kind,
                lane,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObjectKind;
    use crate::tuning::Tuning;

    #[test]
    fn test_spawn_chance_bounds() {
        assert_eq!(spawn_chance(1.0, 0.0), 0.0);
        assert_eq!(spawn_chance(0.0, 1.0), 0.0);
        assert_eq!(spawn_chance(-3.0, 1.0), 0.0);
        let p = spawn_chance(1.0, 1.0 / 60.0);
        assert!(p > 0.0 && p < 1.0 / 60.0 + 1e-6);
    }

    #[test]
    fn test_spawn_chance_is_frame_rate_independent() {
        // Two half-steps must match one full step
        let full = spawn_chance(2.0, 0.1);
        let half = spawn_chance(2.0, 0.05);
        let two_halves = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((full - two_halves).abs() < 1e-5);
    }

    #[test]
    fn test_crowded_lane_skips_spawn() {
        let mut tuning = Tuning::classic();
        tuning.lanes = vec![0];
        tuning.spawns = vec![SpawnRule {
            kind: ObjectKind::Collectible,
            rate_per_sec: 1.0e6,
            start_position: 25.0,
        }];
        let mut state = GameState::new(3, tuning);
        state.insert_object(ObjectKind::Collectible, 0, 23.0);

        let rule = state.tuning.spawns[0];
        assert_eq!(try_spawn(&mut state, &rule, 1.0), None);
        assert_eq!(state.objects.len(), 1);
    }

    #[test]
    fn test_spawn_never_walls_off_every_lane() {
        let mut tuning = Tuning::classic();
        tuning.spawns = vec![SpawnRule {
            kind: ObjectKind::Obstacle,
            rate_per_sec: 1.0e6,
            start_position: 30.0,
        }];
        let mut state = GameState::new(11, tuning);
        // Two lanes already blocked at the spawn point
        state.insert_object(ObjectKind::Obstacle, -1, 29.0);
        state.insert_object(ObjectKind::Hazard, 1, 31.0);

        let rule = state.tuning.spawns[0];
        for _ in 0..50 {
            try_spawn(&mut state, &rule, 1.0);
        }
        assert!(state.objects.iter().all(|o| o.lane != 0));
    }

    #[test]
    fn test_single_lane_still_gets_blockers() {
        let mut tuning = Tuning::classic();
        tuning.lanes = vec![0];
        let mut state = GameState::new(8, tuning);
        assert!(!would_wall_off(&state.objects, &state.tuning.lanes, 0, 30.0, 6.0));

        let mut events = Vec::new();
        for _ in 0..200 {
            spawn_tick(&mut state, 0.5, &mut events);
            state.objects.clear();
        }
        assert!(state.tuning.spawns.iter().any(|r| r.kind.is_blocking()));
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::Spawned {
                kind: ObjectKind::Obstacle | ObjectKind::Hazard,
                ..
            }
        )));
    }

    #[test]
    fn test_spawned_lane_is_valid() {
        let mut state = GameState::new(5, Tuning::classic());
        let mut events = Vec::new();
        for _ in 0..2000 {
            spawn_tick(&mut state, 0.5, &mut events);
            state.objects.clear();
        }
        assert!(!events.is_empty());
        for event in &events {
            if let GameEvent::Spawned { lane, .. } = event {
                assert!(state.tuning.lanes.contains(lane));
            }
        }
    }
}
