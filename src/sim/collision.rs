//! Collision detection and response for lane objects
//!
//! An object touches the actor when it shares the actor's lane and its travel
//! during the last tick crossed the proximity window around the actor plane.
//! Blocking kinds also need the actor to be below the clearance height;
//! collectibles are caught at any height.

use super::state::{ActorState, GameEvent, GamePhase, GameState, ObjectKind, TransientObject};
use crate::tuning::Tuning;

/// Lane and position test, identical for every kind.
///
/// Uses the span swept since the previous motion update so an object moving
/// faster than the window width per tick cannot skip over it. For an object
/// that has not moved this is the plain `-window < position < window` test.
#[inline]
pub fn in_proximity(obj: &TransientObject, lane: i32, window: f32) -> bool {
    if obj.lane != lane {
        return false;
    }
    let lo = obj.position.min(obj.previous_position);
    let hi = obj.position.max(obj.previous_position);
    hi > -window && lo < window
}

/// Vertical rule: only blocking kinds can be jumped over
#[inline]
pub fn clears(kind: ObjectKind, vertical_offset: f32, clearance: f32) -> bool {
    kind.is_blocking() && vertical_offset >= clearance
}

/// Full overlap test for one object against the actor
pub fn overlaps(obj: &TransientObject, actor: &ActorState, tuning: &Tuning) -> bool {
    in_proximity(obj, actor.lane, tuning.proximity_window)
        && !clears(obj.kind, actor.vertical_offset, tuning.clearance)
}

/// Resolve every overlapping object this tick, apply its effect and remove it.
///
/// If health reaches zero the phase moves to `Ended` once, after all hits of
/// the tick have been applied. Returns the number of objects resolved.
pub fn resolve(state: &mut GameState, events: &mut Vec<GameEvent>) -> usize {
    let GameState {
        tuning,
        actor,
        objects,
        phase,
        ..
    } = state;

    let mut hits = 0;
    objects.retain(|obj| {
        if !overlaps(obj, actor, tuning) {
            return true;
        }
        hits += 1;
        match obj.kind {
            ObjectKind::Obstacle | ObjectKind::Hazard => {
                let amount = tuning.damage_for(obj.kind);
                actor.take_damage(amount);
                events.push(GameEvent::Damaged {
                    amount,
                    health: actor.health,
                });
            }
            ObjectKind::Collectible => {
                actor.coins += 1;
                actor.score += tuning.coin_bonus;
                events.push(GameEvent::CoinCollected {
                    coins: actor.coins,
                    score: actor.score,
                });
            }
        }
        false
    });

    if actor.health == 0 && *phase == GamePhase::Running {
        *phase = GamePhase::Ended;
        log::info!(
            "Run ended: score {}, distance {:.1}",
            actor.score,
            actor.distance
        );
        events.push(GameEvent::Ended {
            score: actor.score,
            distance: Some(actor.distance),
        });
    }

    hits
}
