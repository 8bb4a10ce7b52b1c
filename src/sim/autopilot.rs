//! Demo mode player for the lane runner
//!
//! Looks at what is coming down each lane and produces the same `TickInput`
//! a human would. Used by the native binary and the attract screen.

use super::state::{GameState, TransientObject};
use super::tick::TickInput;

/// Lane-picking AI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Autopilot {
    /// Blockers further than this are ignored
    pub lookahead: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self { lookahead: 24.0 }
    }
}

impl Autopilot {
    pub fn new(lookahead: f32) -> Self {
        Self { lookahead }
    }

    /// Decide the intents for the next tick
    pub fn decide(&self, state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        let tuning = &state.tuning;
        let actor = &state.actor;
        let lane = actor.lane;

        let threat = self.nearest_blocker(state, lane);
        let mut neighbours = vec![tuning.step_lane(lane, -1), lane, tuning.step_lane(lane, 1)];
        neighbours.dedup();
        let candidates = neighbours.into_iter();

        if threat.is_some() {
            // Dodge sideways if a neighbour is clearer than the current lane
            let best = candidates
                .map(|l| (l, self.nearest_blocker(state, l).unwrap_or(f32::INFINITY)))
                .max_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((target, clear)) = best
                && target != lane
                && clear > threat.unwrap_or(f32::INFINITY)
            {
                steer(&mut input, lane, target);
                return input;
            }

            // No way around: jump so the apex lines up with the arrival
            if let Some(position) = threat
                && actor.is_grounded()
                && actor.speed > 0.0
            {
                let arrival = position / actor.speed;
                let apex_time = tuning.jump_apex / tuning.jump_speed;
                if arrival <= apex_time {
                    input.jump = true;
                }
            }
            return input;
        }

        // Lane is clear, go after a coin if it is safe to do so
        let coin_lane = candidates
            .filter(|&l| l != lane && self.nearest_blocker(state, l).is_none())
            .filter_map(|l| self.nearest_coin(state, l).map(|pos| (l, pos)))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        if let Some((target, _)) = coin_lane
            && self.nearest_coin(state, lane).is_none()
        {
            steer(&mut input, lane, target);
        }

        input
    }

    /// Position of the closest blocking object still ahead in `lane`
    fn nearest_blocker(&self, state: &GameState, lane: i32) -> Option<f32> {
        self.nearest(state, lane, |obj| obj.kind.is_blocking())
    }

    fn nearest_coin(&self, state: &GameState, lane: i32) -> Option<f32> {
        self.nearest(state, lane, |obj| !obj.kind.is_blocking())
    }

    fn nearest(
        &self,
        state: &GameState,
        lane: i32,
        filter: impl Fn(&TransientObject) -> bool,
    ) -> Option<f32> {
        let behind = -state.tuning.proximity_window;
        state
            .objects
            .iter()
            .filter(|obj| obj.lane == lane && filter(obj))
            .map(|obj| obj.position)
            .filter(|&pos| pos > behind && pos < self.lookahead)
            .min_by(f32::total_cmp)
    }
}

fn steer(input: &mut TickInput, from: i32, to: i32) {
    if to < from {
        input.move_left = true;
    } else if to > from {
        input.move_right = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{GamePhase, ObjectKind};
    use crate::tuning::Tuning;

    fn quiet_state() -> GameState {
        let mut tuning = Tuning::classic();
        tuning.spawns.clear();
        let mut state = GameState::new(5, tuning);
        state.phase = GamePhase::Running;
        state
    }

    #[test]
    fn test_idles_on_empty_track() {
        let state = quiet_state();
        assert!(Autopilot::default().decide(&state).is_empty());
    }

    #[test]
    fn test_dodges_into_free_lane() {
        let mut state = quiet_state();
        state.insert_object(ObjectKind::Obstacle, 0, 10.0);
        state.insert_object(ObjectKind::Obstacle, -1, 8.0);
        let input = Autopilot::default().decide(&state);
        assert!(input.move_right);
        assert!(!input.jump);
    }

    #[test]
    fn test_jumps_when_boxed_in() {
        let mut state = quiet_state();
        for lane in [-1, 0, 1] {
            state.insert_object(ObjectKind::Hazard, lane, 5.0);
        }
        let input = Autopilot::default().decide(&state);
        assert!(input.jump);
        assert!(!input.move_left && !input.move_right);
    }

    #[test]
    fn test_waits_before_jumping_early() {
        let mut state = quiet_state();
        for lane in [-1, 0, 1] {
            state.insert_object(ObjectKind::Hazard, lane, 23.0);
        }
        assert!(!Autopilot::default().decide(&state).jump);
    }

    #[test]
    fn test_goes_for_coins_in_safe_lane() {
        let mut state = quiet_state();
        state.actor.lane = 1;
        state.insert_object(ObjectKind::Collectible, 0, 12.0);
        let input = Autopilot::default().decide(&state);
        assert!(input.move_left);
    }

    #[test]
    fn test_dodges_across_sparse_lanes() {
        let mut state = quiet_state();
        state.tuning.lanes = vec![-2, 0, 2];
        state.insert_object(ObjectKind::Obstacle, 0, 10.0);
        state.insert_object(ObjectKind::Obstacle, 2, 8.0);
        let input = Autopilot::default().decide(&state);
        assert!(input.move_left);
    }

    #[test]
    fn test_stays_in_range_at_edge() {
        let mut state = quiet_state();
        state.actor.lane = -1;
        state.insert_object(ObjectKind::Obstacle, -1, 10.0);
        let input = Autopilot::default().decide(&state);
        assert!(!input.move_left);
    }
}
