//! Motion update for track objects

use super::state::TransientObject;

/// Move every object toward the actor plane by `speed * dt` and cull the ones
/// that fell behind `despawn_position`.
///
/// Relative order of the survivors is preserved. Returns how many were culled.
pub fn advance(
    objects: &mut Vec<TransientObject>,
    speed: f32,
    dt: f32,
    despawn_position: f32,
) -> usize {
    if dt <= 0.0 {
        return 0;
    }
    let delta = speed * dt;
    for obj in objects.iter_mut() {
        obj.previous_position = obj.position;
        obj.position -= delta;
    }

    let before = objects.len();
    objects.retain(|o| o.position >= despawn_position);
    before - objects.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObjectKind;

    fn obj(id: u32, position: f32) -> TransientObject {
        TransientObject::new(id, ObjectKind::Obstacle, 0, position)
    }

    #[test]
    fn test_advance_moves_by_speed_times_dt() {
        let mut objects = vec![obj(1, 10.0)];
        advance(&mut objects, 4.0, 0.5, -5.0);
        assert!((objects[0].position - 8.0).abs() < 1e-6);
        assert!((objects[0].previous_position - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_advance_culls_and_preserves_order() {
        let mut objects = vec![obj(1, 10.0), obj(2, -4.6), obj(3, 20.0), obj(4, -4.9)];
        let culled = advance(&mut objects, 1.0, 0.5, -5.0);
        assert_eq!(culled, 2);
        let ids: Vec<u32> = objects.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut objects = vec![obj(1, -100.0)];
        assert_eq!(advance(&mut objects, 10.0, 0.0, -5.0), 0);
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].position, -100.0);
    }
}
