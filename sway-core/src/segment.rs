use crate::{
    math::angle_of,
    particle::{DEFAULT_AIR_FRICTION, Particle},
};
use glam::Vec2;

/// Restoring strength of the trunk; each level deeper multiplies it by
/// [`STIFFNESS_FALLOFF`].
pub const BASE_STIFFNESS: f32 = 4000.0;
pub const STIFFNESS_FALLOFF: f32 = 0.4;

/// Restoring strength for a branch at the given split depth.
pub fn stiffness_for_level(level: u32) -> f32 {
    BASE_STIFFNESS * STIFFNESS_FALLOFF.powi(i32::try_from(level).unwrap_or(i32::MAX))
}

/// A link between a fixed attach point and a free Verlet particle.
///
/// The free end is held at `length` from the attach point and pushed back
/// toward its rest direction every step. The change of orientation since the
/// previous step is exposed as `delta_angle`.
#[derive(Clone, Debug, Default)]
pub struct ConstrainedSegment {
    pub attach_point: Vec2,
    /// Rest direction, pre-scaled by the stiffness.
    pub direction: Vec2,
    pub moving_point: Particle,
    pub length: f32,
    pub delta_angle: f32,
    pub last_angle: f32,
}

impl ConstrainedSegment {
    /// Builds a segment at rest between `attach` and `moving`, with a
    /// unit rest direction.
    ///
    /// Coincident ends give an inert segment with no rest direction.
    pub fn new(attach: Vec2, moving: Vec2) -> Self {
        let delta = moving - attach;
        let direction = delta.normalize_or_zero();
        Self {
            attach_point: attach,
            direction,
            moving_point: Particle::new(moving),
            length: delta.length(),
            delta_angle: 0.0,
            last_angle: angle_of(direction),
        }
    }

    /// Same as [`ConstrainedSegment::new`] with the rest direction scaled by
    /// the stiffness of `level`.
    pub fn with_level(attach: Vec2, moving: Vec2, level: u32) -> Self {
        let mut segment = Self::new(attach, moving);
        segment.direction *= stiffness_for_level(level);
        segment
    }

    /// Projects the free end back onto the circle of radius `length`.
    pub fn solve_attach(&mut self) {
        let delta = self.moving_point.position - self.attach_point;
        let dist = delta.length();
        if dist == 0.0 {
            return;
        }
        let correction = delta * ((self.length - dist) / dist);
        self.moving_point.move_by(correction);
    }

    /// Recomputes `delta_angle` from the current free-end orientation.
    pub fn update_delta_angle(&mut self) {
        let angle = angle_of(self.moving_point.position - self.attach_point);
        self.delta_angle = angle - self.last_angle;
        self.last_angle = angle;
    }

    /// Constrain, push toward rest, integrate, then measure rotation.
    pub fn update(&mut self, dt: f32) {
        self.solve_attach();
        self.moving_point.acceleration += self.direction;
        self.moving_point.update(dt, DEFAULT_AIR_FRICTION);
        self.update_delta_angle();
    }

    /// Rigidly moves both ends, preserving the free end's velocity.
    pub fn translate(&mut self, v: Vec2) {
        self.attach_point += v;
        self.moving_point.translate(v);
    }

    pub fn current_length(&self) -> f32 {
        (self.moving_point.position - self.attach_point).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn stiffness_falls_off_with_level() {
        assert_eq!(stiffness_for_level(0), 4000.0);
        assert_relative_eq!(stiffness_for_level(1), 1600.0, max_relative = 1e-6);
        assert_relative_eq!(stiffness_for_level(3), 4000.0 * 0.064, max_relative = 1e-6);
    }

    #[test]
    fn huge_level_never_stiffens() {
        let s = stiffness_for_level(u32::MAX);
        assert!(s.is_finite());
        assert!(s <= stiffness_for_level(8));
    }

    #[test]
    fn new_segment_is_at_rest() {
        let s = ConstrainedSegment::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, -10.0));
        assert_eq!(s.length, 10.0);
        assert_eq!(s.direction, Vec2::new(0.0, -1.0));
        assert_abs_diff_eq!(s.last_angle, -std::f32::consts::FRAC_PI_2, epsilon = 1e-6);
        assert_eq!(s.delta_angle, 0.0);
    }

    #[test]
    fn with_level_scales_direction() {
        let s = ConstrainedSegment::with_level(Vec2::ZERO, Vec2::new(5.0, 0.0), 1);
        assert_relative_eq!(s.direction.x, 1600.0, max_relative = 1e-6);
        assert_eq!(s.direction.y, 0.0);
    }

    #[test]
    fn single_solve_restores_target_length() {
        let mut s = ConstrainedSegment::new(Vec2::new(1.0, 1.0), Vec2::new(1.0, 11.0));
        for stretched in [Vec2::new(7.0, 19.0), Vec2::new(1.5, 1.5), Vec2::new(-30.0, 2.0)] {
            s.moving_point.position = stretched;
            s.solve_attach();
            assert_abs_diff_eq!(s.current_length(), 10.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn repeated_solves_never_increase_the_error() {
        let mut s = ConstrainedSegment::new(Vec2::ZERO, Vec2::new(10.0, 0.0));
        s.moving_point.position = Vec2::new(25.0, 5.0);
        let mut err = (s.current_length() - s.length).abs();
        for _ in 0..5 {
            s.solve_attach();
            let next = (s.current_length() - s.length).abs();
            assert!(next <= err + 1e-5);
            err = next;
        }
        assert!(err < 1e-4);
    }

    #[test]
    fn solve_at_attach_point_is_a_no_op() {
        let mut s = ConstrainedSegment::new(Vec2::ZERO, Vec2::new(1.0, 0.0));
        s.moving_point.position = Vec2::ZERO;
        s.solve_attach();
        assert_eq!(s.moving_point.position, Vec2::ZERO);
    }

    #[test]
    fn coincident_ends_stay_inert() {
        let mut s = ConstrainedSegment::with_level(Vec2::ONE, Vec2::ONE, 0);
        for _ in 0..10 {
            s.update(0.016);
        }
        assert_eq!(s.moving_point.position, Vec2::ONE);
        assert_eq!(s.delta_angle, 0.0);
    }

    #[test]
    fn sideways_push_produces_delta_angle() {
        let mut s = ConstrainedSegment::new(Vec2::ZERO, Vec2::new(0.0, -10.0));
        s.moving_point.apply_force(Vec2::new(100.0, 0.0));
        s.update(0.016);
        // Free end moved toward +x from straight up: angle increases.
        assert!(s.delta_angle > 0.0);
        assert_abs_diff_eq!(
            s.last_angle,
            angle_of(s.moving_point.position - s.attach_point),
            epsilon = 1e-6
        );
    }

    #[test]
    fn translate_moves_both_ends_without_velocity() {
        let mut s = ConstrainedSegment::new(Vec2::ZERO, Vec2::new(0.0, -10.0));
        s.translate(Vec2::new(3.0, 4.0));
        assert_eq!(s.attach_point, Vec2::new(3.0, 4.0));
        assert_eq!(s.moving_point.position, Vec2::new(3.0, -6.0));
        assert_eq!(s.moving_point.velocity(), Vec2::ZERO);
    }
}
