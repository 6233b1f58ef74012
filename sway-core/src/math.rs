//! 2-D rotation helpers on top of [`glam::Vec2`].
//!
//! `Vec2` already covers add/sub/scale, length, normalization, the left-hand
//! normal (`perp`) and the dot product. What it lacks is a rotation that can
//! be evaluated once and applied to many points about an arbitrary origin,
//! which is what rotating a whole branch per frame needs.

use glam::Vec2;

/// A rotation stored as its precomputed cosine/sine pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    cos: f32,
    sin: f32,
}

impl Rotation {
    /// Evaluates the trig functions for `angle` (radians) once.
    pub fn new(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { cos, sin }
    }

    /// Rotates `v` about the origin.
    #[inline]
    pub fn apply(&self, v: Vec2) -> Vec2 {
        Vec2::new(self.cos * v.x - self.sin * v.y, self.sin * v.x + self.cos * v.y)
    }

    /// Rotates `point` about `origin`.
    #[inline]
    pub fn apply_about(&self, point: Vec2, origin: Vec2) -> Vec2 {
        origin + self.apply(point - origin)
    }
}

/// Angle of `v` measured from the +x axis, in `(-PI, PI]`.
///
/// Undefined for the zero vector.
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Signed angle that rotates `from` onto `to`: `atan2(cross, dot)`.
#[inline]
pub fn signed_angle(from: Vec2, to: Vec2) -> f32 {
    from.perp_dot(to).atan2(from.dot(to))
}

/// Returns `v` rotated about the origin by `angle` radians.
#[inline]
pub fn rotated(v: Vec2, angle: f32) -> Vec2 {
    Rotation::new(angle).apply(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn quarter_turn_maps_x_to_y() {
        let v = rotated(Vec2::X, FRAC_PI_2);
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(v.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn rotation_about_origin_keeps_origin_fixed() {
        let rot = Rotation::new(1.234);
        let origin = Vec2::new(3.0, -2.0);
        assert_eq!(rot.apply_about(origin, origin), origin);

        let p = rot.apply_about(Vec2::new(5.0, -2.0), origin);
        assert_abs_diff_eq!((p - origin).length(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn one_rotation_reused_for_many_points_matches_fresh_rotations() {
        let rot = Rotation::new(0.3);
        let origin = Vec2::new(1.0, 1.0);
        for p in [Vec2::new(2.0, 0.0), Vec2::new(-4.0, 7.5), Vec2::new(0.0, 0.0)] {
            let shared = rot.apply_about(p, origin);
            let fresh = origin + rotated(p - origin, 0.3);
            assert_eq!(shared, fresh);
        }
    }

    #[test]
    fn signed_angle_is_positive_counter_clockwise() {
        assert_abs_diff_eq!(signed_angle(Vec2::X, Vec2::Y), FRAC_PI_2, epsilon = 1e-6);
        assert_abs_diff_eq!(signed_angle(Vec2::Y, Vec2::X), -FRAC_PI_2, epsilon = 1e-6);
        assert_abs_diff_eq!(signed_angle(Vec2::X, -Vec2::X).abs(), PI, epsilon = 1e-6);
    }

    #[test]
    fn angle_of_follows_quadrants() {
        assert_abs_diff_eq!(angle_of(Vec2::new(0.0, -1.0)), -FRAC_PI_2, epsilon = 1e-6);
        assert_abs_diff_eq!(angle_of(Vec2::new(-1.0, 0.0)), PI, epsilon = 1e-6);
        assert_abs_diff_eq!(angle_of(Vec2::new(2.0, 0.0)), 0.0, epsilon = 1e-6);
    }
}
