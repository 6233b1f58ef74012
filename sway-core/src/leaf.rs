use crate::{
    particle::{DEFAULT_AIR_FRICTION, Particle},
    random,
    types::NodeRef,
};
use glam::Vec2;
use rand::Rng;

/// Distance the free particle is held at from its anchor.
pub const LEAF_LENGTH: f32 = 1.0;

/// A leaf hanging from a skeletal node.
///
/// The free particle flutters around `anchor` at unit distance and is biased
/// toward `target_direction` every step.
#[derive(Clone, Debug)]
pub struct Leaf {
    pub root: NodeRef,
    /// Last known position of the root node.
    pub anchor: Vec2,
    pub free_particle: Particle,
    pub target_direction: Vec2,
    /// RGBA.
    pub color: [u8; 4],
    pub size: f32,
    /// Reserved for breakage; never read by the simulation.
    pub cut_threshold: f32,
}

impl Leaf {
    /// Creates a leaf at `anchor` pointing along the unit vector `direction`.
    pub fn new(root: NodeRef, anchor: Vec2, direction: Vec2, rng: &mut impl Rng) -> Self {
        let strength = random::between(rng, 1.0, 4.0);
        let cut_threshold = 0.4 + random::under(rng, 1.0);
        let green = (168.0 + random::symmetric(rng, 80.0)).clamp(0.0, 255.0) as u8;
        Self {
            root,
            anchor,
            free_particle: Particle::new(anchor + direction),
            target_direction: direction * strength,
            color: [255, green, 0, 255],
            size: 1.0,
            cut_threshold,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.anchor
    }

    /// Vector from the anchor to the free particle.
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.free_particle.position - self.anchor
    }

    /// Pulls the free particle back to [`LEAF_LENGTH`] from the anchor.
    pub fn solve_attach(&mut self) {
        let delta = self.direction();
        let dist = delta.length();
        if dist == 0.0 {
            return;
        }
        self.free_particle.move_by(delta * ((LEAF_LENGTH - dist) / dist));
    }

    /// Constrain and integrate; afterwards the acceleration is reset to the
    /// rest bias, discarding whatever wind was accumulated this step.
    pub fn update(&mut self, dt: f32) {
        self.solve_attach();
        self.free_particle.update(dt, DEFAULT_AIR_FRICTION);
        self.free_particle.acceleration = self.target_direction;
    }

    /// Moves the anchor to `position`, dragging the free particle along
    /// without changing its velocity.
    pub fn move_to(&mut self, position: Vec2) {
        let delta = position - self.anchor;
        self.anchor = position;
        self.free_particle.translate(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{SeedableRng, rngs::StdRng};

    fn leaf_at(anchor: Vec2) -> Leaf {
        let mut rng = StdRng::seed_from_u64(11);
        Leaf::new(NodeRef::new(0, 0), anchor, Vec2::new(1.0, 0.0), &mut rng)
    }

    #[test]
    fn new_leaf_starts_one_unit_out() {
        let leaf = leaf_at(Vec2::new(10.0, 10.0));
        assert_eq!(leaf.free_particle.position, Vec2::new(11.0, 10.0));
        let strength = leaf.target_direction.x;
        assert!((1.0..=4.0).contains(&strength));
        assert_eq!(leaf.target_direction.y, 0.0);
        assert!((128..=208).contains(&leaf.color[1]));
        assert!((0.4..=1.4).contains(&leaf.cut_threshold));
    }

    #[test]
    fn solve_attach_restores_unit_length() {
        let mut leaf = leaf_at(Vec2::ZERO);
        leaf.free_particle.position = Vec2::new(3.0, 4.0);
        leaf.solve_attach();
        assert_abs_diff_eq!(leaf.direction().length(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(leaf.free_particle.position.x, 0.6, epsilon = 1e-6);
    }

    #[test]
    fn move_to_current_anchor_is_a_no_op() {
        let mut leaf = leaf_at(Vec2::new(2.0, -3.0));
        leaf.free_particle.old_position = Vec2::new(2.5, -3.5);
        let before = leaf.free_particle;
        leaf.move_to(leaf.position());
        assert_eq!(leaf.free_particle.position, before.position);
        assert_eq!(leaf.free_particle.old_position, before.old_position);
    }

    #[test]
    fn move_to_preserves_velocity() {
        let mut leaf = leaf_at(Vec2::ZERO);
        leaf.free_particle.old_position = Vec2::new(0.5, 0.0);
        let velocity = leaf.free_particle.velocity();
        leaf.move_to(Vec2::new(100.0, -50.0));
        assert_eq!(leaf.anchor, Vec2::new(100.0, -50.0));
        assert_eq!(leaf.free_particle.velocity(), velocity);
    }

    #[test]
    fn update_resets_acceleration_to_target() {
        let mut leaf = leaf_at(Vec2::ZERO);
        leaf.free_particle.apply_force(Vec2::new(0.0, 1000.0));
        leaf.update(0.016);
        assert_eq!(leaf.free_particle.acceleration, leaf.target_direction);
    }
}
