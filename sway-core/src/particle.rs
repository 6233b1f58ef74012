use glam::Vec2;

/// Drag coefficient used by branch segments and leaves.
pub const DEFAULT_AIR_FRICTION: f32 = 0.5;

/// A Verlet-integrated point mass.
///
/// Velocity is implicit: `position - old_position`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub old_position: Vec2,
    pub acceleration: Vec2,
    pub mass: f32,
    pub inverse_mass: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self::new(Vec2::ZERO)
    }
}

impl Particle {
    /// A unit-mass particle at rest at `position`.
    pub fn new(position: Vec2) -> Self {
        Self::with_mass(position, 1.0)
    }

    pub fn with_mass(position: Vec2, mass: f32) -> Self {
        debug_assert!(mass > 0.0, "particle mass must be positive, got {mass}");
        Self {
            position,
            old_position: position,
            acceleration: Vec2::ZERO,
            mass,
            inverse_mass: 1.0 / mass,
        }
    }

    /// Implicit velocity over the last step.
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.position - self.old_position
    }

    /// Advances one step and clears the accumulated acceleration.
    ///
    /// Drag is subtracted from the acceleration before the step; the
    /// velocity itself is carried over in full.
    pub fn update(&mut self, dt: f32, air_friction: f32) {
        let velocity = self.velocity();
        self.acceleration -= velocity * air_friction;
        let new_position = self.position + velocity + self.acceleration * dt;
        self.old_position = self.position;
        self.position = new_position;
        self.acceleration = Vec2::ZERO;
    }

    /// Displaces the current position only, which changes the implied velocity
    /// the way a position-based constraint correction should.
    #[inline]
    pub fn move_by(&mut self, v: Vec2) {
        self.position += v;
    }

    /// Shifts both current and previous positions, leaving velocity intact.
    #[inline]
    pub fn translate(&mut self, v: Vec2) {
        self.position += v;
        self.old_position += v;
    }

    #[inline]
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force * self.inverse_mass;
    }
}
