use crate::{particle::Particle, random};
use glam::Vec2;
use rand::Rng;

/// A vertical band of wind sweeping horizontally across the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wind {
    /// Horizontal extent of the band.
    pub width: f32,
    pub strength: f32,
    /// Center of the band.
    pub pos_x: f32,
    /// Horizontal speed, in units per second.
    pub speed: f32,
}

impl Wind {
    /// A band entering from the left edge unless `start` says otherwise.
    pub fn new(width: f32, strength: f32, speed: f32, start: Option<f32>) -> Self {
        Self {
            width,
            strength,
            pos_x: start.unwrap_or(-0.5 * width),
            speed,
        }
    }

    /// Advances the band and wraps it back once it has fully left `max_x`.
    pub fn update(&mut self, dt: f32, max_x: f32) {
        self.pos_x += self.speed * dt;
        if self.pos_x - 0.5 * self.width > max_x {
            self.pos_x = -0.5 * self.width;
        }
    }

    pub fn is_over(&self, position: Vec2) -> bool {
        let half = 0.5 * self.width;
        position.x > self.pos_x - half && position.x < self.pos_x + half
    }

    /// Pushes `particle` rightward with a random vertical component when it
    /// is inside the band.
    pub fn apply(&self, particle: &mut Particle, rng: &mut impl Rng) {
        if self.is_over(particle.position) {
            let gust = Vec2::new(1.0, random::symmetric(rng, 1.0));
            particle.apply_force(gust * self.strength);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn default_start_is_just_off_screen() {
        let w = Wind::new(100.0, 1.0, 700.0, None);
        assert_eq!(w.pos_x, -50.0);
        let w = Wind::new(100.0, 1.0, 700.0, Some(300.0));
        assert_eq!(w.pos_x, 300.0);
    }

    #[test]
    fn update_advances_and_wraps() {
        let mut w = Wind::new(100.0, 1.0, 100.0, None);
        w.update(1.0, 1000.0);
        assert_eq!(w.pos_x, 50.0);

        w.pos_x = 1049.0;
        w.update(0.01, 1000.0);
        assert_eq!(w.pos_x, 1050.0);
        w.update(0.01, 1000.0);
        assert_eq!(w.pos_x, -50.0);
    }

    #[test]
    fn is_over_uses_open_band() {
        let w = Wind::new(10.0, 1.0, 0.0, Some(0.0));
        assert!(w.is_over(Vec2::new(4.9, 123.0)));
        assert!(!w.is_over(Vec2::new(5.0, 0.0)));
        assert!(!w.is_over(Vec2::new(-5.0, 0.0)));
    }

    #[test]
    fn apply_pushes_inside_band_only() {
        let mut rng = StdRng::seed_from_u64(5);
        let w = Wind::new(10.0, 2.0, 0.0, Some(0.0));

        let mut inside = Particle::new(Vec2::new(1.0, 0.0));
        w.apply(&mut inside, &mut rng);
        assert_eq!(inside.acceleration.x, 2.0);
        assert!(inside.acceleration.y.abs() <= 1.0);

        let mut outside = Particle::new(Vec2::new(20.0, 0.0));
        w.apply(&mut outside, &mut rng);
        assert_eq!(outside.acceleration, Vec2::ZERO);
    }
}
