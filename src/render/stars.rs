//! Decorative falling starfield

use rand::Rng;

use crate::game::Bounds;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f64,
    pub y: f64,
    /// Distance fallen per frame
    pub speed: f64,
}

/// Background stars. Purely cosmetic; drifts once per rendered frame.
#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<Star>,
    bounds: Bounds,
}

impl Starfield {
    pub fn generate<R: Rng>(count: usize, bounds: Bounds, rng: &mut R) -> Self {
        let stars = (0..count)
            .map(|_| Star {
                x: rng.gen_range(0.0..bounds.width),
                y: rng.gen_range(0.0..bounds.height),
                speed: rng.gen_range(1.0..3.0),
            })
            .collect();
        Self { stars, bounds }
    }

    /// Move every star down by its speed, wrapping at the bottom
    pub fn drift(&mut self) {
        let height = self.bounds.height;
        for star in &mut self.stars {
            star.y = (star.y + star.speed) % height;
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }
}
