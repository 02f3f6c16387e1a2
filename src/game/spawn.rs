//! Off-screen asteroid spawning

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{Asteroid, Bounds};

/// How far outside the playfield new asteroids appear
pub const SPAWN_MARGIN: f64 = 60.0;
/// Lower bound of the spawn speed range
pub const MIN_SPAWN_SPEED: f64 = 1.0;
/// Exclusive upper bound of the spawn speed range
pub const MAX_SPAWN_SPEED: f64 = 9.0;

/// Playfield edge an asteroid enters from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom];
}

/// Seedable source of new asteroids
pub struct Spawner {
    rng: ChaCha8Rng,
}

impl Spawner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Spawn an asteroid from a uniformly chosen edge
    pub fn spawn(&mut self, bounds: Bounds) -> Asteroid {
        let edge = Edge::ALL[self.rng.gen_range(0..Edge::ALL.len())];
        self.spawn_from(edge, bounds)
    }

    /// Spawn an asteroid just outside `edge`, heading straight inward
    pub fn spawn_from(&mut self, edge: Edge, bounds: Bounds) -> Asteroid {
        let speed = self.rng.gen_range(MIN_SPAWN_SPEED..MAX_SPAWN_SPEED);
        match edge {
            Edge::Left => {
                let y = self.rng.gen_range(0.0..bounds.height);
                Asteroid::new(-SPAWN_MARGIN, y, speed, 0.0)
            }
            Edge::Top => {
                let x = self.rng.gen_range(0.0..bounds.width);
                Asteroid::new(x, -SPAWN_MARGIN, 0.0, speed)
            }
            Edge::Right => {
                let y = self.rng.gen_range(0.0..bounds.height);
                Asteroid::new(bounds.width + SPAWN_MARGIN, y, -speed, 0.0)
            }
            Edge::Bottom => {
                let x = self.rng.gen_range(0.0..bounds.width);
                Asteroid::new(x, bounds.height + SPAWN_MARGIN, 0.0, -speed)
            }
        }
    }

    /// Population used at start and after every restart
    pub fn initial_population(&mut self, count: usize, bounds: Bounds) -> Vec<Asteroid> {
        (0..count).map(|_| self.spawn(bounds)).collect()
    }
}
