//! Player versus asteroid hit detection
//!
//! Not a true shape test: both sprites are approximated by circles whose
//! radii come from their smaller side, their draw scale and a divisor that
//! depends on the ship's facing. The divisors tune how forgiving a near miss
//! feels for the non-square ship silhouette.

use super::entities::{ASTEROID_DRAW_SCALE, SHIP_DRAW_SCALE};
use super::{Asteroid, Facing, Player};

/// Collision system for the ship and the asteroid field
pub struct CollisionSystem;

impl CollisionSystem {
    fn divisor(facing: Facing) -> f64 {
        match facing {
            Facing::Right | Facing::Down => 3.0,
            Facing::Up | Facing::Left => 2.0,
        }
    }

    /// Effective collision radius of the ship
    pub fn player_radius(player: &Player, facing: Facing) -> f64 {
        player.width.min(player.height) * SHIP_DRAW_SCALE / Self::divisor(facing)
    }

    /// Effective collision radius of an asteroid
    pub fn asteroid_radius(asteroid: &Asteroid, facing: Facing) -> f64 {
        asteroid.width.min(asteroid.height) * ASTEROID_DRAW_SCALE / Self::divisor(facing)
    }

    /// Distance between the drawn centers of the ship and an asteroid
    pub fn distance(player: &Player, asteroid: &Asteroid) -> f64 {
        let (px, py) = player.drawn_center();
        let (ax, ay) = asteroid.drawn_center();
        let dx = px - ax;
        let dy = py - ay;
        (dx * dx + dy * dy).sqrt()
    }

    /// Check whether the ship overlaps an asteroid
    pub fn collides(player: &Player, asteroid: &Asteroid, facing: Facing) -> bool {
        Self::distance(player, asteroid)
            < Self::player_radius(player, facing) + Self::asteroid_radius(asteroid, facing)
    }
}
