//! Entity motion with toroidal wraparound

use super::{Asteroid, Bounds, Player};

/// Physics system for advancing entity positions one tick
pub struct PhysicsSystem;

impl PhysicsSystem {
    /// Move the player by the held direction, wrapping each axis into `[0, dim)`
    pub fn step_player(player: &mut Player, direction: (f64, f64), bounds: Bounds) {
        player.x = Self::wrap(player.x + direction.0, bounds.width);
        player.y = Self::wrap(player.y + direction.1, bounds.height);
    }

    /// Integrate an asteroid's velocity. An axis that leaves the playfield
    /// extended by the asteroid's own size reappears on the opposite side.
    pub fn step_asteroid(asteroid: &mut Asteroid, bounds: Bounds) {
        asteroid.x = Self::wrap_extended(
            asteroid.x + asteroid.vel_x,
            asteroid.width,
            bounds.width,
        );
        asteroid.y = Self::wrap_extended(
            asteroid.y + asteroid.vel_y,
            asteroid.height,
            bounds.height,
        );
    }

    fn wrap(value: f64, dim: f64) -> f64 {
        let wrapped = value.rem_euclid(dim);
        // rem_euclid can round up to exactly `dim` for tiny negative inputs
        if wrapped >= dim {
            0.0
        } else {
            wrapped
        }
    }

    fn wrap_extended(value: f64, size: f64, dim: f64) -> f64 {
        if value < -size {
            dim
        } else if value > dim {
            -size
        } else {
            value
        }
    }
}
