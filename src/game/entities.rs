//! Player and asteroid entities

use serde::Serialize;

use super::Bounds;

pub const PLAYER_SIZE: f64 = 30.0;
pub const ASTEROID_SIZE: f64 = 40.0;

/// Ship sprite is drawn at twice its logical size
pub const SHIP_DRAW_SCALE: f64 = 2.0;
/// Asteroid sprite is drawn at one and a half times its logical size
pub const ASTEROID_DRAW_SCALE: f64 = 1.5;

/// The one player-controlled ship. Position is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Player {
    /// Ship centered on the playfield
    pub fn centered(bounds: Bounds) -> Self {
        Self {
            x: bounds.width / 2.0 - PLAYER_SIZE / 2.0,
            y: bounds.height / 2.0 - PLAYER_SIZE / 2.0,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
        }
    }

    #[cfg(test)]
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            width: PLAYER_SIZE,
            height: PLAYER_SIZE,
        }
    }

    /// Point the sprite is rotated around and drawn centered on
    pub fn drawn_center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Asteroid {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub vel_x: f64,
    pub vel_y: f64,
}

impl Asteroid {
    pub fn new(x: f64, y: f64, vel_x: f64, vel_y: f64) -> Self {
        Self {
            x,
            y,
            width: ASTEROID_SIZE,
            height: ASTEROID_SIZE,
            vel_x,
            vel_y,
        }
    }

    /// Center of the sprite, which is drawn scaled from the top-left corner
    pub fn drawn_center(&self) -> (f64, f64) {
        (
            self.x + self.width * ASTEROID_DRAW_SCALE / 2.0,
            self.y + self.height * ASTEROID_DRAW_SCALE / 2.0,
        )
    }
}
