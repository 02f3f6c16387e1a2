//! Keyboard input tracking - held key to direction vector and facing

use serde::Serialize;

/// Distance the ship travels per tick while a direction key is held
pub const PLAYER_STEP: f64 = 5.0;

/// Keys the game can receive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    /// Anything without a gameplay meaning
    Other,
}

/// Ship facing, drawn as a rotation of the sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Facing {
    /// Clockwise sprite rotation in degrees
    pub fn degrees(self) -> i32 {
        match self {
            Facing::Up => 0,
            Facing::Right => 90,
            Facing::Down => 180,
            Facing::Left => -90,
        }
    }

    pub fn radians(self) -> f64 {
        f64::from(self.degrees()).to_radians()
    }
}

/// Tracks the most recent key state. No queuing: the last event wins.
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    direction: (f64, f64),
    facing: Facing,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        let (direction, facing) = match key {
            Key::Left => ((-PLAYER_STEP, 0.0), Facing::Left),
            Key::Right => ((PLAYER_STEP, 0.0), Facing::Right),
            Key::Up => ((0.0, -PLAYER_STEP), Facing::Up),
            Key::Down => ((0.0, PLAYER_STEP), Facing::Down),
            Key::Other => return,
        };
        self.direction = direction;
        self.facing = facing;
    }

    /// Any release stops the ship; facing is kept
    pub fn key_up(&mut self, _key: Key) {
        self.direction = (0.0, 0.0);
    }

    pub fn direction(&self) -> (f64, f64) {
        self.direction
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
