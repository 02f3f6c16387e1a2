//! Game simulation modules

pub mod collision;
pub mod entities;
pub mod input;
pub mod physics;
pub mod session;
pub mod snapshot;
pub mod spawn;
pub mod state;

pub use entities::{Asteroid, Player};
pub use input::{Facing, InputTracker, Key};
pub use session::{GameSession, SessionCommand, SessionHandle};
pub use snapshot::Snapshot;
pub use state::GameState;

use serde::Serialize;
use std::str::FromStr;

/// Logical playfield size
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Asteroid behaviour after the game-over latch is set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameOverMotion {
    /// The whole world stops
    #[default]
    Freeze,
    /// Asteroids keep integrating; only the player and clock stop
    Drift,
}

impl FromStr for GameOverMotion {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "freeze" => Ok(Self::Freeze),
            "drift" => Ok(Self::Drift),
            _ => Err(()),
        }
    }
}
