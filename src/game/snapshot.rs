//! Immutable view of the game state handed to the renderer

use serde::Serialize;
use uuid::Uuid;

use super::{Asteroid, Bounds, Facing, GameState, Player};

/// Everything a frame needs, copied out of the session task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub run_id: Uuid,
    pub tick: u64,
    pub bounds: Bounds,
    pub player: Player,
    pub facing: Facing,
    pub asteroids: Vec<Asteroid>,
    pub elapsed_ms: u64,
    pub best_ms: u64,
    pub game_over: bool,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        Self {
            run_id: state.run_id,
            tick: state.tick,
            bounds: state.bounds,
            player: state.player,
            facing: state.input.facing(),
            asteroids: state.asteroids.clone(),
            elapsed_ms: state.elapsed_ms,
            best_ms: state.best_ms,
            game_over: state.game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameOverMotion, Key};

    #[test]
    fn capture_copies_render_state() {
        let bounds = Bounds::new(640.0, 480.0);
        let rocks = vec![Asteroid::new(-60.0, 12.0, 4.0, 0.0)];
        let mut state = GameState::new(bounds, 50, GameOverMotion::Freeze, rocks.clone(), 1_500);
        state.key_down(Key::Right);
        state.step();

        let snapshot = Snapshot::capture(&state);
        assert_eq!(snapshot.run_id, state.run_id);
        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.facing, Facing::Right);
        assert_eq!(snapshot.player, state.player);
        assert_eq!(snapshot.asteroids, state.asteroids);
        assert_eq!(snapshot.elapsed_ms, 50);
        assert_eq!(snapshot.best_ms, 1_500);
        assert!(!snapshot.game_over);
    }

    #[test]
    fn serializes_for_debug_dumps() {
        let state = GameState::new(
            Bounds::new(100.0, 100.0),
            100,
            GameOverMotion::Freeze,
            Vec::new(),
            0,
        );
        let json = serde_json::to_value(Snapshot::capture(&state)).unwrap();
        assert_eq!(json["facing"], "up");
        assert_eq!(json["game_over"], false);
        assert_eq!(json["player"]["width"], 30.0);
    }
}
