//! Authoritative game state and the per-tick step

use uuid::Uuid;

use super::collision::CollisionSystem;
use super::physics::PhysicsSystem;
use super::{Asteroid, Bounds, GameOverMotion, InputTracker, Key, Player};

/// Notable outcomes of a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The ship hit an asteroid and the run ended
    GameOver {
        run_id: Uuid,
        elapsed_ms: u64,
        /// The run beat the previous best
        new_best: bool,
    },
}

/// Game state (owned by the session task)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Identifies the current run in logs
    pub run_id: Uuid,
    pub bounds: Bounds,
    pub tick_ms: u64,
    /// Ticks simulated since program start
    pub tick: u64,
    pub player: Player,
    pub asteroids: Vec<Asteroid>,
    pub input: InputTracker,
    /// Survival time of the current run
    pub elapsed_ms: u64,
    /// Longest run seen so far
    pub best_ms: u64,
    pub game_over: bool,
    pub game_over_motion: GameOverMotion,
}

impl GameState {
    pub fn new(
        bounds: Bounds,
        tick_ms: u64,
        game_over_motion: GameOverMotion,
        asteroids: Vec<Asteroid>,
        best_ms: u64,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            bounds,
            tick_ms,
            tick: 0,
            player: Player::centered(bounds),
            asteroids,
            input: InputTracker::new(),
            elapsed_ms: 0,
            best_ms,
            game_over: false,
            game_over_motion,
        }
    }

    pub fn key_down(&mut self, key: Key) {
        self.input.key_down(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.key_up(key);
    }

    /// Append a freshly spawned asteroid
    pub fn add_asteroid(&mut self, asteroid: Asteroid) {
        self.asteroids.push(asteroid);
    }

    /// Run a single simulation tick
    pub fn step(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.tick += 1;

        if self.game_over {
            if self.game_over_motion == GameOverMotion::Drift {
                self.move_asteroids();
            }
            return events;
        }

        PhysicsSystem::step_player(&mut self.player, self.input.direction(), self.bounds);
        self.move_asteroids();
        self.elapsed_ms += self.tick_ms;

        if let Some(event) = self.check_collisions() {
            events.push(event);
        }

        events
    }

    fn move_asteroids(&mut self) {
        for asteroid in &mut self.asteroids {
            PhysicsSystem::step_asteroid(asteroid, self.bounds);
        }
    }

    /// Latch game-over on the first overlapping asteroid
    fn check_collisions(&mut self) -> Option<GameEvent> {
        let facing = self.input.facing();
        let hit = self
            .asteroids
            .iter()
            .any(|asteroid| CollisionSystem::collides(&self.player, asteroid, facing));
        if !hit {
            return None;
        }

        self.game_over = true;
        let new_best = self.elapsed_ms > self.best_ms;
        if new_best {
            self.best_ms = self.elapsed_ms;
        }

        Some(GameEvent::GameOver {
            run_id: self.run_id,
            elapsed_ms: self.elapsed_ms,
            new_best,
        })
    }

    /// Start a new run. The best time survives.
    pub fn restart(&mut self, asteroids: Vec<Asteroid>) {
        self.run_id = Uuid::new_v4();
        self.asteroids = asteroids;
        self.player = Player::centered(self.bounds);
        self.input.reset();
        self.game_over = false;
        self.elapsed_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Facing;

    const BOUNDS: Bounds = Bounds {
        width: 800.0,
        height: 600.0,
    };

    fn empty_state() -> GameState {
        GameState::new(BOUNDS, 100, GameOverMotion::Freeze, Vec::new(), 0)
    }

    /// Asteroid parked on top of the ship
    fn asteroid_on_player(state: &GameState) -> Asteroid {
        Asteroid::new(state.player.x, state.player.y, 0.0, 0.0)
    }

    #[test]
    fn starts_centered_and_running() {
        let state = empty_state();
        assert_eq!(state.player, Player::at(385.0, 285.0));
        assert!(!state.game_over);
        assert_eq!(state.elapsed_ms, 0);
    }

    #[test]
    fn clock_advances_one_tick_per_step() {
        let mut state = empty_state();
        for n in 1..=25 {
            assert!(state.step().is_empty());
            assert_eq!(state.elapsed_ms, n * 100);
        }
    }

    #[test]
    fn held_key_moves_the_player_each_tick() {
        let mut state = empty_state();
        state.key_down(Key::Left);
        state.step();
        state.step();
        assert_eq!(state.player.x, 375.0);
        state.key_up(Key::Left);
        state.step();
        assert_eq!(state.player.x, 375.0);
    }

    #[test]
    fn collision_latches_game_over_and_freezes_the_clock() {
        let mut state = empty_state();
        state.step();
        let rock = asteroid_on_player(&state);
        state.add_asteroid(rock);

        let events = state.step();
        assert_eq!(
            events,
            vec![GameEvent::GameOver {
                run_id: state.run_id,
                elapsed_ms: 200,
                new_best: true,
            }]
        );
        assert!(state.game_over);

        state.key_down(Key::Right);
        let player = state.player;
        for _ in 0..10 {
            assert!(state.step().is_empty());
        }
        assert_eq!(state.elapsed_ms, 200);
        assert_eq!(state.player, player);
    }

    #[test]
    fn many_overlaps_report_a_single_game_over() {
        let mut state = empty_state();
        for _ in 0..4 {
            let rock = asteroid_on_player(&state);
            state.add_asteroid(rock);
        }
        assert_eq!(state.step().len(), 1);
    }

    #[test]
    fn freeze_stops_asteroids_after_game_over() {
        let mut state = empty_state();
        let rock = asteroid_on_player(&state);
        state.add_asteroid(rock);
        state.add_asteroid(Asteroid::new(10.0, 10.0, 2.0, 0.0));
        state.step();
        assert!(state.game_over);

        let before = state.asteroids.clone();
        state.step();
        assert_eq!(state.asteroids, before);
    }

    #[test]
    fn drift_keeps_asteroids_moving_after_game_over() {
        let mut state = GameState::new(BOUNDS, 100, GameOverMotion::Drift, Vec::new(), 0);
        let rock = asteroid_on_player(&state);
        state.add_asteroid(rock);
        state.add_asteroid(Asteroid::new(10.0, 10.0, 2.0, 0.0));
        state.step();
        assert!(state.game_over);

        state.step();
        assert_eq!(state.asteroids[1].x, 14.0);
        assert_eq!(state.elapsed_ms, 100);
    }

    #[test]
    fn shorter_run_keeps_the_old_best() {
        let mut state = GameState::new(BOUNDS, 100, GameOverMotion::Freeze, Vec::new(), 5_000);
        let rock = asteroid_on_player(&state);
        state.add_asteroid(rock);
        let events = state.step();
        assert!(matches!(
            events[..],
            [GameEvent::GameOver {
                new_best: false,
                elapsed_ms: 100,
                ..
            }]
        ));
        assert_eq!(state.best_ms, 5_000);
    }

    #[test]
    fn equal_run_is_not_a_new_best() {
        let mut state = GameState::new(BOUNDS, 100, GameOverMotion::Freeze, Vec::new(), 300);
        state.step();
        state.step();
        let rock = asteroid_on_player(&state);
        state.add_asteroid(rock);
        let events = state.step();
        assert!(matches!(
            events[..],
            [GameEvent::GameOver {
                new_best: false,
                elapsed_ms: 300,
                ..
            }]
        ));
        assert_eq!(state.best_ms, 300);
    }

    #[test]
    fn restart_resets_the_run_but_keeps_the_best() {
        let mut state = empty_state();
        for _ in 0..7 {
            state.step();
        }
        state.key_down(Key::Down);
        let rock = asteroid_on_player(&state);
        state.add_asteroid(rock);
        state.step();
        assert!(state.game_over);
        assert_eq!(state.best_ms, 800);

        let old_run = state.run_id;
        let fresh = vec![Asteroid::new(-60.0, 10.0, 3.0, 0.0)];
        state.restart(fresh.clone());

        assert_ne!(state.run_id, old_run);
        assert!(!state.game_over);
        assert_eq!(state.elapsed_ms, 0);
        assert_eq!(state.best_ms, 800);
        assert_eq!(state.asteroids, fresh);
        assert_eq!(state.player, Player::centered(BOUNDS));
        assert_eq!(state.input.direction(), (0.0, 0.0));
        assert_eq!(state.input.facing(), Facing::Up);
    }
}
