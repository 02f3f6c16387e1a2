//! Game session task: owns the state and runs the fixed-tick loop

use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::store::BestTimeStore;

use super::spawn::Spawner;
use super::state::GameEvent;
use super::{Bounds, GameState, Key, Snapshot};

/// Commands accepted by a running session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    KeyDown(Key),
    KeyUp(Key),
    /// Start a new run; best time is kept
    Restart,
    /// Stop the session, as closing the page does
    Shutdown,
}

/// Handle to a running session
#[derive(Clone)]
pub struct SessionHandle {
    pub command_tx: mpsc::Sender<SessionCommand>,
    pub snapshot_rx: watch::Receiver<Snapshot>,
}

impl SessionHandle {
    /// Send a command; returns false once the session has stopped
    pub async fn send(&self, command: SessionCommand) -> bool {
        self.command_tx.send(command).await.is_ok()
    }

    /// Latest published snapshot
    pub fn latest(&self) -> Snapshot {
        self.snapshot_rx.borrow().clone()
    }
}

/// The single-player game session
pub struct GameSession {
    state: GameState,
    spawner: Spawner,
    best_store: BestTimeStore,
    command_rx: mpsc::Receiver<SessionCommand>,
    snapshot_tx: watch::Sender<Snapshot>,
    tick: Duration,
    spawn_interval: Duration,
    initial_asteroids: usize,
    keep_best_time: bool,
}

impl GameSession {
    /// Create a session with a fresh initial asteroid population
    pub fn new(
        config: &Config,
        mut spawner: Spawner,
        best_store: BestTimeStore,
    ) -> (Self, SessionHandle) {
        let (command_tx, command_rx) = mpsc::channel(64);

        let asteroids = spawner.initial_population(config.initial_asteroids, config.bounds);
        let state = GameState::new(
            config.bounds,
            config.tick.as_millis() as u64,
            config.game_over_motion,
            asteroids,
            best_store.load(),
        );
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::capture(&state));

        let session = Self {
            state,
            spawner,
            best_store,
            command_rx,
            snapshot_tx,
            tick: config.tick,
            spawn_interval: config.spawn_interval,
            initial_asteroids: config.initial_asteroids,
            keep_best_time: config.keep_best_time,
        };
        let handle = SessionHandle {
            command_tx,
            snapshot_rx,
        };

        (session, handle)
    }

    fn bounds(&self) -> Bounds {
        self.state.bounds
    }

    /// Run the tick loop until shutdown or until every handle is dropped
    pub async fn run(mut self) {
        info!(
            run_id = %self.state.run_id,
            asteroids = self.state.asteroids.len(),
            best_ms = self.state.best_ms,
            "Session started"
        );

        let start = Instant::now();
        let mut tick_interval = interval_at(start + self.tick, self.tick);
        tick_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut spawn_interval = interval_at(start + self.spawn_interval, self.spawn_interval);
        spawn_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = tick_interval.tick() => {
                    let events = self.state.step();
                    self.handle_events(events).await;
                }
                _ = spawn_interval.tick() => {
                    let asteroid = self.spawner.spawn(self.bounds());
                    self.state.add_asteroid(asteroid);
                    debug!(
                        run_id = %self.state.run_id,
                        asteroids = self.state.asteroids.len(),
                        "Asteroid spawned"
                    );
                }
                command = self.command_rx.recv() => match command {
                    Some(SessionCommand::KeyDown(key)) => self.state.key_down(key),
                    Some(SessionCommand::KeyUp(key)) => self.state.key_up(key),
                    Some(SessionCommand::Restart) => self.restart(),
                    Some(SessionCommand::Shutdown) | None => break,
                },
            }

            self.publish();
        }

        self.teardown().await;
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(Snapshot::capture(&self.state));
    }

    async fn handle_events(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::GameOver {
                    run_id,
                    elapsed_ms,
                    new_best,
                } => {
                    info!(run_id = %run_id, elapsed_ms, new_best, "Game over");
                    if let Ok(json) = serde_json::to_string(&Snapshot::capture(&self.state)) {
                        debug!(run_id = %run_id, snapshot = %json, "Final snapshot");
                    }

                    if new_best {
                        if let Err(e) = self.best_store.save(elapsed_ms).await {
                            warn!(run_id = %run_id, error = %e, "Failed to persist best time");
                        }
                    }
                }
            }
        }
    }

    fn restart(&mut self) {
        let asteroids = self
            .spawner
            .initial_population(self.initial_asteroids, self.bounds());
        let previous = self.state.run_id;
        self.state.restart(asteroids);
        info!(
            run_id = %self.state.run_id,
            previous_run_id = %previous,
            best_ms = self.state.best_ms,
            "Run restarted"
        );
    }

    async fn teardown(&mut self) {
        if !self.keep_best_time {
            if let Err(e) = self.best_store.clear().await {
                warn!(error = %e, "Failed to clear best time");
            }
        }
        info!(
            run_id = %self.state.run_id,
            ticks = self.state.tick,
            best_ms = self.state.best_ms,
            "Session ended"
        );
    }
}
