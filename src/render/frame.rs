//! Snapshot to draw-command translation

use std::sync::Arc;

use crate::game::entities::{ASTEROID_DRAW_SCALE, SHIP_DRAW_SCALE};
use crate::game::Snapshot;
use crate::util::time::format_time;

use super::sprite::{Assets, Sprite};
use super::stars::Starfield;

/// Radius of a background star
pub const STAR_RADIUS: f64 = 1.0;

/// Which sprite a draw command refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    Ship,
    Asteroid,
}

/// One drawing operation, in playfield coordinates (y grows downward)
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Star {
        x: f64,
        y: f64,
        radius: f64,
    },
    Sprite {
        kind: SpriteKind,
        sprite: Arc<Sprite>,
        center: (f64, f64),
        width: f64,
        height: f64,
        /// Clockwise, radians
        rotation: f64,
    },
    Hud {
        time: String,
        best: String,
    },
    GameOver {
        time: String,
        best: String,
    },
}

/// Build the draw list for one frame. Sprites that have not loaded are
/// skipped without complaint.
pub fn build_frame(snapshot: &Snapshot, stars: &Starfield, assets: &Assets) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(stars.stars().len() + snapshot.asteroids.len() + 4);
    commands.push(DrawCommand::Clear);

    commands.extend(stars.stars().iter().map(|star| DrawCommand::Star {
        x: star.x,
        y: star.y,
        radius: STAR_RADIUS,
    }));

    if let Some(ship) = assets.ship() {
        let player = &snapshot.player;
        commands.push(DrawCommand::Sprite {
            kind: SpriteKind::Ship,
            sprite: ship,
            center: player.drawn_center(),
            width: player.width * SHIP_DRAW_SCALE,
            height: player.height * SHIP_DRAW_SCALE,
            rotation: snapshot.facing.radians(),
        });
    }

    if let Some(rock) = assets.asteroid() {
        commands.extend(snapshot.asteroids.iter().map(|asteroid| DrawCommand::Sprite {
            kind: SpriteKind::Asteroid,
            sprite: rock.clone(),
            center: asteroid.drawn_center(),
            width: asteroid.width * ASTEROID_DRAW_SCALE,
            height: asteroid.height * ASTEROID_DRAW_SCALE,
            rotation: 0.0,
        }));
    }

    let time = format_time(snapshot.elapsed_ms);
    let best = format_time(snapshot.best_ms);
    if snapshot.game_over {
        commands.push(DrawCommand::GameOver {
            time: time.clone(),
            best: best.clone(),
        });
    }
    commands.push(DrawCommand::Hud { time, best });

    commands
}
