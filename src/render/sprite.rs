//! Text sprites and their asynchronous loading

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

pub const SHIP_SPRITE_FILE: &str = "spaceship.txt";
pub const ASTEROID_SPRITE_FILE: &str = "asteroid.txt";

/// Sub-samples per cell edge when rasterizing
const SAMPLES_PER_CELL: usize = 2;

/// A monochrome sprite parsed from a text grid. Spaces and `.` are empty,
/// every other character is a filled cell. Leading and trailing blank lines
/// are ignored. Cells are stored normalized to the unit square.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    cols: usize,
    rows: usize,
    cells: Vec<(f64, f64)>,
}

impl Sprite {
    /// Parse a sprite; returns `None` when nothing is filled
    pub fn parse(text: &str) -> Option<Self> {
        let lines: Vec<&str> = text.lines().collect();
        let first = lines.iter().position(|l| !l.trim().is_empty())?;
        let last = lines.iter().rposition(|l| !l.trim().is_empty())?;
        let lines = &lines[first..=last];
        let rows = lines.len();
        let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if rows == 0 || cols == 0 {
            return None;
        }

        let step = 1.0 / SAMPLES_PER_CELL as f64;
        let mut cells = Vec::new();
        for (row, line) in lines.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                if ch.is_whitespace() || ch == '.' {
                    continue;
                }
                for sy in 0..SAMPLES_PER_CELL {
                    for sx in 0..SAMPLES_PER_CELL {
                        let u = (col as f64 + (sx as f64 + 0.5) * step) / cols as f64;
                        let v = (row as f64 + (sy as f64 + 0.5) * step) / rows as f64;
                        cells.push((u, v));
                    }
                }
            }
        }

        if cells.is_empty() {
            None
        } else {
            Some(Self { cols, rows, cells })
        }
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Filled points in world coordinates for a sprite drawn `width` x
    /// `height` around `center`, rotated clockwise by `rotation` radians
    /// (y grows downward)
    pub fn points(
        &self,
        center: (f64, f64),
        width: f64,
        height: f64,
        rotation: f64,
    ) -> Vec<(f64, f64)> {
        let (sin, cos) = rotation.sin_cos();
        self.cells
            .iter()
            .map(|&(u, v)| {
                let lx = (u - 0.5) * width;
                let ly = (v - 0.5) * height;
                (
                    center.0 + lx * cos - ly * sin,
                    center.1 + lx * sin + ly * cos,
                )
            })
            .collect()
    }
}

type SpriteSlot = Arc<OnceLock<Arc<Sprite>>>;

/// Ship and asteroid sprites. Each slot fills in once its file has loaded;
/// until then (or forever, if loading fails) the sprite is absent.
#[derive(Clone, Default)]
pub struct Assets {
    ship: SpriteSlot,
    asteroid: SpriteSlot,
}

impl Assets {
    /// Start loading both sprites in the background
    pub fn load(asset_dir: &Path) -> Self {
        let assets = Self::default();
        spawn_load(asset_dir.join(SHIP_SPRITE_FILE), assets.ship.clone());
        spawn_load(asset_dir.join(ASTEROID_SPRITE_FILE), assets.asteroid.clone());
        assets
    }

    /// Assets with both sprites already present
    #[cfg(test)]
    pub fn preloaded(ship: Sprite, asteroid: Sprite) -> Self {
        let assets = Self::default();
        let _ = assets.ship.set(Arc::new(ship));
        let _ = assets.asteroid.set(Arc::new(asteroid));
        assets
    }

    pub fn ship(&self) -> Option<Arc<Sprite>> {
        self.ship.get().cloned()
    }

    pub fn asteroid(&self) -> Option<Arc<Sprite>> {
        self.asteroid.get().cloned()
    }
}

fn spawn_load(path: PathBuf, slot: SpriteSlot) {
    tokio::spawn(async move {
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => match Sprite::parse(&text) {
                Some(sprite) => {
                    debug!(path = %path.display(), dimensions = ?sprite.dimensions(), "Sprite loaded");
                    let _ = slot.set(Arc::new(sprite));
                }
                None => warn!(path = %path.display(), "Sprite file has no filled cells"),
            },
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to load sprite"),
        }
    });
}
