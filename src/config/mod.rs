//! Configuration module - environment variable parsing

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::game::{Bounds, GameOverMotion};
use crate::util::time::{
    DEFAULT_FRAME_MS, DEFAULT_KEY_RELEASE_TIMEOUT_MS, DEFAULT_SPAWN_INTERVAL_MS, DEFAULT_TICK_MS,
    MAX_PERIOD_MS,
};

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// File receiving log output; the terminal is owned by the game
    pub log_file: PathBuf,
    pub log_format: LogFormat,

    /// Logical playfield size, independent of terminal size
    pub bounds: Bounds,
    /// Simulation tick period
    pub tick: Duration,
    /// Period between periodic asteroid spawns
    pub spawn_interval: Duration,
    /// Render frame period
    pub frame: Duration,
    /// Asteroids present at start and after every restart
    pub initial_asteroids: usize,
    pub star_count: usize,
    /// What asteroids do once the game-over latch is set
    pub game_over_motion: GameOverMotion,
    /// RNG seed; random when unset
    pub seed: Option<u64>,

    /// Directory holding the ship and asteroid sprites
    pub asset_dir: PathBuf,
    /// Key-value file standing in for browser local storage
    pub storage_path: PathBuf,
    /// Keep the best time when the program exits instead of clearing it
    pub keep_best_time: bool,
    /// Fallback key-release detection for terminals without release events
    pub key_release_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let width: f64 = parse_or(&lookup, "WORLD_WIDTH", 1280.0)?;
        let height: f64 = parse_or(&lookup, "WORLD_HEIGHT", 720.0)?;
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            return Err(ConfigError::InvalidBounds { width, height });
        }

        let tick_ms: u64 = parse_or(&lookup, "TICK_MS", DEFAULT_TICK_MS)?;
        let spawn_ms: u64 = parse_or(&lookup, "SPAWN_INTERVAL_MS", DEFAULT_SPAWN_INTERVAL_MS)?;
        let frame_ms: u64 = parse_or(&lookup, "FRAME_MS", DEFAULT_FRAME_MS)?;
        for (var, value) in [
            ("TICK_MS", tick_ms),
            ("SPAWN_INTERVAL_MS", spawn_ms),
            ("FRAME_MS", frame_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroPeriod(var));
            }
            if value > MAX_PERIOD_MS {
                return Err(ConfigError::PeriodTooLong {
                    var,
                    max_ms: MAX_PERIOD_MS,
                });
            }
        }

        let seed = match lookup("SEED") {
            Some(raw) => Some(raw.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "SEED",
                value: raw,
            })?),
            None => None,
        };

        Ok(Self {
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_file: lookup("LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("asteroid-dodge.log")),
            log_format: parse_or(&lookup, "LOG_FORMAT", LogFormat::Pretty)?,

            bounds: Bounds::new(width, height),
            tick: Duration::from_millis(tick_ms),
            spawn_interval: Duration::from_millis(spawn_ms),
            frame: Duration::from_millis(frame_ms),
            initial_asteroids: parse_or(&lookup, "INITIAL_ASTEROIDS", 5)?,
            star_count: parse_or(&lookup, "STAR_COUNT", 100)?,
            game_over_motion: parse_or(&lookup, "GAME_OVER_MOTION", GameOverMotion::Freeze)?,
            seed,

            asset_dir: lookup("ASSET_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("assets")),
            storage_path: lookup("STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".asteroid-dodge.json")),
            keep_best_time: parse_or(&lookup, "KEEP_BEST_TIME", false)?,
            key_release_timeout: Duration::from_millis(parse_or(
                &lookup,
                "KEY_RELEASE_TIMEOUT_MS",
                DEFAULT_KEY_RELEASE_TIMEOUT_MS,
            )?),
        })
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    ZeroPeriod(&'static str),

    #[error("{var} must be at most {max_ms} ms")]
    PeriodTooLong { var: &'static str, max_ms: u64 },

    #[error("Playfield must have a finite positive size, got {width}x{height}")]
    InvalidBounds { width: f64, height: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_with(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_match_the_classic_game() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.tick, Duration::from_millis(100));
        assert_eq!(config.spawn_interval, Duration::from_secs(10));
        assert_eq!(config.initial_asteroids, 5);
        assert_eq!(config.star_count, 100);
        assert_eq!(config.game_over_motion, GameOverMotion::Freeze);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.keep_best_time);
        assert!(config.seed.is_none());
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_with(&[
            ("TICK_MS", "50"),
            ("WORLD_WIDTH", "800"),
            ("GAME_OVER_MOTION", "drift"),
            ("LOG_FORMAT", "JSON"),
            ("SEED", "42"),
            ("KEEP_BEST_TIME", "true"),
        ])
        .unwrap();
        assert_eq!(config.tick, Duration::from_millis(50));
        assert_eq!(config.bounds.width, 800.0);
        assert_eq!(config.game_over_motion, GameOverMotion::Drift);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.seed, Some(42));
        assert!(config.keep_best_time);
    }

    #[test]
    fn rejects_garbage() {
        let err = config_with(&[("STAR_COUNT", "lots")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "STAR_COUNT",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_tick() {
        let err = config_with(&[("TICK_MS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroPeriod("TICK_MS")));
    }

    #[test]
    fn rejects_empty_playfield() {
        let err = config_with(&[("WORLD_HEIGHT", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBounds { .. }));
    }

    #[test]
    fn rejects_infinite_playfield() {
        for (var, value) in [("WORLD_WIDTH", "inf"), ("WORLD_HEIGHT", "infinity")] {
            let err = config_with(&[(var, value)]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidBounds { .. }), "{var}={value}");
        }
        let err = config_with(&[("WORLD_WIDTH", "NaN")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBounds { .. }));
    }

    #[test]
    fn rejects_huge_period() {
        let huge = u64::MAX.to_string();
        for var in ["TICK_MS", "SPAWN_INTERVAL_MS", "FRAME_MS"] {
            let err = config_with(&[(var, huge.as_str())]).unwrap_err();
            assert!(
                matches!(err, ConfigError::PeriodTooLong { var: v, .. } if v == var),
                "{var}"
            );
        }

        let config = config_with(&[("SPAWN_INTERVAL_MS", "86400000")]).unwrap();
        assert_eq!(config.spawn_interval, Duration::from_secs(86_400));
    }

    #[test]
    fn key_release_timeout_outlasts_the_auto_repeat_delay() {
        let config = config_with(&[]).unwrap();
        assert_eq!(config.key_release_timeout, Duration::from_millis(750));
    }
}
