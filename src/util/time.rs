//! Time utilities for the game clock and HUD

/// Default simulation tick period in milliseconds
pub const DEFAULT_TICK_MS: u64 = 100;
/// Default period between periodic asteroid spawns
pub const DEFAULT_SPAWN_INTERVAL_MS: u64 = 10_000;
/// Default render frame period (~60 frames per second)
pub const DEFAULT_FRAME_MS: u64 = 16;
/// Longest accepted tick, spawn or frame period (one day)
pub const MAX_PERIOD_MS: u64 = 86_400_000;
/// Default wait before a held key counts as released; longer than the
/// usual 660 ms X11 auto-repeat delay
pub const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u64 = 750;

/// Format a duration in milliseconds as `m:ss.mmm`
pub fn format_time(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    format!("{}:{:02}.{:03}", minutes, seconds, millis)
}
