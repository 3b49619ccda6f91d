//! Tidepool - proximity-gated beach minigames
//!
//! Core modules:
//! - `sim`: Deterministic minigame simulation (zones, puzzle, sandcastle, hazard)
//! - `audio`: Sound cue types and the sink that plays them
//! - `config`: Data-driven minigame tuning

pub mod audio;
pub mod config;
pub mod sim;

pub use audio::{AudioSink, LogAudio, SoundCue, SoundEffect};
pub use config::MinigameConfig;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the demo driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Tag carried by overlap events from the player's collider
    pub const PLAYER_TAG: &str = "Player";

    /// Puzzle defaults
    pub const SNAP_DISTANCE: f32 = 50.0;
    /// Non-interactive celebration before the puzzle panel closes (seconds)
    pub const PUZZLE_CELEBRATE_SECS: f32 = 1.5;
    /// Alpha applied to a piece while it is being dragged
    pub const DRAG_ALPHA: f32 = 0.8;

    /// Sandcastle defaults
    pub const SLIDE_DURATION_SECS: f32 = 0.4;
    /// Horizontal distance the finished castle slides off screen
    pub const SLIDE_OFFSET_X: f32 = 1500.0;
    /// Castles to finish before the sandcastle game is cleared
    pub const TARGET_COMPLETIONS: u32 = 5;

    /// Hazard (big fish) warning distance in world units
    pub const DANGER_DISTANCE: f32 = 5.0;

    /// Random pitch variation for one-shot sounds
    pub const PITCH_MIN: f32 = 0.9;
    pub const PITCH_MAX: f32 = 1.1;

    /// Player walking speed in world units per second
    pub const ACTOR_MOVE_SPEED: f32 = 5.0;
}

/// Linear interpolation between two points, `t` clamped to [0, 1]
#[inline]
pub fn lerp_clamped(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    from.lerp(to, t.clamp(0.0, 1.0))
}

/// Drag speed normalization; degenerate scale factors fall back to 1
#[inline]
pub fn sanitize_scale(scale: f32) -> f32 {
    if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    }
}
