//! Sound cues emitted by the minigames
//!
//! The simulation never plays audio itself. It queues `SoundCue`s as
//! `GameEvent::Sound` and the host hands them to an `AudioSink`.

use serde::{Deserialize, Serialize};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Puzzle piece picked up
    PiecePickup,
    /// Puzzle piece snapped into its slot
    PieceLock,
    /// Every puzzle piece locked
    PuzzleClear,
    /// Sandcastle stage advanced
    StageClick,
    /// Sandcastle set finished, slide starts
    SetComplete,
    /// All sandcastles built
    GameClear,
}

impl SoundEffect {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::PiecePickup => "piece_pickup",
            SoundEffect::PieceLock => "piece_lock",
            SoundEffect::PuzzleClear => "puzzle_clear",
            SoundEffect::StageClick => "stage_click",
            SoundEffect::SetComplete => "set_complete",
            SoundEffect::GameClear => "game_clear",
        }
    }
}

/// A one-shot sound request with its randomized pitch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundCue {
    pub effect: SoundEffect,
    pub pitch: f32,
}

/// Anything that can play one-shot sounds
pub trait AudioSink {
    fn play_one_shot(&mut self, cue: SoundCue);
}

/// Audio sink for headless runs: logs every cue at the effective volume
#[derive(Debug, Clone)]
pub struct LogAudio {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    played: u32,
}

impl Default for LogAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl LogAudio {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            played: 0,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set sound effects volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Number of cues that were audible
    pub fn played(&self) -> u32 {
        self.played
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }
}

impl AudioSink for LogAudio {
    fn play_one_shot(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.played += 1;
        log::info!(
            "♪ {} (pitch {:.2}, volume {:.2})",
            cue.effect.as_str(),
            cue.pitch,
            vol
        );
    }
}
