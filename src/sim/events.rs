//! Feedback events queued by the simulation
//!
//! Presentation and audio drain these after every tick; the simulation never
//! calls out to them directly.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::hazard::Indicator;
use super::state::MinigameKind;
use crate::audio::{SoundCue, SoundEffect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Minigame panel became visible
    PanelShown(MinigameKind),
    /// Minigame panel was hidden
    PanelHidden(MinigameKind),
    /// One-shot sound request
    Sound(SoundCue),
    /// A puzzle piece snapped into its slot
    PieceLocked { piece: usize, locked: usize, total: usize },
    /// A sandcastle finished sliding off; `completed` is the new count
    CastleSetCompleted { set: usize, completed: u32 },
    /// Completion condition met for a minigame
    AllComplete(MinigameKind),
    /// Hazard frame changed colour
    IndicatorChanged(Indicator),
}

/// Random pitch variation applied to one-shot sounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchRange {
    pub min: f32,
    pub max: f32,
}

impl PitchRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Sound event with a freshly drawn pitch
    pub fn cue<R: Rng>(&self, rng: &mut R, effect: SoundEffect) -> GameEvent {
        let pitch = if self.min < self.max {
            rng.random_range(self.min..self.max)
        } else {
            self.min
        };
        GameEvent::Sound(SoundCue { effect, pitch })
    }
}

impl Default for PitchRange {
    fn default() -> Self {
        Self::new(crate::consts::PITCH_MIN, crate::consts::PITCH_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_pitch_within_range() {
        let mut rng = Pcg32::seed_from_u64(5);
        let range = PitchRange::default();
        for _ in 0..100 {
            let GameEvent::Sound(cue) = range.cue(&mut rng, SoundEffect::StageClick) else {
                panic!("expected a sound event");
            };
            assert!(cue.pitch >= 0.9 && cue.pitch < 1.1);
            assert_eq!(cue.effect, SoundEffect::StageClick);
        }
    }

    #[test]
    fn test_flat_range_is_constant() {
        let mut rng = Pcg32::seed_from_u64(6);
        let range = PitchRange::new(1.0, 1.0);
        assert_eq!(
            range.cue(&mut rng, SoundEffect::GameClear),
            GameEvent::Sound(SoundCue {
                effect: SoundEffect::GameClear,
                pitch: 1.0
            })
        );
    }
}
