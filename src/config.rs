//! Minigame tuning
//!
//! Loaded from JSON by the host; every field has a default so partial files work.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::placement::PlacementPolicy;
use crate::sim::sandcastle::CastleSet;
use crate::sim::zone::ZoneShape;

/// One puzzle piece: where it belongs and where it rests in the tray
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PieceConfig {
    /// Slot the piece snaps into
    pub target: Vec2,
    /// Hand-placed tray position (used by slot shuffling)
    pub home: Vec2,
}

/// Hazard (big fish) warning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardConfig {
    pub danger_distance: f32,
}

impl Default for HazardConfig {
    fn default() -> Self {
        Self {
            danger_distance: DANGER_DISTANCE,
        }
    }
}

/// Drag-and-snap puzzle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    pub zone: ZoneShape,
    pub snap_distance: f32,
    pub celebrate_secs: f32,
    pub placement: PlacementPolicy,
    /// `null` entries are unconfigured pieces and are skipped
    pub pieces: Vec<Option<PieceConfig>>,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        let pieces = (0..5)
            .map(|i| {
                let x = -200.0 + 100.0 * i as f32;
                Some(PieceConfig {
                    target: Vec2::new(x, 150.0),
                    home: Vec2::new(x, -275.0),
                })
            })
            .collect();

        Self {
            zone: ZoneShape {
                center: Vec2::new(-10.0, 0.0),
                radius: 2.0,
            },
            snap_distance: SNAP_DISTANCE,
            celebrate_secs: PUZZLE_CELEBRATE_SECS,
            placement: PlacementPolicy::ShuffleSlots,
            pieces,
        }
    }
}

/// Staged sandcastle builder settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandcastleConfig {
    pub zone: ZoneShape,
    pub sets: Vec<CastleSet>,
    pub target_completions: u32,
    /// Number of checkmark indicators on the panel
    pub checkmark_slots: usize,
    pub slide_duration_secs: f32,
    pub slide_offset: Vec2,
    /// Resting position of the stage image
    pub stage_anchor: Vec2,
}

impl Default for SandcastleConfig {
    fn default() -> Self {
        let sets = ["pudding", "shell", "tower"]
            .iter()
            .map(|name| CastleSet {
                name: name.to_string(),
                stages: (1..=3).map(|i| format!("{name}_stage_{i}")).collect(),
                finished: format!("{name}_finished"),
            })
            .collect();

        Self {
            zone: ZoneShape {
                center: Vec2::new(10.0, 0.0),
                radius: 2.0,
            },
            sets,
            target_completions: TARGET_COMPLETIONS,
            checkmark_slots: TARGET_COMPLETIONS as usize,
            slide_duration_secs: SLIDE_DURATION_SECS,
            slide_offset: Vec2::new(SLIDE_OFFSET_X, 0.0),
            stage_anchor: Vec2::ZERO,
        }
    }
}

/// Complete minigame configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MinigameConfig {
    /// World seed; each controller draws from its own stream
    pub seed: u64,
    /// Tag identifying the actor in overlap events
    pub actor_tag: String,
    pub actor_speed: f32,
    /// One-shot sound pitch variation
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub hazard: HazardConfig,
    pub puzzle: PuzzleConfig,
    pub sandcastle: SandcastleConfig,
}

impl Default for MinigameConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EA5_1DE,
            actor_tag: PLAYER_TAG.to_string(),
            actor_speed: ACTOR_MOVE_SPEED,
            pitch_min: PITCH_MIN,
            pitch_max: PITCH_MAX,
            hazard: HazardConfig::default(),
            puzzle: PuzzleConfig::default(),
            sandcastle: SandcastleConfig::default(),
        }
    }
}

impl MinigameConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Load from a file, falling back to defaults on any failure
    pub fn load_or_default(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("No config at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };

        match Self::from_json(&json) {
            Ok(config) => {
                log::info!("Loaded minigame config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Invalid config {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Clamp out-of-range tuning to usable values
    pub fn sanitized(mut self) -> Self {
        if self.sandcastle.target_completions == 0 {
            log::warn!("target_completions must be at least 1, using 1");
            self.sandcastle.target_completions = 1;
        }
        if self.pitch_min > self.pitch_max {
            std::mem::swap(&mut self.pitch_min, &mut self.pitch_max);
        }
        self.puzzle.snap_distance = self.puzzle.snap_distance.max(0.0);
        self.puzzle.celebrate_secs = self.puzzle.celebrate_secs.max(0.0);
        self.sandcastle.slide_duration_secs = self.sandcastle.slide_duration_secs.max(0.0);
        self.hazard.danger_distance = self.hazard.danger_distance.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_observed_tuning() {
        let config = MinigameConfig::default();
        assert_eq!(config.puzzle.pieces.len(), 5);
        assert_eq!(config.puzzle.snap_distance, 50.0);
        assert_eq!(config.sandcastle.sets.len(), 3);
        assert_eq!(config.sandcastle.target_completions, 5);
        assert_eq!(config.hazard.danger_distance, 5.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = MinigameConfig::from_json(r#"{ "seed": 7, "hazard": { "danger_distance": 3.5 } }"#)
            .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.hazard.danger_distance, 3.5);
        assert_eq!(config.sandcastle.target_completions, TARGET_COMPLETIONS);
    }

    #[test]
    fn test_null_pieces_survive_parsing() {
        let json = r#"{
            "puzzle": {
                "pieces": [
                    { "target": [0.0, 0.0], "home": [10.0, 10.0] },
                    null
                ]
            }
        }"#;
        let config = MinigameConfig::from_json(json).unwrap();
        assert_eq!(config.puzzle.pieces.len(), 2);
        assert!(config.puzzle.pieces[1].is_none());
    }

    #[test]
    fn test_scatter_policy_parses() {
        let json = r#"{
            "puzzle": {
                "placement": { "Scatter": { "x_range": [-250.0, 250.0], "y_range": [-350.0, -200.0] } }
            }
        }"#;
        let config = MinigameConfig::from_json(json).unwrap();
        assert!(matches!(config.puzzle.placement, PlacementPolicy::Scatter { .. }));
    }

    #[test]
    fn test_zero_target_is_clamped() {
        let config =
            MinigameConfig::from_json(r#"{ "sandcastle": { "target_completions": 0 } }"#).unwrap();
        assert_eq!(config.sandcastle.target_completions, 1);
    }

    #[test]
    fn test_json_roundtrip_keeps_sets() {
        let config = MinigameConfig::default();
        let json = config.to_json().unwrap();
        let back = MinigameConfig::from_json(&json).unwrap();
        assert_eq!(back.sandcastle.sets, config.sandcastle.sets);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = MinigameConfig::load_or_default(Path::new("/nonexistent/tidepool.json"));
        assert_eq!(config.seed, MinigameConfig::default().seed);
    }
}
