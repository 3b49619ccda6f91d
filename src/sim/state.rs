//! World state shared by the minigames
//!
//! Owns both controllers, their zones, the actor and the two pieces of
//! presentation state written from more than one place: the hazard frame and
//! the world sandcastle.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, PitchRange};
use super::hazard::{HazardMonitor, Indicator};
use super::puzzle::PuzzleController;
use super::sandcastle::{SandcastleController, WorldCastle};
use super::zone::InteractionZone;
use crate::config::MinigameConfig;

/// Which minigame an event or zone belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinigameKind {
    Puzzle,
    Sandcastle,
}

/// The player walking around the beach
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    /// World units per second
    pub speed: f32,
}

impl Actor {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self { pos, speed }
    }

    /// Direct input translation; diagonal input is not faster
    pub fn step(&mut self, axis: Vec2, dt: f32) {
        self.pos += axis.normalize_or_zero() * self.speed * dt;
    }
}

/// RNG stream description for one controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64, stream: u64) -> Self {
        Self { seed, stream }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }
}

/// RNG streams, one per controller so their draws never interleave
const PUZZLE_STREAM: u64 = 1;
const SANDCASTLE_STREAM: u64 = 2;

/// Complete minigame world
#[derive(Debug, Clone)]
pub struct World {
    /// Seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub actor: Actor,
    /// Current hazard (big fish) position, if one exists
    pub hazard_pos: Option<Vec2>,
    pub puzzle_zone: InteractionZone,
    pub sandcastle_zone: InteractionZone,
    pub puzzle: PuzzleController,
    pub sandcastle: SandcastleController,
    /// Frame colour shown around whichever panel is open
    pub indicator: Indicator,
    pub world_castle: WorldCastle,
    /// Feedback queued this tick, drained by the host
    pub events: Vec<GameEvent>,
}

impl World {
    pub fn new(config: &MinigameConfig) -> Self {
        let hazard = HazardMonitor::new(config.hazard.danger_distance);
        let pitch = PitchRange::new(config.pitch_min, config.pitch_max);

        Self {
            seed: config.seed,
            time_ticks: 0,
            actor: Actor::new(Vec2::ZERO, config.actor_speed),
            hazard_pos: None,
            puzzle_zone: InteractionZone::new(MinigameKind::Puzzle, config.actor_tag.clone()),
            sandcastle_zone: InteractionZone::new(MinigameKind::Sandcastle, config.actor_tag.clone()),
            puzzle: PuzzleController::new(
                &config.puzzle,
                hazard,
                pitch,
                RngState::new(config.seed, PUZZLE_STREAM).to_rng(),
            ),
            sandcastle: SandcastleController::new(
                &config.sandcastle,
                hazard,
                pitch,
                RngState::new(config.seed, SANDCASTLE_STREAM).to_rng(),
            ),
            indicator: Indicator::Normal,
            world_castle: WorldCastle::default(),
            events: Vec::new(),
        }
    }

    pub fn zone(&self, kind: MinigameKind) -> &InteractionZone {
        match kind {
            MinigameKind::Puzzle => &self.puzzle_zone,
            MinigameKind::Sandcastle => &self.sandcastle_zone,
        }
    }

    pub fn zone_mut(&mut self, kind: MinigameKind) -> &mut InteractionZone {
        match kind {
            MinigameKind::Puzzle => &mut self.puzzle_zone,
            MinigameKind::Sandcastle => &mut self.sandcastle_zone,
        }
    }

    /// True if either minigame panel is open
    pub fn any_session_active(&self) -> bool {
        self.puzzle.is_active() || self.sandcastle.is_active()
    }

    /// Hand queued feedback to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
