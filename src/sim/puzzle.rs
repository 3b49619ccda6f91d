//! Drag-and-snap puzzle session
//!
//! Idle -> Active on activation inside the zone. Every piece lock bumps the
//! counter; once all pieces are locked the panel celebrates for a fixed delay
//! and then closes itself. Closing always re-places the pieces so a half
//! solved layout never survives.

use glam::Vec2;
use rand_pcg::Pcg32;

use super::events::{GameEvent, PitchRange};
use super::hazard::{HazardMonitor, Indicator};
use super::piece::{PieceDragController, PieceEvent};
use super::placement::{PlacementPolicy, place};
use super::state::MinigameKind;
use crate::audio::SoundEffect;
use crate::config::PuzzleConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PuzzlePhase {
    Idle,
    Active,
    /// All pieces locked; non-interactive until `elapsed` reaches the delay
    Celebrating { elapsed: f32 },
}

#[derive(Debug, Clone)]
pub struct PuzzleController {
    phase: PuzzlePhase,
    /// `None` entries are unconfigured pieces and never participate
    pieces: Vec<Option<PieceDragController>>,
    /// Tray slots captured once at setup, one per configured piece
    home_slots: Vec<Vec2>,
    policy: PlacementPolicy,
    locked_count: usize,
    celebrate_secs: f32,
    /// Piece indices back to front; the last one renders on top
    draw_order: Vec<usize>,
    panel_visible: bool,
    pitch: PitchRange,
    hazard: HazardMonitor,
    rng: Pcg32,
}

impl PuzzleController {
    pub fn new(config: &PuzzleConfig, hazard: HazardMonitor, pitch: PitchRange, rng: Pcg32) -> Self {
        let pieces: Vec<Option<PieceDragController>> = config
            .pieces
            .iter()
            .map(|piece| {
                piece.map(|p| PieceDragController::new(p.home, p.target, config.snap_distance))
            })
            .collect();

        let home_slots = config.pieces.iter().flatten().map(|p| p.home).collect();
        let draw_order = pieces
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_some())
            .map(|(i, _)| i)
            .collect();

        let skipped = pieces.iter().filter(|p| p.is_none()).count();
        if skipped > 0 {
            log::warn!("Puzzle has {} unconfigured pieces; they are skipped", skipped);
        }

        Self {
            phase: PuzzlePhase::Idle,
            pieces,
            home_slots,
            policy: config.placement.clone(),
            locked_count: 0,
            celebrate_secs: config.celebrate_secs,
            draw_order,
            panel_visible: false,
            pitch,
            hazard,
            rng,
        }
    }

    #[inline]
    pub fn phase(&self) -> PuzzlePhase {
        self.phase
    }

    /// Panel is open (interactive or celebrating)
    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase != PuzzlePhase::Idle
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.phase == PuzzlePhase::Idle
    }

    #[inline]
    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    #[inline]
    pub fn locked_count(&self) -> usize {
        self.locked_count
    }

    /// Number of configured pieces
    pub fn piece_count(&self) -> usize {
        self.pieces.iter().flatten().count()
    }

    pub fn is_complete(&self) -> bool {
        self.piece_count() > 0 && self.locked_count == self.piece_count()
    }

    pub fn piece(&self, index: usize) -> Option<&PieceDragController> {
        self.pieces.get(index).and_then(Option::as_ref)
    }

    /// Test and tooling access to a piece
    pub fn piece_mut(&mut self, index: usize) -> Option<&mut PieceDragController> {
        self.pieces.get_mut(index).and_then(Option::as_mut)
    }

    pub fn pieces(&self) -> impl Iterator<Item = (usize, &PieceDragController)> {
        self.pieces
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.as_ref().map(|p| (i, p)))
    }

    pub fn draw_order(&self) -> &[usize] {
        &self.draw_order
    }

    pub fn policy(&self) -> &PlacementPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: PlacementPolicy) {
        self.policy = policy;
    }

    /// Idle -> Active. The caller checks zone presence.
    pub fn open(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if !self.is_idle() {
            return false;
        }
        if self.piece_count() == 0 {
            log::warn!("Puzzle has no pieces configured, not opening");
            return false;
        }

        self.phase = PuzzlePhase::Active;
        self.locked_count = 0;
        self.replace_pieces();
        self.panel_visible = true;
        events.push(GameEvent::PanelShown(MinigameKind::Puzzle));
        log::info!("Puzzle opened with {} pieces", self.piece_count());
        true
    }

    /// Close button. Rejected while celebrating; the delay closes the panel itself.
    pub fn request_close(&mut self, events: &mut Vec<GameEvent>) -> bool {
        match self.phase {
            PuzzlePhase::Active => {
                self.close_and_reset(events);
                true
            }
            PuzzlePhase::Celebrating { .. } => {
                log::debug!("Puzzle close ignored during celebration");
                false
            }
            PuzzlePhase::Idle => false,
        }
    }

    pub fn notify_proximity_enter(&mut self) {
        log::debug!("Puzzle zone: actor present");
    }

    /// Leaving the zone closes an interactive session immediately. A
    /// celebrating session is already about to close on its own.
    pub fn notify_proximity_exit(&mut self, events: &mut Vec<GameEvent>) {
        if self.phase == PuzzlePhase::Active {
            log::info!("Actor left puzzle zone, closing");
            self.close_and_reset(events);
        }
    }

    pub fn begin_drag(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        if self.phase != PuzzlePhase::Active {
            return;
        }
        let Some(piece) = self.pieces.get_mut(index).and_then(Option::as_mut) else {
            log::debug!("Drag begin on missing piece {}", index);
            return;
        };
        if piece.begin_drag() == Some(PieceEvent::PickedUp) {
            events.push(self.pitch.cue(&mut self.rng, SoundEffect::PiecePickup));
            self.raise_to_top(index);
        }
    }

    pub fn drag_by(&mut self, index: usize, delta: Vec2, display_scale: f32) {
        if self.phase != PuzzlePhase::Active {
            return;
        }
        if let Some(piece) = self.piece_mut(index) {
            piece.drag_by(delta, display_scale);
        }
    }

    pub fn end_drag(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        if self.phase != PuzzlePhase::Active {
            return;
        }
        let Some(piece) = self.piece_mut(index) else {
            log::debug!("Drag end on missing piece {}", index);
            return;
        };
        if piece.end_drag() == Some(PieceEvent::Locked) {
            self.on_piece_locked(index, events);
        }
    }

    /// Lock notification from a piece. Completion is checked after the count moves.
    pub fn on_piece_locked(&mut self, index: usize, events: &mut Vec<GameEvent>) {
        if self.phase != PuzzlePhase::Active {
            return;
        }
        let total = self.piece_count();
        self.locked_count = (self.locked_count + 1).min(total);

        events.push(self.pitch.cue(&mut self.rng, SoundEffect::PieceLock));
        events.push(GameEvent::PieceLocked {
            piece: index,
            locked: self.locked_count,
            total,
        });
        log::debug!("Piece {} locked ({}/{})", index, self.locked_count, total);

        if self.locked_count == total {
            self.on_all_complete(events);
        }
    }

    /// Start the celebration. Ignored unless every piece of an open session is locked.
    pub fn on_all_complete(&mut self, events: &mut Vec<GameEvent>) {
        if self.phase != PuzzlePhase::Active || !self.is_complete() {
            log::debug!(
                "Puzzle clear ignored at {}/{}",
                self.locked_count,
                self.piece_count()
            );
            return;
        }
        events.push(self.pitch.cue(&mut self.rng, SoundEffect::PuzzleClear));
        events.push(GameEvent::AllComplete(MinigameKind::Puzzle));
        self.phase = PuzzlePhase::Celebrating { elapsed: 0.0 };
        log::info!("Puzzle solved, closing in {:.1}s", self.celebrate_secs);
    }

    /// Advance the celebration timer
    pub fn advance(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        if let PuzzlePhase::Celebrating { elapsed } = &mut self.phase {
            *elapsed += dt;
            if *elapsed >= self.celebrate_secs {
                self.close_and_reset(events);
            }
        }
    }

    pub fn hazard_sample(&self, actor: Vec2, hazard: Option<Vec2>) -> Option<Indicator> {
        self.hazard.sample(self.is_active(), actor, hazard)
    }

    fn close_and_reset(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = PuzzlePhase::Idle;
        self.locked_count = 0;
        self.replace_pieces();
        if self.panel_visible {
            self.panel_visible = false;
            events.push(GameEvent::PanelHidden(MinigameKind::Puzzle));
        }
        log::info!("Puzzle closed");
    }

    /// Re-place every configured piece under the current policy
    fn replace_pieces(&mut self) {
        let count = self.piece_count();
        let positions = place(&self.policy, &mut self.rng, count, &self.home_slots);

        for (slot, piece) in self.pieces.iter_mut().flatten().enumerate() {
            let pos = positions.get(slot).copied().unwrap_or(piece.position);
            piece.reset_to(pos);
        }
    }

    fn raise_to_top(&mut self, index: usize) {
        if let Some(at) = self.draw_order.iter().position(|&i| i == index) {
            let top = self.draw_order.remove(at);
            self.draw_order.push(top);
        }
    }
}
