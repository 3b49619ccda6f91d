//! Drag lifecycle of a single puzzle piece
//!
//! Idle -> Dragging on drag begin, Dragging -> Locked when released within
//! snap distance of the target slot, Dragging -> Idle otherwise. Only
//! `reset_to` brings a locked piece back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::DRAG_ALPHA;
use crate::sanitize_scale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PieceState {
    #[default]
    Idle,
    Dragging,
    Locked,
}

/// Reported to the owning puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PieceEvent {
    PickedUp,
    Locked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieceDragController {
    pub position: Vec2,
    target: Vec2,
    pub snap_distance: f32,
    state: PieceState,
    /// Whether the piece intercepts pointer events (off while it is dragged)
    pub blocks_pointer: bool,
    pub alpha: f32,
}

impl PieceDragController {
    pub fn new(position: Vec2, target: Vec2, snap_distance: f32) -> Self {
        Self {
            position,
            target,
            snap_distance,
            state: PieceState::Idle,
            blocks_pointer: true,
            alpha: 1.0,
        }
    }

    #[inline]
    pub fn state(&self) -> PieceState {
        self.state
    }

    #[inline]
    pub fn target(&self) -> Vec2 {
        self.target
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.state == PieceState::Locked
    }

    /// Distance from the current position to the target slot
    #[inline]
    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }

    pub fn begin_drag(&mut self) -> Option<PieceEvent> {
        if self.state != PieceState::Idle {
            return None;
        }
        self.state = PieceState::Dragging;
        self.blocks_pointer = false;
        self.alpha = DRAG_ALPHA;
        Some(PieceEvent::PickedUp)
    }

    /// Move by a pointer delta in screen pixels, normalized by display scale
    pub fn drag_by(&mut self, delta: Vec2, display_scale: f32) {
        if self.state != PieceState::Dragging {
            return;
        }
        self.position += delta / sanitize_scale(display_scale);
    }

    pub fn end_drag(&mut self) -> Option<PieceEvent> {
        if self.state != PieceState::Dragging {
            return None;
        }
        self.blocks_pointer = true;
        self.alpha = 1.0;

        if self.distance_to_target() <= self.snap_distance {
            self.position = self.target;
            self.state = PieceState::Locked;
            Some(PieceEvent::Locked)
        } else {
            self.state = PieceState::Idle;
            None
        }
    }

    /// Put the piece back in the tray, unlocking it
    pub fn reset_to(&mut self, position: Vec2) {
        self.position = position;
        self.state = PieceState::Idle;
        self.blocks_pointer = true;
        self.alpha = 1.0;
    }
}
