//! Interaction zones (proximity gate)
//!
//! A zone only tracks whether the actor is inside. It is fed raw overlap
//! begin/end events; anything not carrying the actor tag is ignored.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::MinigameKind;

/// Circular trigger area, used by hosts that detect overlap themselves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneShape {
    pub center: Vec2,
    pub radius: f32,
}

impl ZoneShape {
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.distance(self.center) <= self.radius
    }
}

/// Reported when the actor's presence actually changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneTransition {
    Entered,
    Exited,
}

/// Raw overlap phase from the collision system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlapPhase {
    Begin,
    End,
}

/// A raw overlap event addressed to one minigame's zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapEvent {
    pub zone: MinigameKind,
    pub tag: String,
    pub phase: OverlapPhase,
}

/// Zone in front of one minigame
#[derive(Debug, Clone)]
pub struct InteractionZone {
    pub kind: MinigameKind,
    actor_tag: String,
    present: bool,
}

impl InteractionZone {
    pub fn new(kind: MinigameKind, actor_tag: impl Into<String>) -> Self {
        Self {
            kind,
            actor_tag: actor_tag.into(),
            present: false,
        }
    }

    #[inline]
    pub fn is_actor_present(&self) -> bool {
        self.present
    }

    pub fn on_overlap_begin(&mut self, tag: &str) -> Option<ZoneTransition> {
        if tag != self.actor_tag || self.present {
            return None;
        }
        self.present = true;
        log::debug!("Actor entered {:?} zone", self.kind);
        Some(ZoneTransition::Entered)
    }

    pub fn on_overlap_end(&mut self, tag: &str) -> Option<ZoneTransition> {
        if tag != self.actor_tag || !self.present {
            return None;
        }
        self.present = false;
        log::debug!("Actor left {:?} zone", self.kind);
        Some(ZoneTransition::Exited)
    }

    /// Dispatch a raw overlap event
    pub fn on_overlap(&mut self, tag: &str, phase: OverlapPhase) -> Option<ZoneTransition> {
        match phase {
            OverlapPhase::Begin => self.on_overlap_begin(tag),
            OverlapPhase::End => self.on_overlap_end(tag),
        }
    }
}
