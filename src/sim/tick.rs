//! Per-frame scheduler
//!
//! Dispatches one frame's worth of input into the world in delivery order,
//! then advances timed sequences and recomputes the hazard frame.

use glam::Vec2;

use super::events::GameEvent;
use super::hazard::resolve_indicator;
use super::state::{MinigameKind, World};
use super::zone::{OverlapEvent, ZoneTransition};

/// Phase of a pointer drag on a puzzle piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragPhase {
    Begin,
    /// Pointer moved by `delta` screen pixels
    Move { delta: Vec2 },
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragInput {
    pub piece: usize,
    pub phase: DragPhase,
}

/// Mouse-down on the sandcastle panel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerClick {
    /// Pointer is over an interactive control (close button etc.)
    pub over_ui: bool,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Raw trigger overlaps from the collision system
    pub overlaps: Vec<OverlapEvent>,
    /// Movement axis (WASD / arrows)
    pub move_axis: Vec2,
    /// Where the hazard is this frame
    pub hazard_pos: Option<Vec2>,
    /// Activation key pressed
    pub activate: bool,
    /// Close controls pressed
    pub close: Vec<MinigameKind>,
    pub drags: Vec<DragInput>,
    pub clicks: Vec<PointerClick>,
    /// Canvas scale factor for drag normalization
    pub display_scale: f32,
}

impl TickInput {
    pub fn drag(mut self, piece: usize, phase: DragPhase) -> Self {
        self.drags.push(DragInput { piece, phase });
        self
    }

    pub fn click(mut self, over_ui: bool) -> Self {
        self.clicks.push(PointerClick { over_ui });
        self
    }
}

/// Advance the world by one frame
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    world.time_ticks += 1;

    world.actor.step(input.move_axis, dt);
    world.hazard_pos = input.hazard_pos;

    for overlap in &input.overlaps {
        let kind = overlap.zone;
        let Some(transition) = world.zone_mut(kind).on_overlap(&overlap.tag, overlap.phase) else {
            continue;
        };
        match (kind, transition) {
            (MinigameKind::Puzzle, ZoneTransition::Entered) => world.puzzle.notify_proximity_enter(),
            (MinigameKind::Puzzle, ZoneTransition::Exited) => {
                world.puzzle.notify_proximity_exit(&mut world.events)
            }
            (MinigameKind::Sandcastle, ZoneTransition::Entered) => {
                world.sandcastle.notify_proximity_enter()
            }
            (MinigameKind::Sandcastle, ZoneTransition::Exited) => {
                world.sandcastle.notify_proximity_exit(&mut world.events)
            }
        }
    }

    if input.activate {
        if world.puzzle_zone.is_actor_present() && world.puzzle.is_idle() {
            world.puzzle.open(&mut world.events);
        }
        if world.sandcastle_zone.is_actor_present() && world.sandcastle.is_idle() {
            world.sandcastle.open(&mut world.events);
        }
    }

    for kind in &input.close {
        match kind {
            MinigameKind::Puzzle => world.puzzle.request_close(&mut world.events),
            MinigameKind::Sandcastle => world.sandcastle.request_close(&mut world.events),
        };
    }

    for drag in &input.drags {
        match drag.phase {
            DragPhase::Begin => world.puzzle.begin_drag(drag.piece, &mut world.events),
            DragPhase::Move { delta } => world.puzzle.drag_by(drag.piece, delta, input.display_scale),
            DragPhase::End => world.puzzle.end_drag(drag.piece, &mut world.events),
        }
    }

    for click in &input.clicks {
        world.sandcastle.click(click.over_ui, &mut world.events);
    }

    world.puzzle.advance(dt, &mut world.events);
    world
        .sandcastle
        .advance(dt, &mut world.events, &mut world.world_castle);

    let indicator = resolve_indicator([
        world.puzzle.hazard_sample(world.actor.pos, world.hazard_pos),
        world.sandcastle.hazard_sample(world.actor.pos, world.hazard_pos),
    ]);
    if indicator != world.indicator {
        world.indicator = indicator;
        world.events.push(GameEvent::IndicatorChanged(indicator));
    }
}
