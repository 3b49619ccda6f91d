//! Deterministic minigame simulation
//!
//! All minigame logic lives here. This module must be pure and deterministic:
//! - Driven only by `tick` with an explicit `dt`
//! - Seeded RNG only (one stream per controller)
//! - Input events applied in delivery order
//! - No rendering, audio or platform dependencies; feedback goes out as events

pub mod events;
pub mod hazard;
pub mod piece;
pub mod placement;
pub mod puzzle;
pub mod sandcastle;
pub mod state;
pub mod tick;
pub mod zone;

pub use events::{GameEvent, PitchRange};
pub use hazard::{HazardMonitor, Indicator, resolve_indicator};
pub use piece::{PieceDragController, PieceEvent, PieceState};
pub use placement::{PlacementPolicy, place, scatter, shuffle_slots};
pub use puzzle::{PuzzleController, PuzzlePhase};
pub use sandcastle::{
    CastleSet, SandcastleController, SandcastlePhase, SlideAnimation, SpriteKey, StageImage,
    WorldCastle,
};
pub use state::{Actor, MinigameKind, RngState, World};
pub use tick::{DragInput, DragPhase, PointerClick, TickInput, tick};
pub use zone::{InteractionZone, OverlapEvent, OverlapPhase, ZoneShape, ZoneTransition};
