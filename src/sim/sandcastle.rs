//! Staged sandcastle builder
//!
//! Each click shows the next building stage of a randomly chosen castle set.
//! The click after the last stage swaps in the finished castle and slides it
//! off the panel. When the slide ends a checkmark lights up, the world castle
//! is updated and a new set is drawn, until the target count is reached.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, PitchRange};
use super::hazard::{HazardMonitor, Indicator};
use super::state::MinigameKind;
use crate::audio::SoundEffect;
use crate::config::SandcastleConfig;
use crate::lerp_clamped;

/// Sprite identifier resolved by the renderer
pub type SpriteKey = String;

/// Immutable bundle of one castle's images
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastleSet {
    pub name: String,
    pub stages: Vec<SpriteKey>,
    pub finished: SpriteKey,
}

impl CastleSet {
    /// A set needs at least one stage to be built
    pub fn is_playable(&self) -> bool {
        !self.stages.is_empty()
    }
}

/// Finished-castle slide, advanced once per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideAnimation {
    pub elapsed: f32,
    pub duration: f32,
    pub from: Vec2,
    pub to: Vec2,
}

impl SlideAnimation {
    pub fn new(from: Vec2, offset: Vec2, duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
            from,
            to: from + offset,
        }
    }

    /// Fraction of the slide run so far; may exceed 1 on the final tick
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        }
    }

    pub fn position(&self) -> Vec2 {
        lerp_clamped(self.from, self.to, self.progress())
    }

    /// Returns true once the slide has run its full duration
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        self.elapsed >= self.duration
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SandcastlePhase {
    Idle,
    Building,
    Animating(SlideAnimation),
}

/// The stage image shown on the panel
#[derive(Debug, Clone, PartialEq)]
pub struct StageImage {
    pub sprite: Option<SpriteKey>,
    pub opacity: f32,
    pub position: Vec2,
    /// Resting position the image returns to after each slide
    pub anchor: Vec2,
}

impl StageImage {
    fn new(anchor: Vec2) -> Self {
        Self {
            sprite: None,
            opacity: 0.0,
            position: anchor,
            anchor,
        }
    }

    fn hide(&mut self) {
        self.opacity = 0.0;
        self.position = self.anchor;
    }
}

/// Finished castle displayed out in the world
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldCastle {
    pub visible: bool,
    pub sprite: Option<SpriteKey>,
}

#[derive(Debug, Clone)]
pub struct SandcastleController {
    phase: SandcastlePhase,
    sets: Vec<CastleSet>,
    /// Indices into `sets` that can actually be built
    playable: Vec<usize>,
    current_set: usize,
    /// Stages shown so far for the current set
    stage_index: usize,
    completed_count: u32,
    target_completions: u32,
    checkmarks: Vec<bool>,
    stage: StageImage,
    slide_duration: f32,
    slide_offset: Vec2,
    panel_visible: bool,
    /// Actor left mid-slide; close once the slide finishes
    close_pending: bool,
    pitch: PitchRange,
    hazard: HazardMonitor,
    rng: Pcg32,
}

impl SandcastleController {
    pub fn new(config: &SandcastleConfig, hazard: HazardMonitor, pitch: PitchRange, rng: Pcg32) -> Self {
        let playable: Vec<usize> = config
            .sets
            .iter()
            .enumerate()
            .filter(|(_, set)| set.is_playable())
            .map(|(i, _)| i)
            .collect();

        if playable.len() < config.sets.len() {
            log::warn!(
                "{} castle sets have no stages and are skipped",
                config.sets.len() - playable.len()
            );
        }

        Self {
            phase: SandcastlePhase::Idle,
            sets: config.sets.clone(),
            playable,
            current_set: 0,
            stage_index: 0,
            completed_count: 0,
            target_completions: config.target_completions.max(1),
            checkmarks: vec![false; config.checkmark_slots],
            stage: StageImage::new(config.stage_anchor),
            slide_duration: config.slide_duration_secs,
            slide_offset: config.slide_offset,
            panel_visible: false,
            close_pending: false,
            pitch,
            hazard,
            rng,
        }
    }

    #[inline]
    pub fn phase(&self) -> SandcastlePhase {
        self.phase
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.phase != SandcastlePhase::Idle
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.phase == SandcastlePhase::Idle
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        matches!(self.phase, SandcastlePhase::Animating(_))
    }

    #[inline]
    pub fn panel_visible(&self) -> bool {
        self.panel_visible
    }

    #[inline]
    pub fn completed_count(&self) -> u32 {
        self.completed_count
    }

    #[inline]
    pub fn target_completions(&self) -> u32 {
        self.target_completions
    }

    #[inline]
    pub fn stage_index(&self) -> usize {
        self.stage_index
    }

    #[inline]
    pub fn current_set(&self) -> usize {
        self.current_set
    }

    pub fn current_castle(&self) -> Option<&CastleSet> {
        self.sets.get(self.current_set)
    }

    pub fn checkmarks(&self) -> &[bool] {
        &self.checkmarks
    }

    pub fn visible_checkmarks(&self) -> usize {
        self.checkmarks.iter().filter(|c| **c).count()
    }

    pub fn stage_image(&self) -> &StageImage {
        &self.stage
    }

    pub fn is_close_pending(&self) -> bool {
        self.close_pending
    }

    /// Idle -> Building. The caller checks zone presence.
    pub fn open(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if !self.is_idle() {
            return false;
        }
        if self.playable.is_empty() {
            log::warn!("No playable castle sets configured, not opening");
            return false;
        }

        self.completed_count = 0;
        self.close_pending = false;
        self.clear_checkmarks();
        self.stage.hide();
        self.pick_random_set();
        self.phase = SandcastlePhase::Building;
        self.panel_visible = true;
        events.push(GameEvent::PanelShown(MinigameKind::Sandcastle));
        log::info!("Sandcastle opened, building {}", self.castle_name());
        true
    }

    /// Close button. Rejected while the finished castle is sliding.
    pub fn request_close(&mut self, events: &mut Vec<GameEvent>) -> bool {
        match self.phase {
            SandcastlePhase::Building => {
                self.close_and_reset(events);
                true
            }
            SandcastlePhase::Animating(_) => {
                log::debug!("Sandcastle close ignored during slide");
                false
            }
            SandcastlePhase::Idle => false,
        }
    }

    /// Coming back mid-slide cancels a deferred close
    pub fn notify_proximity_enter(&mut self) {
        if self.close_pending {
            log::info!("Actor back in sandcastle zone, keeping session open");
            self.close_pending = false;
        } else {
            log::debug!("Sandcastle zone: actor present");
        }
    }

    /// Leaving the zone closes the session; mid-slide the close waits for the slide to end.
    pub fn notify_proximity_exit(&mut self, events: &mut Vec<GameEvent>) {
        match self.phase {
            SandcastlePhase::Building => {
                log::info!("Actor left sandcastle zone, closing");
                self.close_and_reset(events);
            }
            SandcastlePhase::Animating(_) => {
                log::info!("Actor left sandcastle zone mid-slide, closing after it");
                self.close_pending = true;
            }
            SandcastlePhase::Idle => {}
        }
    }

    /// Pointer click on the panel. `over_ui` is true when the pointer sits on an
    /// interactive control (e.g. the close button); such clicks never build.
    pub fn click(&mut self, over_ui: bool, events: &mut Vec<GameEvent>) -> bool {
        if over_ui || self.phase != SandcastlePhase::Building {
            return false;
        }
        let Some(set) = self.sets.get(self.current_set) else {
            return false;
        };

        if self.stage_index < set.stages.len() {
            if self.stage_index == 0 {
                self.stage.opacity = 1.0;
            }
            self.stage.sprite = Some(set.stages[self.stage_index].clone());
            self.stage_index += 1;
            events.push(self.pitch.cue(&mut self.rng, SoundEffect::StageClick));
            log::debug!(
                "{} stage {}/{}",
                set.name,
                self.stage_index,
                set.stages.len()
            );
        } else {
            self.stage.sprite = Some(set.finished.clone());
            let slide = SlideAnimation::new(self.stage.position, self.slide_offset, self.slide_duration);
            self.phase = SandcastlePhase::Animating(slide);
            events.push(self.pitch.cue(&mut self.rng, SoundEffect::SetComplete));
            log::debug!("{} finished, sliding out", set.name);
        }
        true
    }

    /// Advance the slide. Completion effects run on the tick the slide ends.
    pub fn advance(&mut self, dt: f32, events: &mut Vec<GameEvent>, world: &mut WorldCastle) {
        let SandcastlePhase::Animating(slide) = &mut self.phase else {
            return;
        };
        let done = slide.advance(dt);
        self.stage.position = slide.position();
        if done {
            self.on_castle_set_completed(events, world);
        }
    }

    /// End-of-slide effects: checkmark, counter, world castle, next set or clear.
    /// Only a running slide can complete a set.
    pub fn on_castle_set_completed(&mut self, events: &mut Vec<GameEvent>, world: &mut WorldCastle) {
        if !self.is_animating() {
            log::debug!("Castle completion ignored outside a slide");
            return;
        }
        self.stage.hide();

        match self.checkmarks.get_mut(self.completed_count as usize) {
            Some(mark) => *mark = true,
            None => log::debug!("No checkmark slot for completion {}", self.completed_count + 1),
        }
        self.completed_count += 1;

        if let Some(set) = self.sets.get(self.current_set) {
            world.visible = true;
            world.sprite = Some(set.finished.clone());
        }
        events.push(GameEvent::CastleSetCompleted {
            set: self.current_set,
            completed: self.completed_count,
        });
        log::info!(
            "Castle {} built ({}/{})",
            self.castle_name(),
            self.completed_count,
            self.target_completions
        );

        if self.completed_count >= self.target_completions {
            self.on_all_complete(events);
        } else if self.close_pending {
            self.close_and_reset(events);
        } else {
            self.pick_random_set();
            self.phase = SandcastlePhase::Building;
        }
    }

    /// Game clear: checkmarks stay lit until the next open.
    /// Ignored unless the slide that reached the target is finishing.
    pub fn on_all_complete(&mut self, events: &mut Vec<GameEvent>) {
        if !self.is_animating() || self.completed_count < self.target_completions {
            log::debug!(
                "Sandcastle clear ignored at {}/{}",
                self.completed_count,
                self.target_completions
            );
            return;
        }
        events.push(self.pitch.cue(&mut self.rng, SoundEffect::GameClear));
        events.push(GameEvent::AllComplete(MinigameKind::Sandcastle));
        self.phase = SandcastlePhase::Idle;
        self.close_pending = false;
        self.hide_panel(events);
        log::info!("All {} sandcastles built", self.completed_count);
    }

    pub fn hazard_sample(&self, actor: Vec2, hazard: Option<Vec2>) -> Option<Indicator> {
        self.hazard.sample(self.is_active(), actor, hazard)
    }

    fn close_and_reset(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = SandcastlePhase::Idle;
        self.close_pending = false;
        self.completed_count = 0;
        self.clear_checkmarks();
        self.stage.hide();
        self.hide_panel(events);
        log::info!("Sandcastle closed, progress reset");
    }

    fn hide_panel(&mut self, events: &mut Vec<GameEvent>) {
        if self.panel_visible {
            self.panel_visible = false;
            events.push(GameEvent::PanelHidden(MinigameKind::Sandcastle));
        }
    }

    fn clear_checkmarks(&mut self) {
        self.checkmarks.iter_mut().for_each(|c| *c = false);
    }

    fn pick_random_set(&mut self) {
        if self.playable.is_empty() {
            return;
        }
        let pick = self.rng.random_range(0..self.playable.len());
        self.current_set = self.playable[pick];
        self.stage_index = 0;
        self.stage.opacity = 0.0;
    }

    fn castle_name(&self) -> &str {
        self.current_castle().map(|s| s.name.as_str()).unwrap_or("?")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use rand::SeedableRng;

    fn controller(config: &SandcastleConfig) -> SandcastleController {
        SandcastleController::new(
            config,
            HazardMonitor::new(DANGER_DISTANCE),
            PitchRange::default(),
            Pcg32::seed_from_u64(7),
        )
    }

    /// Click through every stage and start the slide
    fn build_current(castle: &mut SandcastleController, events: &mut Vec<GameEvent>) {
        let stages = castle.current_castle().unwrap().stages.len();
        for _ in 0..=stages {
            assert!(castle.click(false, events));
        }
        assert!(castle.is_animating());
    }

    /// Finish the remaining stages of a set already under way
    fn build_current_from(castle: &mut SandcastleController, events: &mut Vec<GameEvent>) {
        while !castle.is_animating() {
            assert!(castle.click(false, events));
        }
    }

    fn finish_slide(castle: &mut SandcastleController, events: &mut Vec<GameEvent>, world: &mut WorldCastle) {
        for _ in 0..100 {
            if !castle.is_animating() {
                return;
            }
            castle.advance(SIM_DT, events, world);
        }
        panic!("slide never finished");
    }

    #[test]
    fn test_open_hides_stage_and_resets() {
        let mut castle = controller(&SandcastleConfig::default());
        let mut events = Vec::new();
        assert!(castle.open(&mut events));
        assert_eq!(castle.phase(), SandcastlePhase::Building);
        assert_eq!(castle.stage_index(), 0);
        assert_eq!(castle.stage_image().opacity, 0.0);
        assert_eq!(castle.visible_checkmarks(), 0);
        assert!(castle.panel_visible());
    }

    #[test]
    fn test_first_click_shows_stage() {
        let mut castle = controller(&SandcastleConfig::default());
        let mut events = Vec::new();
        castle.open(&mut events);
        castle.click(false, &mut events);

        let set = castle.current_castle().unwrap().clone();
        assert_eq!(castle.stage_index(), 1);
        assert_eq!(castle.stage_image().opacity, 1.0);
        assert_eq!(castle.stage_image().sprite.as_ref(), Some(&set.stages[0]));
    }

    #[test]
    fn test_click_over_ui_is_ignored() {
        let mut castle = controller(&SandcastleConfig::default());
        let mut events = Vec::new();
        castle.open(&mut events);
        events.clear();
        assert!(!castle.click(true, &mut events));
        assert_eq!(castle.stage_index(), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_clicks_while_animating_are_ignored() {
        let mut castle = controller(&SandcastleConfig::default());
        let mut events = Vec::new();
        castle.open(&mut events);
        build_current(&mut castle, &mut events);

        let phase = castle.phase();
        let stage = castle.stage_index();
        assert!(!castle.click(false, &mut events));
        assert_eq!(castle.phase(), phase);
        assert_eq!(castle.stage_index(), stage);
    }

    #[test]
    fn test_slide_moves_then_resets_to_anchor() {
        let mut castle = controller(&SandcastleConfig::default());
        let mut events = Vec::new();
        let mut world = WorldCastle::default();
        castle.open(&mut events);
        build_current(&mut castle, &mut events);
        let finished = castle.current_castle().unwrap().finished.clone();
        assert_eq!(castle.stage_image().sprite.as_ref(), Some(&finished));

        castle.advance(0.2, &mut events, &mut world);
        assert!((castle.stage_image().position.x - 750.0).abs() < 0.01);
        assert_eq!(castle.completed_count(), 0);

        castle.advance(0.2, &mut events, &mut world);
        assert_eq!(castle.phase(), SandcastlePhase::Building);
        assert_eq!(castle.completed_count(), 1);
        assert_eq!(castle.checkmarks()[0], true);
        assert_eq!(castle.stage_image().position, Vec2::ZERO);
        assert_eq!(castle.stage_image().opacity, 0.0);
        assert_eq!(castle.stage_index(), 0);
        assert_eq!(world.sprite.as_ref(), Some(&finished));
        assert!(world.visible);
    }

    #[test]
    fn test_close_rejected_while_animating() {
        let mut castle = controller(&SandcastleConfig::default());
        let mut events = Vec::new();
        castle.open(&mut events);
        build_current(&mut castle, &mut events);

        assert!(!castle.request_close(&mut events));
        assert!(castle.is_active());
        assert!(castle.panel_visible());
        assert_eq!(castle.completed_count(), 0);
        assert!(!castle.is_close_pending());
    }

    #[test]
    fn test_close_resets_progress() {
        let mut castle = controller(&SandcastleConfig::default());
        let mut events = Vec::new();
        let mut world = WorldCastle::default();
        castle.open(&mut events);
        build_current(&mut castle, &mut events);
        finish_slide(&mut castle, &mut events, &mut world);
        assert_eq!(castle.completed_count(), 1);

        assert!(castle.request_close(&mut events));
        assert!(castle.is_idle());
        assert_eq!(castle.completed_count(), 0);
        assert_eq!(castle.visible_checkmarks(), 0);
        // World castle keeps the last build
        assert!(world.visible);
    }

    #[test]
    fn test_exit_mid_slide_is_deferred() {
        let mut castle = controller(&SandcastleConfig::default());
        let mut events = Vec::new();
        let mut world = WorldCastle::default();
        castle.open(&mut events);
        build_current(&mut castle, &mut events);

        castle.notify_proximity_exit(&mut events);
        assert!(castle.is_animating());
        assert!(castle.is_close_pending());

        finish_slide(&mut castle, &mut events, &mut world);
        assert!(castle.is_idle());
        assert!(!castle.panel_visible());
        assert_eq!(castle.completed_count(), 0);
        assert_eq!(castle.stage_image().position, Vec2::ZERO);
        assert!(world.visible);
    }

    #[test]
    fn test_reenter_mid_slide_keeps_session() {
        let mut castle = controller(&SandcastleConfig::default());
        let mut events = Vec::new();
        let mut world = WorldCastle::default();
        castle.open(&mut events);
        build_current(&mut castle, &mut events);

        castle.notify_proximity_exit(&mut events);
        assert!(castle.is_close_pending());
        castle.notify_proximity_enter();
        assert!(!castle.is_close_pending());

        finish_slide(&mut castle, &mut events, &mut world);
        assert_eq!(castle.phase(), SandcastlePhase::Building);
        assert!(castle.panel_visible());
        assert_eq!(castle.completed_count(), 1);
        assert_eq!(castle.visible_checkmarks(), 1);
    }

    #[test]
    fn test_exit_mid_final_slide_clears_game() {
        let config = SandcastleConfig {
            target_completions: 1,
            ..SandcastleConfig::default()
        };
        let mut castle = controller(&config);
        let mut events = Vec::new();
        let mut world = WorldCastle::default();
        castle.open(&mut events);
        build_current(&mut castle, &mut events);
        castle.notify_proximity_exit(&mut events);
        events.clear();

        finish_slide(&mut castle, &mut events, &mut world);
        assert!(castle.is_idle());
        assert!(!castle.panel_visible());
        assert!(!castle.is_close_pending());
        assert_eq!(castle.completed_count(), 1);
        assert_eq!(castle.visible_checkmarks(), 1);
        assert!(events.contains(&GameEvent::AllComplete(MinigameKind::Sandcastle)));
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == GameEvent::PanelHidden(MinigameKind::Sandcastle))
                .count(),
            1
        );
    }

    #[test]
    fn test_completion_hooks_ignored_outside_slide() {
        let mut castle = controller(&SandcastleConfig::default());
        let mut events = Vec::new();
        let mut world = WorldCastle::default();

        castle.on_castle_set_completed(&mut events, &mut world);
        castle.on_all_complete(&mut events);
        assert!(castle.is_idle());
        assert!(!castle.panel_visible());
        assert_eq!(castle.completed_count(), 0);
        assert_eq!(castle.visible_checkmarks(), 0);
        assert_eq!(world, WorldCastle::default());
        assert!(events.is_empty());

        // Mid-build, short of the target
        castle.open(&mut events);
        castle.click(false, &mut events);
        events.clear();
        castle.on_castle_set_completed(&mut events, &mut world);
        castle.on_all_complete(&mut events);
        assert_eq!(castle.phase(), SandcastlePhase::Building);
        assert_eq!(castle.completed_count(), 0);
        assert_eq!(castle.stage_index(), 1);
        assert!(events.is_empty());

        // Mid-slide, the clear hook still waits for the target
        build_current_from(&mut castle, &mut events);
        castle.on_all_complete(&mut events);
        assert!(castle.is_animating());
        assert!(castle.panel_visible());
        assert!(events.iter().all(|e| !matches!(e, GameEvent::AllComplete(_))));
    }

    #[test]
    fn test_slide_position_stops_at_end() {
        let mut slide = SlideAnimation::new(Vec2::ZERO, Vec2::new(SLIDE_OFFSET_X, 0.0), 0.4);
        assert!(slide.advance(0.6));
        assert!(slide.progress() > 1.0);
        assert_eq!(slide.position(), Vec2::new(SLIDE_OFFSET_X, 0.0));

        let instant = SlideAnimation::new(Vec2::ONE, Vec2::ONE, 0.0);
        assert_eq!(instant.position(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn test_reaches_target_exactly() {
        let mut castle = controller(&SandcastleConfig::default());
        let mut events = Vec::new();
        let mut world = WorldCastle::default();
        castle.open(&mut events);

        for round in 1..=5 {
            build_current(&mut castle, &mut events);
            finish_slide(&mut castle, &mut events, &mut world);
            assert_eq!(castle.completed_count(), round);
        }
        assert!(castle.is_idle());
        assert_eq!(castle.visible_checkmarks(), 5);
        assert!(!castle.click(false, &mut events));
        assert_eq!(castle.completed_count(), 5);

        let clears = events
            .iter()
            .filter(|e| **e == GameEvent::AllComplete(MinigameKind::Sandcastle))
            .count();
        assert_eq!(clears, 1);
    }

    #[test]
    fn test_checkmark_overflow_is_tolerated() {
        let config = SandcastleConfig {
            checkmark_slots: 2,
            ..SandcastleConfig::default()
        };
        let mut castle = controller(&config);
        let mut events = Vec::new();
        let mut world = WorldCastle::default();
        castle.open(&mut events);
        for _ in 0..5 {
            build_current(&mut castle, &mut events);
            finish_slide(&mut castle, &mut events, &mut world);
        }
        assert_eq!(castle.completed_count(), 5);
        assert_eq!(castle.visible_checkmarks(), 2);
    }

    #[test]
    fn test_unplayable_sets_are_skipped() {
        let config = SandcastleConfig {
            sets: vec![
                CastleSet {
                    name: "empty".into(),
                    stages: Vec::new(),
                    finished: "empty_finished".into(),
                },
                CastleSet {
                    name: "solo".into(),
                    stages: vec!["solo_1".into()],
                    finished: "solo_finished".into(),
                },
            ],
            ..SandcastleConfig::default()
        };
        let mut castle = controller(&config);
        let mut events = Vec::new();
        castle.open(&mut events);
        assert_eq!(castle.current_set(), 1);
    }

    #[test]
    fn test_no_sets_never_opens() {
        let config = SandcastleConfig {
            sets: Vec::new(),
            ..SandcastleConfig::default()
        };
        let mut castle = controller(&config);
        let mut events = Vec::new();
        assert!(!castle.open(&mut events));
        assert!(!castle.click(false, &mut events));
        assert!(events.is_empty());
    }
}
