//! Tidepool entry point
//!
//! Runs a scripted headless session: the player walks to the puzzle, solves
//! it, then walks to the sandcastle and builds until the game is cleared.
//! Pass a JSON config path as the first argument to override the tuning.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::Path;

    use glam::Vec2;

    use tidepool::audio::{AudioSink, LogAudio};
    use tidepool::consts::*;
    use tidepool::sim::{
        DragPhase, GameEvent, MinigameKind, OverlapEvent, OverlapPhase, TickInput, World,
        ZoneShape, tick,
    };
    use tidepool::MinigameConfig;

    /// Safety cap so a misconfigured script cannot spin forever
    const MAX_TICKS_PER_STEP: u32 = 60 * 60;

    /// Big fish circling the beach
    const FISH_ORBIT_RADIUS: f32 = 12.0;
    const FISH_ORBIT_SPEED: f32 = 0.8;

    struct Driver {
        world: World,
        audio: LogAudio,
        zones: [(MinigameKind, ZoneShape); 2],
        inside: [bool; 2],
        actor_tag: String,
        time: f32,
    }

    impl Driver {
        fn new(config: &MinigameConfig) -> Self {
            Self {
                world: World::new(config),
                audio: LogAudio::new(),
                zones: [
                    (MinigameKind::Puzzle, config.puzzle.zone),
                    (MinigameKind::Sandcastle, config.sandcastle.zone),
                ],
                inside: [false; 2],
                actor_tag: config.actor_tag.clone(),
                time: 0.0,
            }
        }

        /// Stand-in for the engine's trigger callbacks
        fn detect_overlaps(&mut self, input: &mut TickInput) {
            for (i, (kind, shape)) in self.zones.iter().enumerate() {
                let now = shape.contains(self.world.actor.pos);
                if now != self.inside[i] {
                    self.inside[i] = now;
                    input.overlaps.push(OverlapEvent {
                        zone: *kind,
                        tag: self.actor_tag.clone(),
                        phase: if now { OverlapPhase::Begin } else { OverlapPhase::End },
                    });
                }
            }
        }

        fn step(&mut self, mut input: TickInput) {
            self.time += SIM_DT;
            let angle = self.time * FISH_ORBIT_SPEED;
            input.hazard_pos = Some(Vec2::new(angle.cos(), angle.sin()) * FISH_ORBIT_RADIUS);
            if input.display_scale == 0.0 {
                input.display_scale = 1.0;
            }
            self.detect_overlaps(&mut input);

            tick(&mut self.world, &input, SIM_DT);

            for event in self.world.drain_events() {
                match event {
                    GameEvent::Sound(cue) => self.audio.play_one_shot(cue),
                    GameEvent::IndicatorChanged(indicator) => {
                        log::info!("Hazard frame: {:?}", indicator)
                    }
                    other => log::info!("{:?}", other),
                }
            }
        }

        fn walk_to(&mut self, target: Vec2) {
            for _ in 0..MAX_TICKS_PER_STEP {
                let to_target = target - self.world.actor.pos;
                if to_target.length() <= self.world.actor.speed * SIM_DT {
                    break;
                }
                self.step(TickInput {
                    move_axis: to_target,
                    ..Default::default()
                });
            }
        }

        fn idle_until(&mut self, mut done: impl FnMut(&World) -> bool) {
            for _ in 0..MAX_TICKS_PER_STEP {
                if done(&self.world) {
                    return;
                }
                self.step(TickInput::default());
            }
            log::warn!("Gave up waiting after {} ticks", MAX_TICKS_PER_STEP);
        }

        fn play_puzzle(&mut self) {
            self.step(TickInput {
                activate: true,
                ..Default::default()
            });

            let pieces: Vec<(usize, Vec2)> = self
                .world
                .puzzle
                .pieces()
                .map(|(i, p)| (i, p.target() - p.position))
                .collect();

            // Drag each piece home over a few frames
            const DRAG_FRAMES: usize = 8;
            for (index, offset) in pieces {
                self.step(TickInput::default().drag(index, DragPhase::Begin));
                for _ in 0..DRAG_FRAMES {
                    let delta = offset / DRAG_FRAMES as f32;
                    self.step(TickInput::default().drag(index, DragPhase::Move { delta }));
                }
                self.step(TickInput::default().drag(index, DragPhase::End));
            }

            self.idle_until(|w| w.puzzle.is_idle());
        }

        fn play_sandcastle(&mut self) {
            self.step(TickInput {
                activate: true,
                ..Default::default()
            });

            for _ in 0..MAX_TICKS_PER_STEP {
                if self.world.sandcastle.is_idle() {
                    break;
                }
                self.step(TickInput::default().click(false));
            }
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Tidepool (native) starting...");

        let config = match std::env::args().nth(1) {
            Some(path) => MinigameConfig::load_or_default(Path::new(&path)),
            None => MinigameConfig::default(),
        };
        log::info!("Seed: {}", config.seed);

        let mut driver = Driver::new(&config);

        driver.walk_to(config.puzzle.zone.center);
        driver.play_puzzle();

        driver.walk_to(config.sandcastle.zone.center);
        driver.play_sandcastle();

        let world = &driver.world;
        log::info!(
            "Done after {} ticks: {} castles built, world castle {:?}, {} sounds played",
            world.time_ticks,
            world.sandcastle.completed_count(),
            world.world_castle.sprite,
            driver.audio.played()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web builds embed the library directly
}
