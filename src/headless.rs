//! Headless autopilot
//!
//! Plays a whole session without a browser: aims at the nearest invader with
//! a simple lead, holds fire, closes every content panel as soon as it opens
//! and optionally draws each frame into a [`RecordingSurface`].

use glam::Vec2;

use crate::consts::PROJECTILE_SPEED;
use crate::game::Game;
use crate::input::InputEvent;
use crate::renderer::RecordingSurface;
use crate::session::{Session, SessionEvent};
use crate::settings::Settings;
use crate::sim::{Category, ContentKind, GameMode, PlayArea, World};

/// Simulated frame length (60 Hz display)
pub const FRAME_MS: f64 = 1000.0 / 60.0;
/// Frames of fireworks to watch after the win latches
const CELEBRATION_FRAMES: u32 = 120;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutopilotOutcome {
    pub frames: u64,
    pub score: u64,
    pub won: bool,
    pub kills: Vec<Category>,
    pub opened: Vec<ContentKind>,
    /// Paint operations recorded across all drawn frames
    pub paint_ops: usize,
}

/// Where to aim: the nearest live invader, led by its current velocity
pub fn pick_target(world: &World) -> Option<Vec2> {
    let origin = world.turret.base;
    let speed = PROJECTILE_SPEED * world.area.scale();
    world
        .enemies()
        .filter(|e| e.is_alive())
        .min_by(|a, b| {
            a.pos
                .distance_squared(origin)
                .total_cmp(&b.pos.distance_squared(origin))
        })
        .map(|e| e.pos + e.vel * (e.pos.distance(origin) / speed))
}

pub fn run_autopilot(seed: u64, max_frames: u64, record: bool) -> AutopilotOutcome {
    run_autopilot_in(PlayArea::default(), seed, max_frames, record)
}

/// Autopilot on a play area of any logical size
pub fn run_autopilot_in(area: PlayArea, seed: u64, max_frames: u64, record: bool) -> AutopilotOutcome {
    let mut game = Game::new(seed, area, Settings::default());
    let mut session = Session::new();
    session.start();
    game.sync_mode(&session);

    let mut surface = RecordingSurface::new();
    let mut outcome = AutopilotOutcome::default();
    let mut celebration = 0;

    for frame in 0..max_frames {
        let t = frame as f64 * FRAME_MS;
        match pick_target(&game.world) {
            Some(target) => {
                game.handle_input(InputEvent::MouseMove {
                    x: target.x,
                    y: target.y,
                });
                game.handle_input(InputEvent::MouseDown {
                    x: target.x,
                    y: target.y,
                });
            }
            None => game.handle_input(InputEvent::MouseUp),
        }

        let report = game.frame(t, t, &mut session);
        outcome.kills.extend(report.kills);
        outcome.frames = frame + 1;

        if record {
            surface.clear();
            game.draw(&mut surface);
            outcome.paint_ops += surface.paint_count();
        }

        for event in session.drain_events() {
            match event {
                SessionEvent::OpenContent(kind) => {
                    log::info!("Content opened: {}", kind.as_str());
                    outcome.opened.push(kind);
                }
                SessionEvent::ModeChanged(GameMode::Win) => {
                    log::info!("Win screen after {} frames", frame + 1);
                }
                _ => {}
            }
        }

        if session.mode() == GameMode::ModalOpen {
            session.close_modal();
            game.sync_mode(&session);
        }

        if game.world.win_started {
            celebration += 1;
            if celebration >= CELEBRATION_FRAMES {
                break;
            }
        }
    }

    outcome.score = session.score();
    outcome.won = game.world.win_started;
    outcome
}
