//! Game controller
//!
//! Owns the [`World`] and the [`InputMapper`] and runs the fixed-step
//! accumulator. The page-level [`Host`] is passed in on every call.

use crate::consts::*;
use crate::input::{InputEvent, InputMapper};
use crate::renderer::{self, Surface};
use crate::session::Session;
use crate::settings::Settings;
use crate::sim::{GameMode, Host, PlayArea, TickReport, World, update};

pub struct Game {
    pub world: World,
    pub input: InputMapper,
    accumulator: f32,
    /// Timestamp of the previous simulated frame (ms)
    last_time: Option<f64>,
}

impl Game {
    pub fn new(seed: u64, area: PlayArea, settings: Settings) -> Self {
        log::info!("Game created with seed {}", seed);
        Self {
            world: World::new(seed, area, settings),
            input: InputMapper::new(area),
            accumulator: 0.0,
            last_time: None,
        }
    }

    /// Bring the board in line with the host's mode.
    ///
    /// Entering Playing with an empty board (and no win underway) spawns a
    /// level. Returns whether a level was spawned.
    pub fn sync_mode<H: Host + ?Sized>(&mut self, host: &H) -> bool {
        if host.game_mode() == GameMode::Playing {
            self.world.ensure_level(host.collected())
        } else {
            false
        }
    }

    /// Adopt new visual settings and persist them. The star field is
    /// rescattered when its density changes and live particles are trimmed
    /// to the new cap.
    pub fn apply_settings(&mut self, settings: Settings) {
        if settings == self.world.settings {
            return;
        }
        log::info!("Settings changed: {:?}", settings);
        let reseed = settings.star_count() != self.world.settings.star_count();
        self.world.settings = settings;
        if reseed {
            self.world.seed_stars();
        }
        let cap = self.world.settings.max_particles();
        self.world.particles.truncate(cap);
        self.world.settings.save();
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        self.input.handle(event);
    }

    /// Run the simulation for one animation frame.
    ///
    /// `time_ms` is the frame timestamp driving the accumulator; `now_ms` is
    /// the wall clock used for fire rate and combo. Returns the summed
    /// report of every substep.
    pub fn frame<H: Host + ?Sized>(&mut self, time_ms: f64, now_ms: f64, host: &mut H) -> TickReport {
        let mut report = TickReport::default();
        if !host.game_mode().simulates() {
            // Resume without a catch-up burst
            self.last_time = None;
            self.accumulator = 0.0;
            return report;
        }

        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => SIM_DT,
        };
        self.last_time = Some(time_ms);
        self.accumulator += dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.input.tick_input(now_ms);
            let step = update(&mut self.world, &input, host);
            report.shots += step.shots;
            report.hits += step.hits;
            report.kills.extend(step.kills);
            report.win_triggered |= step.win_triggered;
            self.accumulator -= SIM_DT;
            substeps += 1;

            if !host.game_mode().simulates() {
                // A kill opened a content panel
                self.accumulator = 0.0;
                break;
            }
        }
        if substeps == 0 {
            log::debug!("Frame skipped (accumulator {:.4})", self.accumulator);
        }
        report
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        renderer::draw(&self.world, surface);
    }

    /// Start over: reset the session and rebuild the world with a full
    /// triplet of invaders
    pub fn replay(&mut self, session: &mut Session, seed: u64) {
        session.replay();
        self.world = World::new(seed, self.world.area, self.world.settings.clone());
        self.world.init_level(session.collected());
        self.accumulator = 0.0;
        self.last_time = None;
        self.input.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::RecordingSurface;
    use crate::settings::QualityPreset;
    use crate::sim::{Category, ContentKind};
    use glam::Vec2;

    fn game() -> Game {
        Game::new(9, PlayArea::default(), Settings::default())
    }

    fn playing_session() -> Session {
        let mut s = Session::new();
        s.start();
        s
    }

    #[test]
    fn sync_mode_spawns_only_when_playing() {
        let mut g = game();
        let mut s = Session::new();
        assert!(!g.sync_mode(&s));
        assert_eq!(g.world.enemy_count(), 0);

        s.start();
        assert!(g.sync_mode(&s));
        assert_eq!(g.world.enemy_count(), 3);
        assert!(!g.sync_mode(&s));
    }

    #[test]
    fn fixed_step_substeps() {
        let mut g = game();
        let mut s = playing_session();
        g.sync_mode(&s);

        // First frame always runs exactly one step
        g.frame(1000.0, 1000.0, &mut s);
        assert_eq!(g.world.frame, 1);

        // 60ms is three and a bit 60Hz steps
        g.frame(1060.0, 1060.0, &mut s);
        assert_eq!(g.world.frame, 4);

        // A long stall is clamped to MAX_SUBSTEPS
        g.frame(5000.0, 5000.0, &mut s);
        assert_eq!(g.world.frame, 4 + MAX_SUBSTEPS as u64);
    }

    #[test]
    fn paused_host_freezes_world() {
        let mut g = game();
        let mut s = playing_session();
        g.sync_mode(&s);
        g.frame(0.0, 0.0, &mut s);
        s.toggle_menu();

        let frame = g.world.frame;
        g.frame(16.0, 16.0, &mut s);
        g.frame(500.0, 500.0, &mut s);
        assert_eq!(g.world.frame, frame);

        // Resuming does not replay the paused time
        s.toggle_menu();
        g.frame(10_000.0, 10_000.0, &mut s);
        assert_eq!(g.world.frame, frame + 1);
    }

    #[test]
    fn kill_opens_modal_and_stops_substeps() {
        let mut g = game();
        let mut s = playing_session();
        g.sync_mode(&s);
        let target = g.world.entities[1].pos;
        g.world.entities[1].health = 1;
        g.handle_input(InputEvent::KeyDown("Space".into()));
        // Aim is irrelevant; park a shot on the music invader
        let id = g.world.next_entity_id();
        g.world
            .entities
            .push(crate::sim::Entity::projectile(id, target, Vec2::ZERO, 0.0, 1.0));

        let report = g.frame(0.0, 0.0, &mut s);
        assert_eq!(report.kills, vec![Category::Music]);
        assert!(s.collected().contains(Category::Music));
        assert_eq!(s.mode(), GameMode::ModalOpen);
        assert_eq!(s.active_content(), Some(ContentKind::Music));

        let frame = g.world.frame;
        assert_eq!(g.frame(60.0, 60.0, &mut s), TickReport::default());
        assert_eq!(g.world.frame, frame);
    }

    #[test]
    fn replay_restores_a_fresh_board() {
        let mut g = game();
        let mut s = playing_session();
        g.sync_mode(&s);
        g.world.score = 1200;
        g.world.win_started = true;
        g.world.combo.value = 5;
        g.world.entities.clear();
        for c in Category::ALL {
            s.on_item_collected(c);
        }

        g.replay(&mut s, 77);
        assert_eq!(g.world.score, 0);
        assert_eq!(g.world.combo.value, 0);
        assert!(!g.world.win_started);
        assert_eq!(g.world.enemy_count(), 3);
        assert!(s.collected().is_empty());
        assert_eq!(s.mode(), GameMode::Playing);
        assert_eq!(g.world.seed, 77);
    }

    #[test]
    fn settings_change_reshapes_effects() {
        let mut g = game();
        let s = playing_session();
        g.sync_mode(&s);
        crate::sim::effects::explode(
            &mut g.world,
            Vec2::new(400.0, 300.0),
            crate::sim::Color::WHITE,
            crate::sim::Burst::Death,
        );
        assert!(!g.world.particles.is_empty());
        assert_eq!(g.world.stars.len(), STAR_COUNT);

        let mut low = g.world.settings.clone();
        low.apply_preset(QualityPreset::Low);
        low.particles = false;
        g.apply_settings(low.clone());
        assert_eq!(g.world.settings, low);
        assert_eq!(g.world.stars.len(), low.star_count());
        assert!(g.world.particles.is_empty());
        assert!(!g.world.settings.trails);
    }

    #[test]
    fn draw_renders_current_world() {
        let mut g = game();
        let s = playing_session();
        g.sync_mode(&s);
        let mut surface = RecordingSurface::new();
        g.draw(&mut surface);
        assert!(surface.paint_count() > 0);
        assert_eq!(surface.depth(), 0);
    }
}
