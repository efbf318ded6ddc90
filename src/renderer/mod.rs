//! Canvas-style 2D rendering
//!
//! [`draw`] paints one frame of a [`World`] onto any [`Surface`]. It reads
//! the world only; randomness it needs (shake jitter, equalizer bars, muzzle
//! flash size) comes from [`frame_hash`] so drawing never advances the
//! simulation RNG.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod recorder;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use recorder::{DrawCmd, RecordingSurface};

use glam::Vec2;

use crate::frame_hash;
use crate::sim::{Category, Color, Entity, EntityKind, World};

/// Color plus alpha, as handed to the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS color string
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl From<Color> for Rgba {
    fn from(c: Color) -> Self {
        Self::new(c.r, c.g, c.b, 1.0)
    }
}

pub const BACKGROUND: Rgba = Rgba::new(0x05, 0x03, 0x08, 1.0);
pub const GRID: Rgba = Rgba::new(236, 72, 153, 0.15);
pub const SHIP_GLOW: Rgba = Rgba::new(0xec, 0x48, 0x99, 1.0);
pub const ENGINE: Rgba = Rgba::new(0x00, 0xff, 0xff, 1.0);
pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);
pub const BLACK: Rgba = Rgba::new(0, 0, 0, 1.0);
pub const MAGENTA: Rgba = Rgba::new(255, 0, 255, 1.0);

/// Minimal 2D drawing API (a subset of the HTML canvas context)
///
/// Paths are built with `begin_path` / `move_to` / `line_to` / `arc` and
/// painted with `fill` or `stroke`. `save` and `restore` cover the transform,
/// alpha and shadow state.
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, angle: f32);
    fn set_alpha(&mut self, alpha: f32);
    /// Glow around subsequent paints; `blur == 0` turns it off
    fn set_shadow(&mut self, blur: f32, color: Rgba);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);
    fn close_path(&mut self);
    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32);
    fn fill(&mut self, color: Rgba);
    fn stroke(&mut self, color: Rgba, width: f32);
    /// Centered text
    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Rgba);
}

/// Paint one frame
pub fn draw<S: Surface + ?Sized>(world: &World, surface: &mut S) {
    let (w, h) = (world.area.width, world.area.height);
    surface.fill_rect(0.0, 0.0, w, h, BACKGROUND);

    surface.save();
    if world.screen_shake > 0.0 {
        let dx = (frame_hash(world.frame, 1) - 0.5) * world.screen_shake;
        let dy = (frame_hash(world.frame, 2) - 0.5) * world.screen_shake;
        surface.translate(dx, dy);
    }

    draw_grid(world, surface);
    draw_stars(world, surface);
    if world.settings.trails {
        draw_trails(world, surface);
    }
    for entity in world.entities.iter().filter(|e| e.is_alive()) {
        match entity.kind {
            EntityKind::Projectile => draw_projectile(entity, surface),
            EntityKind::Enemy(category) => draw_enemy(world, entity, category, surface),
            EntityKind::Particle | EntityKind::FloatingText => {}
        }
    }
    draw_particles(world, surface);
    draw_texts(world, surface);
    draw_turret(world, surface);

    surface.restore();
}

/// Perspective grid: rays from a vanishing point above the top edge plus
/// horizontal lines scrolling toward the player
fn draw_grid<S: Surface + ?Sized>(world: &World, surface: &mut S) {
    let s = world.area.scale();
    let (w, h) = (world.area.width, world.area.height);
    let vanishing = Vec2::new(w / 2.0, -200.0 * s);

    surface.begin_path();
    let spacing = 100.0 * s;
    let mut x = -2.0 * w;
    while x <= 2.0 * w {
        surface.move_to(vanishing.x, vanishing.y);
        surface.line_to(x + w / 2.0, h);
        x += spacing;
    }
    surface.stroke(GRID, 1.0);

    let row = 80.0 * s;
    let offset = (world.frame as f32 * 2.0 * s) % row;
    let mut y = offset;
    while y <= h {
        let alpha = (y / h * 0.3).max(0.0);
        surface.begin_path();
        surface.move_to(0.0, y);
        surface.line_to(w, y);
        surface.stroke(GRID.with_alpha(alpha), 1.0);
        y += row;
    }
}

fn draw_stars<S: Surface + ?Sized>(world: &World, surface: &mut S) {
    for star in &world.stars {
        let size = (star.z * 1.2).max(0.8);
        surface.fill_rect(star.pos.x, star.pos.y, size, size, WHITE.with_alpha(star.alpha));
    }
}

fn draw_trails<S: Surface + ?Sized>(world: &World, surface: &mut S) {
    for shot in world.projectiles().filter(|p| p.trail.len() > 1) {
        let color = Rgba::from(shot.color);
        surface.set_shadow(10.0, color);
        surface.begin_path();
        let mut points = shot.trail.iter();
        if let Some(first) = points.next() {
            surface.move_to(first.x, first.y);
        }
        for p in points {
            surface.line_to(p.x, p.y);
        }
        surface.stroke(color, shot.size);
    }
    surface.set_shadow(0.0, BLACK);
}

fn draw_projectile<S: Surface + ?Sized>(shot: &Entity, surface: &mut S) {
    surface.save();
    surface.translate(shot.pos.x, shot.pos.y);
    surface.rotate(shot.rotation);
    surface.set_shadow(15.0, shot.color.into());
    shapes::circle(surface, Vec2::ZERO, shot.size);
    surface.fill(WHITE);
    surface.restore();
}

/// Hover bob: each enemy gets its own frequency and amplitude from its
/// wobble phase
pub fn hover_offset(wobble: f32, frame: u64) -> f32 {
    let freq = 20.0 + wobble % 15.0;
    let amp = 3.0 + wobble % 4.0;
    (frame as f32 / freq + wobble).sin() * amp
}

fn draw_enemy<S: Surface + ?Sized>(world: &World, enemy: &Entity, category: Category, surface: &mut S) {
    let s = world.area.scale();
    let hit = enemy.hit_flash > 0;
    let color = if hit { WHITE } else { Rgba::from(enemy.color) };

    surface.save();
    surface.translate(enemy.pos.x, enemy.pos.y);
    surface.rotate(enemy.rotation);
    surface.translate(0.0, hover_offset(enemy.wobble, world.frame) * s);
    surface.set_shadow(if hit { 20.0 } else { 15.0 }, color);

    let line = 3.0 * s;
    match category {
        Category::Illustration => {
            shapes::circle(surface, Vec2::ZERO, shapes::LENS_RADIUS * s);
            surface.stroke(color, line);
            if !hit {
                shapes::circle(surface, Vec2::ZERO, shapes::LENS_CORE * s);
                surface.fill(color);
            }
        }
        Category::Music => {
            surface.begin_path();
            for (i, x) in shapes::EQUALIZER_BARS.iter().enumerate() {
                let jitter = frame_hash(world.frame, enemy.id.wrapping_mul(16).wrapping_add(i as u32));
                let half = (10.0 + jitter * 10.0) * s;
                surface.move_to(x * s, -half);
                surface.line_to(x * s, half);
            }
            surface.stroke(color, line);
        }
        Category::Band => {
            shapes::polygon(surface, &shapes::BAND_TRIANGLE, s);
            surface.stroke(color, line);
            shapes::circle(surface, shapes::BAND_HEAD * s, shapes::BAND_HEAD_RADIUS * s);
            if hit {
                surface.stroke(color, line);
            } else {
                surface.fill(color);
            }
        }
    }

    if !hit && world.settings.labels {
        // Labels stay upright
        surface.rotate(-enemy.rotation);
        surface.fill_text(category.label(), 0.0, -40.0 * s, 10.0 * s, WHITE);
    }
    surface.restore();
}

fn draw_particles<S: Surface + ?Sized>(world: &World, surface: &mut S) {
    for p in &world.particles {
        surface.set_alpha((p.health as f32 / crate::consts::FADE_FRAMES).min(1.0));
        shapes::circle(surface, p.pos, p.size);
        surface.fill(p.color.into());
    }
    surface.set_alpha(1.0);
}

fn draw_texts<S: Surface + ?Sized>(world: &World, surface: &mut S) {
    let s = world.area.scale();
    for txt in &world.texts {
        let Some(text) = txt.text.as_deref() else {
            continue;
        };
        surface.save();
        surface.set_alpha(txt.opacity);
        surface.set_shadow(4.0, BLACK);
        surface.fill_text(text, txt.pos.x, txt.pos.y, 12.0 * s, txt.color.into());
        surface.restore();
    }
}

fn draw_turret<S: Surface + ?Sized>(world: &World, surface: &mut S) {
    let s = world.area.scale();
    let turret = &world.turret;
    let bob = (world.frame as f32 / 20.0).sin() * 2.0 * s;

    surface.save();
    surface.translate(turret.pos.x, turret.pos.y + bob);
    surface.rotate(turret.rotation);

    if turret.muzzle_flash > 0 {
        let radius = (20.0 + frame_hash(world.frame, 3) * 10.0) * s;
        surface.set_shadow(30.0, MAGENTA);
        shapes::circle(surface, Vec2::new(0.0, -35.0 * s), radius);
        surface.fill(WHITE);
    }

    surface.set_shadow(20.0, SHIP_GLOW);
    shapes::polygon(surface, &shapes::SHIP_HULL, s);
    surface.fill(WHITE);

    surface.set_shadow(10.0, ENGINE);
    shapes::polygon(surface, &shapes::SHIP_ENGINE, s);
    surface.fill(ENGINE);

    surface.set_shadow(0.0, BLACK);
    surface.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{CollectedItems, PlayArea};

    fn world() -> World {
        let mut w = World::new(5, PlayArea::default(), Settings::default());
        w.init_level(&CollectedItems::new());
        w
    }

    #[test]
    fn frame_starts_with_background_and_balances_state() {
        let w = world();
        let mut surface = RecordingSurface::new();
        draw(&w, &mut surface);
        assert_eq!(
            surface.commands().first(),
            Some(&DrawCmd::FillRect {
                x: 0.0,
                y: 0.0,
                w: 800.0,
                h: 600.0,
                color: BACKGROUND
            })
        );
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn labels_drawn_for_each_enemy() {
        let w = world();
        let mut surface = RecordingSurface::new();
        draw(&w, &mut surface);
        let labels = surface.texts();
        for category in Category::ALL {
            assert!(labels.contains(&category.label().to_string()));
        }
    }

    #[test]
    fn hit_enemy_draws_white_without_label() {
        let mut w = world();
        w.entities[0].hit_flash = 2;
        let mut surface = RecordingSurface::new();
        draw(&w, &mut surface);
        let labels = surface.texts();
        assert!(!labels.contains(&"ILLUSTRATION".to_string()));
        assert!(labels.contains(&"MUSIC".to_string()));
    }

    #[test]
    fn dead_entities_are_not_drawn() {
        let mut w = world();
        for e in w.entities.iter_mut() {
            e.health = 0;
        }
        let mut surface = RecordingSurface::new();
        draw(&w, &mut surface);
        assert!(surface.texts().is_empty());
    }

    #[test]
    fn labels_setting_hides_text() {
        let mut w = world();
        w.settings.labels = false;
        let mut surface = RecordingSurface::new();
        draw(&w, &mut surface);
        assert!(surface.texts().is_empty());
    }

    #[test]
    fn shake_translates_camera() {
        let mut w = world();
        let mut calm = RecordingSurface::new();
        draw(&w, &mut calm);
        w.screen_shake = 20.0;
        let mut shaken = RecordingSurface::new();
        draw(&w, &mut shaken);
        assert!(!matches!(calm.commands()[2], DrawCmd::Translate { .. }));
        assert!(matches!(shaken.commands()[2], DrawCmd::Translate { .. }));
    }

    #[test]
    fn same_world_draws_identically() {
        let mut w = world();
        w.turret.muzzle_flash = 2;
        w.screen_shake = 10.0;
        let mut a = RecordingSurface::new();
        let mut b = RecordingSurface::new();
        draw(&w, &mut a);
        draw(&w, &mut b);
        assert_eq!(a.commands(), b.commands());
    }

    #[test]
    fn hover_offset_is_bounded_by_amplitude() {
        for wobble in [0.0, 13.0, 57.0, 99.0] {
            for frame in 0..200 {
                let amp = 3.0 + wobble % 4.0;
                assert!(hover_offset(wobble, frame).abs() <= amp + 1e-4);
            }
        }
    }

    #[test]
    fn css_formats_rgba() {
        assert_eq!(GRID.css(), "rgba(236, 72, 153, 0.15)");
        assert_eq!(Rgba::from(Color::hex(0x4ade80)).css(), "rgba(74, 222, 128, 1)");
    }
}
