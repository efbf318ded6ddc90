//! Particles, floating text, camera shake and victory fireworks
//!
//! Purely cosmetic state. It shares the world RNG so a seeded run replays
//! identically, but nothing here feeds back into scoring.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Color, Entity, World};
use crate::consts::*;

/// Explosion sizes used by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Burst {
    /// Small spark where a shot lands
    Impact,
    /// Enemy destroyed
    Death,
    /// Victory celebration
    Firework,
}

impl Burst {
    /// (particle count, max speed)
    fn shape(self) -> (usize, f32) {
        match self {
            Burst::Impact => (5, 5.0),
            Burst::Death => (30, 12.0),
            Burst::Firework => (40, 18.0),
        }
    }
}

pub const FIREWORK_COLORS: [Color; 4] = [
    Color::hex(0xf472b6),
    Color::hex(0xec4899),
    Color::hex(0xbe185d),
    Color::hex(0xfda4af),
];

/// Spawn a particle burst and kick the camera
pub fn explode(world: &mut World, pos: Vec2, color: Color, burst: Burst) {
    if world.settings.effective_screen_shake() {
        world.screen_shake = (world.screen_shake + SHAKE_PER_EXPLOSION).min(MAX_SHAKE);
    }

    let (count, speed) = burst.shape();
    let room = world
        .settings
        .max_particles()
        .saturating_sub(world.particles.len());
    let s = world.area.scale();

    for _ in 0..count.min(room) {
        let angle = world.rng.random::<f32>() * TAU;
        let velocity = (world.rng.random::<f32>() * speed + 2.0) * s;
        let life = 30 + world.rng.random_range(0..30);
        let size = (world.rng.random::<f32>() * 3.0 + 1.0) * s;
        let tint = if world.rng.random_bool(0.4) {
            Color::WHITE
        } else {
            color
        };
        let id = world.next_entity_id();
        world.particles.push(Entity::particle(
            id,
            pos,
            Vec2::from_angle(angle) * velocity,
            size,
            life,
            tint,
        ));
    }
}

/// Rising, fading label
pub fn spawn_floating_text(world: &mut World, pos: Vec2, text: impl Into<String>, color: Color) {
    let drift = world.rng.random::<f32>() - 0.5;
    let id = world.next_entity_id();
    world.texts.push(Entity::floating_text(
        id,
        pos,
        Vec2::new(drift, -2.0) * world.area.scale(),
        text.into(),
        color,
    ));
}

/// Drag, shrink and age particles; drop the expired ones
pub fn update_particles(particles: &mut Vec<Entity>) {
    for p in particles.iter_mut() {
        p.pos += p.vel;
        p.vel *= PARTICLE_DRAG;
        p.size *= PARTICLE_SHRINK;
        p.health -= 1;
    }
    particles.retain(|p| p.health > 0);
}

/// Drift and fade floating text; drop the expired ones
pub fn update_texts(texts: &mut Vec<Entity>) {
    for txt in texts.iter_mut() {
        txt.pos += txt.vel;
        txt.health -= 1;
        txt.opacity = (txt.health as f32 / FADE_FRAMES).clamp(0.0, 1.0);
    }
    texts.retain(|t| t.health > 0);
}

/// Exponential camera-shake decay with a hard cutoff
pub fn decay_shake(world: &mut World) {
    if world.screen_shake > 0.0 {
        world.screen_shake *= SHAKE_DECAY;
        if world.screen_shake < SHAKE_CUTOFF {
            world.screen_shake = 0.0;
        }
    }
}

/// Occasional firework in the upper half while the win latch is set
pub fn fireworks(world: &mut World) {
    if !world.rng.random_bool(FIREWORK_CHANCE) {
        return;
    }
    let pos = Vec2::new(
        world.rng.random::<f32>() * world.area.width,
        world.rng.random::<f32>() * (world.area.height / 2.0),
    );
    let color = FIREWORK_COLORS[world.rng.random_range(0..FIREWORK_COLORS.len())];
    explode(world, pos, color, Burst::Firework);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::PlayArea;

    fn world() -> World {
        World::new(11, PlayArea::default(), Settings::default())
    }

    #[test]
    fn explode_spawns_burst_and_shakes() {
        let mut w = world();
        explode(&mut w, Vec2::new(100.0, 100.0), Color::WHITE, Burst::Death);
        assert_eq!(w.particles.len(), 30);
        assert_eq!(w.screen_shake, SHAKE_PER_EXPLOSION);
        for p in &w.particles {
            assert!((30..60).contains(&p.health));
            assert!(p.size >= 1.0 && p.size < 4.0);
        }
    }

    #[test]
    fn shake_is_capped_and_decays_to_zero() {
        let mut w = world();
        for _ in 0..10 {
            explode(&mut w, Vec2::ZERO, Color::WHITE, Burst::Impact);
        }
        assert_eq!(w.screen_shake, MAX_SHAKE);
        for _ in 0..100 {
            decay_shake(&mut w);
        }
        assert_eq!(w.screen_shake, 0.0);
    }

    #[test]
    fn reduced_motion_never_shakes() {
        let mut w = world();
        w.settings.reduced_motion = true;
        explode(&mut w, Vec2::ZERO, Color::WHITE, Burst::Death);
        assert_eq!(w.screen_shake, 0.0);
    }

    #[test]
    fn particle_cap_is_respected() {
        let mut w = world();
        w.settings.particles = false;
        explode(&mut w, Vec2::ZERO, Color::WHITE, Burst::Firework);
        assert!(w.particles.is_empty());
    }

    #[test]
    fn particles_expire_after_lifetime() {
        let mut w = world();
        explode(&mut w, Vec2::new(400.0, 300.0), Color::WHITE, Burst::Death);
        let start_size = w.particles[0].size;
        update_particles(&mut w.particles);
        assert!(w.particles[0].size < start_size);
        for _ in 0..60 {
            update_particles(&mut w.particles);
        }
        assert!(w.particles.is_empty());
    }

    #[test]
    fn floating_text_rises_and_fades() {
        let mut w = world();
        spawn_floating_text(&mut w, Vec2::new(200.0, 200.0), "NICE!", Color::WHITE);
        update_texts(&mut w.texts);
        let txt = &w.texts[0];
        assert!(txt.pos.y < 200.0);
        assert_eq!(txt.opacity, 1.0);
        assert_eq!(txt.text.as_deref(), Some("NICE!"));

        for _ in 0..44 {
            update_texts(&mut w.texts);
        }
        // 15 frames left
        assert!((w.texts[0].opacity - 0.5).abs() < 1e-6);

        for _ in 0..15 {
            update_texts(&mut w.texts);
        }
        assert!(w.texts.is_empty());
    }
}
