//! One simulation frame
//!
//! Phases run in a fixed order: aim, fire, stars, entity motion, particles,
//! cleanup, collisions, win check (or fireworks once the win latch is set).

use glam::Vec2;
use rand::Rng;

use super::collision::first_hit;
use super::effects::{self, Burst};
use super::host::Host;
use super::motion::{MotionCtx, step_enemy};
use super::state::{Category, Color, Entity, EntityKind, GameMode, World};
use crate::consts::*;
use crate::{aim_angle, rotation_to_dir};

/// Input sampled for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Aim target in play-area coordinates
    pub aim: Vec2,
    /// Mouse button, touch or fire key held
    pub fire: bool,
    /// Wall clock in milliseconds (fire rate, combo window)
    pub now_ms: f64,
}

/// What happened during a frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub shots: u32,
    pub hits: u32,
    pub kills: Vec<Category>,
    pub win_triggered: bool,
}

/// Advance the world by one frame.
///
/// Does nothing unless the host is in [`GameMode::Playing`] or
/// [`GameMode::Win`].
pub fn update<H: Host + ?Sized>(world: &mut World, input: &TickInput, host: &mut H) -> TickReport {
    let mut report = TickReport::default();
    if !host.game_mode().simulates() {
        return report;
    }

    world.frame += 1;
    effects::decay_shake(world);
    if world.turret.muzzle_flash > 0 {
        world.turret.muzzle_flash -= 1;
    }
    world.combo.decay(input.now_ms);

    // Aim
    world.turret.rotation = aim_angle(world.turret.pos, input.aim);

    // Fire
    let ready = world
        .last_shot_ms
        .is_none_or(|last| input.now_ms - last > FIRE_INTERVAL_MS);
    if input.fire && ready && !world.win_started {
        fire(world, input.now_ms);
        report.shots += 1;
    }
    // Recoil recovery
    world.turret.pos.y += (world.turret.base.y - world.turret.pos.y) * RECOIL_RECOVERY;

    update_stars(world, input.aim.x);
    move_entities(world);

    effects::update_particles(&mut world.particles);
    effects::update_texts(&mut world.texts);

    cleanup(world);

    if !world.win_started {
        let score_before = world.score;
        resolve_collisions(world, input.now_ms, host, &mut report);
        if world.score != score_before {
            host.on_score_update(world.score);
        }
        report.win_triggered = check_win(world, host);
    } else {
        effects::fireworks(world);
    }

    report
}

/// Spawn a projectile at the muzzle and kick the turret
fn fire(world: &mut World, now_ms: f64) {
    let s = world.area.scale();
    let dir = rotation_to_dir(world.turret.rotation);

    world.turret.pos.y = world.turret.base.y + RECOIL * s;
    world.turret.muzzle_flash = MUZZLE_FLASH_FRAMES;

    let origin = world.turret.pos + dir * MUZZLE_OFFSET * s;
    let id = world.next_entity_id();
    world.entities.push(Entity::projectile(
        id,
        origin,
        dir * PROJECTILE_SPEED * s,
        world.turret.rotation,
        s,
    ));
    world.last_shot_ms = Some(now_ms);
}

/// Scroll the star field with horizontal parallax from the aim point
fn update_stars(world: &mut World, aim_x: f32) {
    let (w, h) = (world.area.width, world.area.height);
    let s = world.area.scale();
    let parallax = (aim_x - w / 2.0) * 0.05;

    for star in world.stars.iter_mut() {
        star.pos.y += star.z * 1.2 * s;
        star.pos.x -= parallax * star.z * 0.05;

        if star.pos.y > h {
            star.pos.y = -5.0;
            star.pos.x = world.rng.random::<f32>() * w;
        }
        if star.pos.x < 0.0 {
            star.pos.x += w;
        }
        if star.pos.x > w {
            star.pos.x -= w;
        }

        // Twinkle
        if world.rng.random_bool(0.02) {
            star.alpha = 0.3 + world.rng.random::<f32>() * 0.7;
        }
    }
}

/// Trails, hit flash, projectile flight and enemy AI
fn move_entities(world: &mut World) {
    // Snapshot shot positions so enemies can react to them
    let threats: Vec<Vec2> = world.projectiles().map(|p| p.pos).collect();
    let ctx = MotionCtx {
        t: world.frame as f32,
        scale: world.area.scale(),
        bounds: world.area.safe_rect(),
        threats: &threats,
    };

    for entity in world.entities.iter_mut() {
        entity.record_trail();
        if entity.hit_flash > 0 {
            entity.hit_flash -= 1;
        }

        match entity.kind {
            EntityKind::Projectile => entity.pos += entity.vel,
            EntityKind::Enemy(_) => step_enemy(entity, &ctx, &mut world.rng),
            EntityKind::Particle | EntityKind::FloatingText => {}
        }
    }
}

/// Purge dead entities and anything past the off-screen margin
fn cleanup(world: &mut World) {
    let area = world.area;
    let margin = OFFSCREEN_MARGIN * area.scale();
    world
        .entities
        .retain(|e| e.is_alive() && area.contains_with_margin(e.pos, margin));
    world
        .particles
        .retain(|p| area.contains_with_margin(p.pos, margin));
}

/// Projectile vs enemy pass; each projectile lands at most one hit
fn resolve_collisions<H: Host + ?Sized>(
    world: &mut World,
    now_ms: f64,
    host: &mut H,
    report: &mut TickReport,
) {
    let s = world.area.scale();

    for i in 0..world.entities.len() {
        let shot = &world.entities[i];
        if !shot.is_projectile() || !shot.is_alive() {
            continue;
        }
        let Some(target) = first_hit(shot, &world.entities) else {
            continue;
        };
        let shot_pos = shot.pos;
        world.entities[i].health = 0;

        let enemy = &mut world.entities[target];
        enemy.health -= 1;
        enemy.hit_flash = HIT_FLASH_FRAMES;
        let (enemy_pos, enemy_color, remaining) = (enemy.pos, enemy.color, enemy.health);
        let category = enemy.category();

        let multiplier = world.combo.register_hit(now_ms);
        let points = HIT_POINTS * u64::from(multiplier);
        world.score += points;
        report.hits += 1;

        effects::explode(world, shot_pos, Color::WHITE, Burst::Impact);
        effects::spawn_floating_text(
            world,
            enemy_pos - Vec2::new(0.0, 20.0 * s),
            points.to_string(),
            Color::WHITE,
        );

        if remaining > 0 {
            continue;
        }
        let Some(category) = category else {
            continue;
        };

        log::info!("{:?} invader destroyed (score {})", category, world.score);
        effects::explode(world, enemy_pos, enemy_color, Burst::Death);
        host.on_item_collected(category);
        host.on_open_content(category.into());
        effects::spawn_floating_text(
            world,
            enemy_pos - Vec2::new(0.0, 40.0 * s),
            "NICE!",
            enemy_color,
        );
        report.kills.push(category);
    }
}

/// Latch the win sequence once the board is clear and everything is collected.
///
/// Requires points scored this session, so a replayed board that starts with
/// everything collected never wins by itself. A content panel opened by the
/// final kill defers the latch until the host is back in a simulating mode.
fn check_win<H: Host + ?Sized>(world: &mut World, host: &mut H) -> bool {
    if world.win_started
        || world.enemy_count() > 0
        || world.score == 0
        || !host.collected().is_complete()
        || !host.game_mode().simulates()
    {
        return false;
    }
    world.win_started = true;
    log::info!("All content unlocked, starting win sequence (score {})", world.score);
    host.set_game_mode(GameMode::Win);
    true
}
