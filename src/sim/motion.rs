//! Per-category invader motion
//!
//! Every enemy shares the same base step (integrate, bounce inside the safe
//! rectangle); the category then layers its own policy on top. Policies are
//! plain functions picked from a table indexed by category.

use std::f32::consts::{FRAC_PI_4, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::bounce_in_rect;
use super::state::{Category, Entity};

/// Read-only inputs a motion policy may look at
pub struct MotionCtx<'a> {
    /// Simulation frame counter
    pub t: f32,
    /// Play-area scale factor
    pub scale: f32,
    /// Safe rectangle (min, max)
    pub bounds: (Vec2, Vec2),
    /// Live projectile positions
    pub threats: &'a [Vec2],
}

pub type MotionPolicy = fn(&mut Entity, &MotionCtx, &mut Pcg32);

const POLICIES: [MotionPolicy; 3] = [wander, float, dodge];

/// Motion policy for a category
pub fn policy_for(category: Category) -> MotionPolicy {
    let index = match category {
        Category::Illustration => 0,
        Category::Music => 1,
        Category::Band => 2,
    };
    POLICIES[index]
}

/// Advance one enemy by one frame
pub fn step_enemy(enemy: &mut Entity, ctx: &MotionCtx, rng: &mut Pcg32) {
    let Some(category) = enemy.category() else {
        return;
    };
    enemy.pos += enemy.vel;
    let (min, max) = ctx.bounds;
    bounce_in_rect(enemy.pos, &mut enemy.vel, min, max);
    policy_for(category)(enemy, ctx, rng);
    enemy.pos = enemy.pos.clamp(min, max);
}

// Illustration: jittery wandering
const WANDER_SPEED: f32 = 1.6;
const WANDER_TURN_CHANCE: f64 = 0.02;
const WANDER_STOP_CHANCE: f64 = 0.004;

fn wander(e: &mut Entity, ctx: &MotionCtx, rng: &mut Pcg32) {
    if rng.random_bool(WANDER_STOP_CHANCE) {
        e.vel = Vec2::ZERO;
    } else if rng.random_bool(WANDER_TURN_CHANCE) {
        let heading = rng.random_range(0..8) as f32 * FRAC_PI_4;
        e.vel = Vec2::from_angle(heading) * WANDER_SPEED * ctx.scale;
    }
    e.rotation = (ctx.t * 0.1).sin() * 0.1 + e.vel.x * 0.05;
}

// Music: horizontal bounce with layered vertical waves
fn float(e: &mut Entity, ctx: &MotionCtx, _rng: &mut Pcg32) {
    let t = ctx.t;
    let s = ctx.scale;
    let swell = (t * 0.04 + e.wobble).sin() * 30.0 + (t * 0.09).cos() * 12.0 + (t * 0.013).sin() * 8.0;
    e.vel.y = 0.0;
    e.pos.y = e.anchor.y + swell * s;
    e.rotation = (t * 0.05).cos() * 0.2;
}

// Band: dodges incoming shots, dashes, drifts
const DODGE_RADIUS: f32 = 150.0;
const DODGE_IMPULSE: f32 = 0.6;
const DASH_CHANCE: f64 = 0.01;
const DASH_IMPULSE: f32 = 4.0;
const DODGE_FRICTION: f32 = 0.96;
const DODGE_MAX_SPEED: f32 = 4.0;

fn dodge(e: &mut Entity, ctx: &MotionCtx, rng: &mut Pcg32) {
    let s = ctx.scale;
    let radius_sq = (DODGE_RADIUS * s).powi(2);

    let nearest = ctx
        .threats
        .iter()
        .map(|p| (*p, p.distance_squared(e.pos)))
        .filter(|(_, d)| *d < radius_sq)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((threat, _)) = nearest {
        let away = (e.pos - threat).normalize_or_zero();
        e.vel += away * DODGE_IMPULSE * s;
    }

    if rng.random_bool(DASH_CHANCE) {
        let heading = rng.random::<f32>() * TAU;
        e.vel += Vec2::from_angle(heading) * DASH_IMPULSE * s;
    }

    e.vel *= DODGE_FRICTION;
    e.vel = e.vel.clamp_length_max(DODGE_MAX_SPEED * s);

    // Lazy figure-eight drift so it never fully settles
    let t = ctx.t;
    e.pos += Vec2::new((t * 0.03).sin() * 2.0, (t * 0.03).cos()) * s;
    e.rotation += e.vel.x * 0.01;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::PlayArea;
    use rand::SeedableRng;

    fn ctx(threats: &[Vec2]) -> MotionCtx<'_> {
        MotionCtx {
            t: 10.0,
            scale: 1.0,
            bounds: PlayArea::default().safe_rect(),
            threats,
        }
    }

    fn enemy(category: Category) -> Entity {
        Entity::enemy(1, category, &PlayArea::default(), 12.0)
    }

    #[test]
    fn policies_differ_per_category() {
        let a = policy_for(Category::Illustration) as usize;
        let b = policy_for(Category::Music) as usize;
        let c = policy_for(Category::Band) as usize;
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn dodge_steers_away_from_nearest_shot() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut e = enemy(Category::Band);
        e.pos = Vec2::new(400.0, 200.0);
        e.vel = Vec2::ZERO;
        // Nearest threat to the left, a farther one to the right
        let threats = [Vec2::new(380.0, 200.0), Vec2::new(500.0, 200.0)];
        dodge(&mut e, &ctx(&threats), &mut rng);
        assert!(e.vel.x > 0.0, "should push right, got {:?}", e.vel);
    }

    #[test]
    fn dodge_ignores_distant_shots_and_respects_max_speed() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut e = enemy(Category::Band);
        e.pos = Vec2::new(400.0, 200.0);
        e.vel = Vec2::new(50.0, 0.0);
        let threats = [Vec2::new(400.0, 590.0)];
        for _ in 0..10 {
            dodge(&mut e, &ctx(&threats), &mut rng);
            assert!(e.vel.length() <= DODGE_MAX_SPEED + 1e-4);
        }
    }

    #[test]
    fn float_stays_near_anchor() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut e = enemy(Category::Music);
        for t in 0..2000 {
            let c = MotionCtx {
                t: t as f32,
                ..ctx(&[])
            };
            float(&mut e, &c, &mut rng);
            assert!((e.pos.y - e.anchor.y).abs() <= 50.0 + 1e-3);
        }
    }

    #[test]
    fn wander_only_uses_compass_headings() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut e = enemy(Category::Illustration);
        let mut turned = false;
        for _ in 0..2000 {
            let before = e.vel;
            wander(&mut e, &ctx(&[]), &mut rng);
            if e.vel != before && e.vel != Vec2::ZERO {
                turned = true;
                let heading = e.vel.y.atan2(e.vel.x) / FRAC_PI_4;
                assert!((heading - heading.round()).abs() < 1e-3);
                assert!((e.vel.length() - WANDER_SPEED).abs() < 1e-3);
            }
        }
        assert!(turned);
    }

    #[test]
    fn enemies_stay_inside_safe_rect() {
        let mut rng = Pcg32::seed_from_u64(5);
        let area = PlayArea::default();
        let (min, max) = area.safe_rect();
        for category in Category::ALL {
            let mut e = Entity::enemy(1, category, &area, 40.0);
            for t in 0..5000 {
                let c = MotionCtx {
                    t: t as f32,
                    ..ctx(&[])
                };
                step_enemy(&mut e, &c, &mut rng);
                assert!(e.pos.x >= min.x && e.pos.x <= max.x, "{category:?} x {}", e.pos.x);
                assert!(e.pos.y >= min.y && e.pos.y <= max.y, "{category:?} y {}", e.pos.y);
            }
        }
    }
}
