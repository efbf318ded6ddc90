//! Collision detection between projectiles and invaders
//!
//! Everything is a circle: a hit registers when the distance between centers
//! is strictly less than the sum of radii. The squared form avoids a sqrt per
//! pair and agrees with the linear form everywhere.

use glam::Vec2;

use super::state::Entity;

/// Circle-circle overlap using squared distance
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Reference form with an explicit sqrt
#[inline]
pub fn circles_overlap_linear(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Index of the first still-alive enemy the projectile overlaps.
///
/// `entities` is the unified enemy/projectile list; projectiles and dead
/// entries are skipped.
pub fn first_hit(projectile: &Entity, entities: &[Entity]) -> Option<usize> {
    entities.iter().position(|e| {
        e.category().is_some()
            && e.is_alive()
            && circles_overlap(projectile.pos, projectile.size, e.pos, e.size)
    })
}

/// Reflect a velocity off the walls of an axis-aligned box.
///
/// Only flips components that point further out of bounds, so an entity that
/// overshot by a frame is not trapped flipping back and forth.
pub fn bounce_in_rect(pos: Vec2, vel: &mut Vec2, min: Vec2, max: Vec2) {
    if (pos.x <= min.x && vel.x < 0.0) || (pos.x >= max.x && vel.x > 0.0) {
        vel.x = -vel.x;
    }
    if (pos.y <= min.y && vel.y < 0.0) || (pos.y >= max.y && vel.y > 0.0) {
        vel.y = -vel.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Category, PlayArea};
    use proptest::prelude::*;

    #[test]
    fn touching_circles_do_not_collide() {
        // Distance exactly equals the radius sum
        assert!(!circles_overlap(Vec2::ZERO, 4.0, Vec2::new(49.0, 0.0), 45.0));
        assert!(circles_overlap(Vec2::ZERO, 4.0, Vec2::new(48.9, 0.0), 45.0));
    }

    #[test]
    fn first_hit_skips_dead_and_projectiles() {
        let area = PlayArea::default();
        let mut dead = Entity::enemy(1, Category::Music, &area, 0.0);
        dead.pos = Vec2::new(100.0, 100.0);
        dead.health = 0;
        let mut live = Entity::enemy(2, Category::Band, &area, 0.0);
        live.pos = Vec2::new(100.0, 100.0);
        let other = Entity::projectile(3, Vec2::new(100.0, 100.0), Vec2::ZERO, 0.0, 1.0);

        let shot = Entity::projectile(4, Vec2::new(100.0, 110.0), Vec2::ZERO, 0.0, 1.0);
        let list = vec![other, dead, live];
        assert_eq!(first_hit(&shot, &list), Some(2));

        let far = Entity::projectile(5, Vec2::new(400.0, 400.0), Vec2::ZERO, 0.0, 1.0);
        assert_eq!(first_hit(&far, &list), None);
    }

    #[test]
    fn bounce_flips_outward_components_only() {
        let (min, max) = (Vec2::splat(50.0), Vec2::new(750.0, 400.0));

        let mut vel = Vec2::new(-2.0, 1.0);
        bounce_in_rect(Vec2::new(40.0, 200.0), &mut vel, min, max);
        assert_eq!(vel, Vec2::new(2.0, 1.0));

        // Already heading back inside: unchanged
        let mut vel = Vec2::new(2.0, 1.0);
        bounce_in_rect(Vec2::new(40.0, 200.0), &mut vel, min, max);
        assert_eq!(vel, Vec2::new(2.0, 1.0));

        let mut vel = Vec2::new(0.0, 3.0);
        bounce_in_rect(Vec2::new(300.0, 420.0), &mut vel, min, max);
        assert_eq!(vel, Vec2::new(0.0, -3.0));
    }

    proptest! {
        #[test]
        fn squared_and_linear_agree(
            ax in -1000i32..1000, ay in -1000i32..1000,
            bx in -1000i32..1000, by in -1000i32..1000,
            ra in 1u8..60, rb in 1u8..60,
        ) {
            // Integer lattice keeps both forms exact in f32
            let a = Vec2::new(ax as f32, ay as f32);
            let b = Vec2::new(bx as f32, by as f32);
            prop_assert_eq!(
                circles_overlap(a, ra as f32, b, rb as f32),
                circles_overlap_linear(a, ra as f32, b, rb as f32)
            );
        }

        #[test]
        fn overlap_is_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            ra in 0.5f32..60.0, rb in 0.5f32..60.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(circles_overlap(a, ra, b, rb), circles_overlap(b, rb, a, ra));
        }
    }
}
