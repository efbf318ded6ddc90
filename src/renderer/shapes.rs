//! Glyph outlines and path helpers
//!
//! Outlines are in reference units around the glyph's origin and get scaled
//! at draw time.

use std::f32::consts::TAU;

use glam::Vec2;

use super::Surface;

/// Player ship: tip, right wing, tail notch, left wing
pub const SHIP_HULL: [Vec2; 4] = [
    Vec2::new(0.0, -20.0),
    Vec2::new(14.0, 14.0),
    Vec2::new(0.0, 8.0),
    Vec2::new(-14.0, 14.0),
];

/// Exhaust flame under the tail notch
pub const SHIP_ENGINE: [Vec2; 3] = [Vec2::new(0.0, 8.0), Vec2::new(6.0, 16.0), Vec2::new(-6.0, 16.0)];

/// Illustration: outer ring and filled core
pub const LENS_RADIUS: f32 = 22.0;
pub const LENS_CORE: f32 = 8.0;

/// Music: x offsets of the equalizer bars
pub const EQUALIZER_BARS: [f32; 6] = [-20.0, -12.0, -4.0, 4.0, 12.0, 20.0];

/// Band: open triangle with a head
pub const BAND_TRIANGLE: [Vec2; 3] = [Vec2::new(-15.0, 10.0), Vec2::new(0.0, -15.0), Vec2::new(15.0, 10.0)];
pub const BAND_HEAD: Vec2 = Vec2::new(0.0, -5.0);
pub const BAND_HEAD_RADIUS: f32 = 5.0;

/// Start a closed polygon path, scaled about the origin
pub fn polygon<S: Surface + ?Sized>(surface: &mut S, points: &[Vec2], scale: f32) {
    surface.begin_path();
    let mut iter = points.iter().map(|p| *p * scale);
    if let Some(first) = iter.next() {
        surface.move_to(first.x, first.y);
    }
    for p in iter {
        surface.line_to(p.x, p.y);
    }
    surface.close_path();
}

/// Start a full-circle path
pub fn circle<S: Surface + ?Sized>(surface: &mut S, center: Vec2, radius: f32) {
    surface.begin_path();
    surface.arc(center.x, center.y, radius.max(0.0), 0.0, TAU);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCmd, RecordingSurface};

    fn bounds(points: &[Vec2]) -> Option<(Vec2, Vec2)> {
        let first = *points.first()?;
        Some(
            points
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
        )
    }

    #[test]
    fn polygon_is_scaled_and_closed() {
        let mut surface = RecordingSurface::new();
        polygon(&mut surface, &BAND_TRIANGLE, 2.0);
        assert_eq!(
            surface.commands(),
            &[
                DrawCmd::BeginPath,
                DrawCmd::MoveTo { x: -30.0, y: 20.0 },
                DrawCmd::LineTo { x: 0.0, y: -30.0 },
                DrawCmd::LineTo { x: 30.0, y: 20.0 },
                DrawCmd::ClosePath,
            ]
        );
    }

    #[test]
    fn glyphs_fit_inside_collision_radius() {
        let radius = crate::consts::ENEMY_SIZE;
        for outline in [&SHIP_HULL[..], &BAND_TRIANGLE[..], &SHIP_ENGINE[..]] {
            let (lo, hi) = bounds(outline).unwrap();
            assert!(lo.length() < radius && hi.length() < radius);
        }
        assert!(LENS_RADIUS < radius);
        assert!(EQUALIZER_BARS.iter().all(|x| x.abs() < radius));
    }

    #[test]
    fn ship_points_up() {
        let (lo, _) = bounds(&SHIP_HULL).unwrap();
        assert_eq!(lo.y, SHIP_HULL[0].y);
        assert_eq!(bounds(&[]), None);
    }

    #[test]
    fn negative_radius_is_clamped() {
        let mut surface = RecordingSurface::new();
        circle(&mut surface, Vec2::ZERO, -3.0);
        assert!(matches!(surface.commands()[1], DrawCmd::Arc { radius, .. } if radius == 0.0));
    }
}
