//! Pointer, touch and keyboard mapping
//!
//! Platform handlers translate DOM events into [`InputEvent`]s; the mapper
//! folds them into an aim point (play-area coordinates) and a fire intent
//! that the simulation samples once per frame.

use std::collections::HashSet;

use glam::Vec2;

use crate::sim::{PlayArea, TickInput};

/// Key code that fires while held
pub const FIRE_KEY: &str = "Space";

/// Displayed bounds of the drawing surface, in client pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Raw input, already stripped of DOM types
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseDown { x: f32, y: f32 },
    MouseUp,
    MouseMove { x: f32, y: f32 },
    MouseLeave,
    /// Primary touch point
    TouchStart { x: f32, y: f32 },
    TouchMove { x: f32, y: f32 },
    TouchEnd,
    KeyDown(String),
    KeyUp(String),
}

/// Folds input events into aim + fire intent
#[derive(Debug, Clone)]
pub struct InputMapper {
    area: PlayArea,
    rect: SurfaceRect,
    aim: Vec2,
    pointer_firing: bool,
    keys: HashSet<String>,
}

impl InputMapper {
    pub fn new(area: PlayArea) -> Self {
        Self {
            area,
            rect: SurfaceRect::new(0.0, 0.0, area.width, area.height),
            aim: Vec2::new(area.width / 2.0, 0.0),
            pointer_firing: false,
            keys: HashSet::new(),
        }
    }

    /// Track the surface's displayed bounds (layout or resize)
    pub fn set_rect(&mut self, rect: SurfaceRect) {
        self.rect = rect;
    }

    /// Client coordinates to play-area coordinates, or `None` while the
    /// surface has no displayed size
    pub fn to_play_area(&self, client_x: f32, client_y: f32) -> Option<Vec2> {
        let r = self.rect;
        if r.width <= 0.0 || r.height <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            (client_x - r.left) * (self.area.width / r.width),
            (client_y - r.top) * (self.area.height / r.height),
        ))
    }

    fn aim_at(&mut self, x: f32, y: f32) {
        if let Some(p) = self.to_play_area(x, y) {
            self.aim = p;
        }
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::MouseDown { x, y } | InputEvent::TouchStart { x, y } => {
                self.aim_at(x, y);
                self.pointer_firing = true;
            }
            InputEvent::TouchMove { x, y } => {
                self.aim_at(x, y);
                self.pointer_firing = true;
            }
            InputEvent::MouseMove { x, y } => self.aim_at(x, y),
            InputEvent::MouseUp | InputEvent::MouseLeave | InputEvent::TouchEnd => {
                self.pointer_firing = false;
            }
            InputEvent::KeyDown(code) => {
                self.keys.insert(code);
            }
            InputEvent::KeyUp(code) => {
                self.keys.remove(&code);
            }
        }
    }

    pub fn aim(&self) -> Vec2 {
        self.aim
    }

    pub fn fire_intent(&self) -> bool {
        self.pointer_firing || self.keys.contains(FIRE_KEY)
    }

    /// Drop held buttons and keys (focus loss, replay)
    pub fn release_all(&mut self) {
        self.pointer_firing = false;
        self.keys.clear();
    }

    /// Snapshot for one simulation frame
    pub fn tick_input(&self, now_ms: f64) -> TickInput {
        TickInput {
            aim: self.aim,
            fire: self.fire_intent(),
            now_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> InputMapper {
        let mut m = InputMapper::new(PlayArea::default());
        // Displayed at half size, offset on the page
        m.set_rect(SurfaceRect::new(100.0, 50.0, 400.0, 300.0));
        m
    }

    #[test]
    fn aim_starts_top_center() {
        let m = InputMapper::new(PlayArea::default());
        assert_eq!(m.aim(), Vec2::new(400.0, 0.0));
        assert!(!m.fire_intent());
    }

    #[test]
    fn client_coordinates_are_scale_corrected() {
        let mut m = mapper();
        m.handle(InputEvent::MouseMove { x: 300.0, y: 200.0 });
        assert_eq!(m.aim(), Vec2::new(400.0, 300.0));
        assert!(!m.fire_intent(), "move alone never fires");
    }

    #[test]
    fn mouse_button_controls_fire() {
        let mut m = mapper();
        m.handle(InputEvent::MouseDown { x: 100.0, y: 50.0 });
        assert!(m.fire_intent());
        assert_eq!(m.aim(), Vec2::ZERO);
        m.handle(InputEvent::MouseUp);
        assert!(!m.fire_intent());

        m.handle(InputEvent::MouseDown { x: 100.0, y: 50.0 });
        m.handle(InputEvent::MouseLeave);
        assert!(!m.fire_intent());
    }

    #[test]
    fn touch_aims_and_fires() {
        let mut m = mapper();
        m.handle(InputEvent::TouchStart { x: 500.0, y: 350.0 });
        assert!(m.fire_intent());
        assert_eq!(m.aim(), Vec2::new(800.0, 600.0));
        m.handle(InputEvent::TouchMove { x: 300.0, y: 50.0 });
        assert_eq!(m.aim(), Vec2::new(400.0, 0.0));
        m.handle(InputEvent::TouchEnd);
        assert!(!m.fire_intent());
    }

    #[test]
    fn fire_key_held() {
        let mut m = mapper();
        m.handle(InputEvent::KeyDown("KeyA".into()));
        assert!(!m.fire_intent());
        m.handle(InputEvent::KeyDown(FIRE_KEY.into()));
        assert!(m.fire_intent());
        // Pointer release does not cancel a held key
        m.handle(InputEvent::MouseUp);
        assert!(m.fire_intent());
        m.handle(InputEvent::KeyUp(FIRE_KEY.into()));
        assert!(!m.fire_intent());
    }

    #[test]
    fn zero_sized_rect_keeps_last_aim() {
        let mut m = mapper();
        m.handle(InputEvent::MouseMove { x: 300.0, y: 200.0 });
        m.set_rect(SurfaceRect::new(0.0, 0.0, 0.0, 300.0));
        m.handle(InputEvent::MouseDown { x: 10.0, y: 10.0 });
        assert_eq!(m.aim(), Vec2::new(400.0, 300.0));
        assert!(m.fire_intent());
    }

    #[test]
    fn tick_input_snapshot() {
        let mut m = mapper();
        m.handle(InputEvent::KeyDown(FIRE_KEY.into()));
        let input = m.tick_input(1234.0);
        assert!(input.fire);
        assert_eq!(input.now_ms, 1234.0);
        assert_eq!(input.aim, m.aim());

        m.release_all();
        assert!(!m.tick_input(0.0).fire);
    }
}
