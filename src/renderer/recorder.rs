//! Surface that records draw calls instead of painting
//!
//! Used by tests and by the headless native runner.

use super::{Rgba, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Rotate { angle: f32 },
    SetAlpha { alpha: f32 },
    SetShadow { blur: f32, color: Rgba },
    FillRect { x: f32, y: f32, w: f32, h: f32, color: Rgba },
    BeginPath,
    MoveTo { x: f32, y: f32 },
    LineTo { x: f32, y: f32 },
    ClosePath,
    Arc { x: f32, y: f32, radius: f32, start: f32, end: f32 },
    Fill { color: Rgba },
    Stroke { color: Rgba, width: f32 },
    FillText { text: String, x: f32, y: f32, size: f32, color: Rgba },
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Vec<DrawCmd>,
    depth: i32,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    /// Open `save` calls without a matching `restore`
    pub fn depth(&self) -> i32 {
        self.depth
    }

    /// Every string drawn, in order
    pub fn texts(&self) -> Vec<String> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::FillText { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of paint operations (fills, strokes, rects, text)
    pub fn paint_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    DrawCmd::Fill { .. }
                        | DrawCmd::Stroke { .. }
                        | DrawCmd::FillRect { .. }
                        | DrawCmd::FillText { .. }
                )
            })
            .count()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.depth = 0;
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCmd::Save);
    }

    fn restore(&mut self) {
        self.depth -= 1;
        self.commands.push(DrawCmd::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCmd::Translate { x, y });
    }

    fn rotate(&mut self, angle: f32) {
        self.commands.push(DrawCmd::Rotate { angle });
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCmd::SetAlpha { alpha });
    }

    fn set_shadow(&mut self, blur: f32, color: Rgba) {
        self.commands.push(DrawCmd::SetShadow { blur, color });
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.commands.push(DrawCmd::FillRect { x, y, w, h, color });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCmd::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCmd::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCmd::LineTo { x, y });
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCmd::ClosePath);
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        self.commands.push(DrawCmd::Arc {
            x,
            y,
            radius,
            start,
            end,
        });
    }

    fn fill(&mut self, color: Rgba) {
        self.commands.push(DrawCmd::Fill { color });
    }

    fn stroke(&mut self, color: Rgba, width: f32) {
        self.commands.push(DrawCmd::Stroke { color, width });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Rgba) {
        self.commands.push(DrawCmd::FillText {
            text: text.to_string(),
            x,
            y,
            size,
            color,
        });
    }
}
