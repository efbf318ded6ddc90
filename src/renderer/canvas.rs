//! HTML canvas backend

use web_sys::CanvasRenderingContext2d;

use super::{Rgba, Surface};

const FONT_FAMILY: &str = "\"Press Start 2P\", monospace";

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        ctx.set_text_align("center");
        Self { ctx }
    }
}

/// Canvas calls that can throw only do so on non-finite input; skip the op
fn check(op: &str, result: Result<(), wasm_bindgen::JsValue>) {
    if let Err(e) = result {
        log::debug!("canvas {} failed: {:?}", op, e);
    }
}

impl Surface for CanvasSurface {
    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f32, y: f32) {
        check("translate", self.ctx.translate(x as f64, y as f64));
    }

    fn rotate(&mut self, angle: f32) {
        check("rotate", self.ctx.rotate(angle as f64));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha.clamp(0.0, 1.0) as f64);
    }

    fn set_shadow(&mut self, blur: f32, color: Rgba) {
        self.ctx.set_shadow_blur(blur as f64);
        self.ctx.set_shadow_color(&color.css());
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill_rect(x as f64, y as f64, w as f64, h as f64);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ctx.move_to(x as f64, y as f64);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ctx.line_to(x as f64, y as f64);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn arc(&mut self, x: f32, y: f32, radius: f32, start: f32, end: f32) {
        check(
            "arc",
            self.ctx
                .arc(x as f64, y as f64, radius as f64, start as f64, end as f64),
        );
    }

    fn fill(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.fill();
    }

    fn stroke(&mut self, color: Rgba, width: f32) {
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width as f64);
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, size: f32, color: Rgba) {
        self.ctx.set_font(&format!("{}px {}", size.round().max(1.0), FONT_FAMILY));
        self.ctx.set_fill_style_str(&color.css());
        check("fill_text", self.ctx.fill_text(text, x as f64, y as f64));
    }
}
