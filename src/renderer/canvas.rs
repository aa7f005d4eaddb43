//! Canvas 2D surface (browser only)

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Color, Composite, Segment, Surface};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Acquire the 2D context of `canvas`
    ///
    /// Returns None when the browser refuses a 2D context; callers treat
    /// that as "never start" rather than an error.
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }

    /// Resize the backing store (also clears it)
    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self) {
        let size = self.size();
        self.ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn fill_overlay(&mut self, color: Color) {
        let size = self.size();
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.fill_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn set_composite(&mut self, op: Composite) {
        if let Err(e) = self.ctx.set_global_composite_operation(op.as_str()) {
            log::debug!("Composite {:?} rejected: {:?}", op, e);
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        match self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
        {
            Ok(()) => self.ctx.fill(),
            Err(e) => log::debug!("arc at {:?} r={} rejected: {:?}", center, radius, e),
        }
    }

    fn stroke_segments(&mut self, segments: &[Segment], width: f32, color: Color) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        for (a, b) in segments {
            self.ctx.move_to(a.x as f64, a.y as f64);
            self.ctx.line_to(b.x as f64, b.y as f64);
        }
        self.ctx.stroke();
    }
}
