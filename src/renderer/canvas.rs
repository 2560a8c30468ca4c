//! HTML canvas 2D backend

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Rgba, Surface};
use crate::error::ArcadeError;

/// [`Surface`] over a canvas 2D context, in CSS pixels
pub struct Canvas2d {
    ctx: CanvasRenderingContext2d,
    size: Vec2,
    dpr: f64,
}

impl Canvas2d {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, ArcadeError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| ArcadeError::Canvas(format!("{:?}", e)))?
            .ok_or_else(|| ArcadeError::Canvas("2d context unavailable".to_string()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| ArcadeError::Canvas("not a 2d context".to_string()))?;
        let mut surface = Self {
            ctx,
            size: Vec2::ZERO,
            dpr: 1.0,
        };
        surface.resize(canvas);
        Ok(surface)
    }

    /// Match the backing store to the element's CSS size and pixel ratio
    pub fn resize(&mut self, canvas: &HtmlCanvasElement) {
        let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
        let css_w = canvas.client_width().max(1) as f64;
        let css_h = canvas.client_height().max(1) as f64;
        canvas.set_width((css_w * dpr) as u32);
        canvas.set_height((css_h * dpr) as u32);
        // Setting the size resets the transform
        if let Err(e) = self.ctx.scale(dpr, dpr) {
            log::warn!("Canvas scale failed: {:?}", e);
        }
        self.dpr = dpr;
        self.size = Vec2::new(css_w as f32, css_h as f32);
        log::debug!("Canvas resized to {}x{} @{}x", css_w, css_h, dpr);
    }

    pub fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }
}

impl Surface for Canvas2d {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Rgba) {
        let size = self.size;
        self.ctx
            .clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
        self.fill_rect(Vec2::ZERO, size, color);
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
    }

    fn stroke_rect(&mut self, min: Vec2, size: Vec2, color: Rgba, width: f32) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx
            .stroke_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        if self
            .ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius.max(0.0) as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.set_line_cap("round");
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn text(&mut self, pos: Vec2, text: &str, px: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .set_font(&format!("{}px system-ui, sans-serif", px.round()));
        if let Err(e) = self.ctx.fill_text(text, pos.x as f64, pos.y as f64) {
            log::debug!("fill_text failed: {:?}", e);
        }
    }
}
