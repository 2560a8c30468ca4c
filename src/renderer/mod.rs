//! Immediate-mode 2D rendering
//!
//! Games draw through the [`Surface`] capability and never hold on to it.
//! The browser build backs it with a canvas 2D context; tests and the native
//! demo use [`RecordingSurface`], which just keeps the draw calls.

pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::Canvas2d;
pub use scene::{
    HUD_HEIGHT, Hud, MenuEntry, Transformed, draw_hud, draw_menu, draw_not_found, draw_pdf,
};

use glam::Vec2;

/// Straight (non-premultiplied) sRGB color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS `rgba()` string for canvas fill/stroke styles
    pub fn to_css(self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

/// Shared colors
pub mod palette {
    use super::Rgba;

    pub const BACKDROP: Rgba = Rgba::rgb(18, 24, 38);
    pub const PANEL: Rgba = Rgba::rgb(32, 44, 68);
    pub const TEXT: Rgba = Rgba::rgb(236, 240, 248);
    pub const MUTED: Rgba = Rgba::rgb(140, 150, 170);
    pub const ACCENT: Rgba = Rgba::rgb(0, 120, 215);
    pub const GOOD: Rgba = Rgba::rgb(46, 196, 112);
    pub const BAD: Rgba = Rgba::rgb(226, 68, 68);
    pub const GOLD: Rgba = Rgba::rgb(250, 204, 21);
    pub const WALL: Rgba = Rgba::rgb(30, 58, 138);
    pub const FLOOR: Rgba = Rgba::rgb(241, 245, 249);
    pub const SKY: Rgba = Rgba::rgb(135, 206, 235);
    pub const PIPE: Rgba = Rgba::rgb(34, 139, 34);
    pub const SCRIM: Rgba = Rgba::rgb(0, 0, 0).with_alpha(0.55);
}

/// Drawing capability handed to scenes for the duration of one frame
pub trait Surface {
    /// Drawable area in surface pixels
    fn size(&self) -> Vec2;
    fn clear(&mut self, color: Rgba);
    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba);
    fn stroke_rect(&mut self, min: Vec2, size: Vec2, color: Rgba, width: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32);
    /// Left-aligned text with `pos` on the baseline
    fn text(&mut self, pos: Vec2, text: &str, px: f32, color: Rgba);
}

/// Something that knows how to draw itself
pub trait Scene {
    fn draw(&self, surface: &mut dyn Surface);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Rgba),
    FillRect { min: Vec2, size: Vec2, color: Rgba },
    StrokeRect { min: Vec2, size: Vec2, color: Rgba },
    FillCircle { center: Vec2, radius: f32, color: Rgba },
    Line { from: Vec2, to: Vec2, color: Rgba },
    Text { pos: Vec2, text: String, color: Rgba },
}

/// Surface that records instead of drawing
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: Vec2,
    calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            calls: Vec::new(),
        }
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// All text drawn so far, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.calls.iter().filter_map(|call| match call {
            DrawCall::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().any(|t| t.contains(needle))
    }

    pub fn count_rects(&self, color: Rgba) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::FillRect { color: c, .. } if *c == color))
            .count()
    }

    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self, color: Rgba) {
        self.calls.clear();
        self.calls.push(DrawCall::Clear(color));
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        self.calls.push(DrawCall::FillRect { min, size, color });
    }

    fn stroke_rect(&mut self, min: Vec2, size: Vec2, color: Rgba, _width: f32) {
        self.calls.push(DrawCall::StrokeRect { min, size, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.calls.push(DrawCall::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba, _width: f32) {
        self.calls.push(DrawCall::Line { from, to, color });
    }

    fn text(&mut self, pos: Vec2, text: &str, _px: f32, color: Rgba) {
        self.calls.push(DrawCall::Text {
            pos,
            text: text.to_string(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_color() {
        assert_eq!(Rgba::rgb(1, 2, 3).to_css(), "rgba(1,2,3,1)");
        assert_eq!(palette::SCRIM.to_css(), "rgba(0,0,0,0.55)");
    }

    #[test]
    fn test_clear_resets_recording() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        surface.text(Vec2::ZERO, "stale", 12.0, palette::TEXT);
        surface.clear(palette::BACKDROP);
        assert_eq!(surface.calls().len(), 1);
        assert!(!surface.has_text("stale"));
    }
}
