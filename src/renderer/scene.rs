//! Shell drawing: HUD, status overlays, menu, PDF screen
//!
//! Games draw their own play field (see `Scene` impls in `games`); this
//! module draws everything around it.

use glam::Vec2;

use super::{Rgba, Surface, palette};
use crate::format_clock;
use crate::pdf::{JobState, PdfCompressor, format_file_size};
use crate::sim::GameStatus;

/// Height of the top bar above every screen
pub const HUD_HEIGHT: f32 = 56.0;

/// Maps game-field coordinates onto a region of the real surface
pub struct Transformed<'a> {
    inner: &'a mut dyn Surface,
    origin: Vec2,
    scale: f32,
}

impl<'a> Transformed<'a> {
    pub fn new(inner: &'a mut dyn Surface, origin: Vec2, scale: f32) -> Self {
        Self {
            inner,
            origin,
            scale,
        }
    }

    #[inline]
    fn map(&self, p: Vec2) -> Vec2 {
        self.origin + p * self.scale
    }
}

impl Surface for Transformed<'_> {
    fn size(&self) -> Vec2 {
        (self.inner.size() - self.origin) / self.scale
    }

    fn clear(&mut self, color: Rgba) {
        let size = self.size();
        self.fill_rect(Vec2::ZERO, size, color);
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Rgba) {
        let min = self.map(min);
        self.inner.fill_rect(min, size * self.scale, color);
    }

    fn stroke_rect(&mut self, min: Vec2, size: Vec2, color: Rgba, width: f32) {
        let min = self.map(min);
        self.inner.stroke_rect(min, size * self.scale, color, width);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let center = self.map(center);
        self.inner.fill_circle(center, radius * self.scale, color);
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        let (from, to) = (self.map(from), self.map(to));
        self.inner.line(from, to, color, width * self.scale);
    }

    fn text(&mut self, pos: Vec2, text: &str, px: f32, color: Rgba) {
        let pos = self.map(pos);
        self.inner.text(pos, text, (px * self.scale).max(9.0), color);
    }
}

/// What the top bar shows for a mounted game
#[derive(Debug, Clone)]
pub struct Hud<'a> {
    pub title: &'a str,
    pub score: u64,
    pub best: Option<u64>,
    pub status: GameStatus,
    /// Remaining time, for games on a clock
    pub seconds_left: Option<u32>,
    pub fps: Option<f64>,
    /// 0..1 highlight phase for the result banner
    pub pulse: f32,
}

pub fn draw_top_bar(surface: &mut dyn Surface, title: &str) {
    let width = surface.size().x;
    surface.fill_rect(Vec2::ZERO, Vec2::new(width, HUD_HEIGHT), palette::PANEL);
    surface.text(Vec2::new(16.0, 36.0), title, 22.0, palette::TEXT);
    surface.text(
        Vec2::new((width - 120.0).max(16.0), 36.0),
        "[H] Home",
        14.0,
        palette::MUTED,
    );
}

pub fn draw_hud(surface: &mut dyn Surface, hud: &Hud<'_>) {
    draw_top_bar(surface, hud.title);

    let mut stats = format!("Score {}", hud.score);
    if let Some(best) = hud.best {
        stats.push_str(&format!("   Best {}", best));
    }
    if let Some(secs) = hud.seconds_left {
        stats.push_str(&format!("   {}", format_clock(secs)));
    }
    let width = surface.size().x;
    surface.text(Vec2::new(width * 0.4, 36.0), &stats, 18.0, palette::TEXT);
    if let Some(fps) = hud.fps {
        surface.text(
            Vec2::new(16.0, HUD_HEIGHT + 20.0),
            &format!("{:.0} fps", fps),
            12.0,
            palette::MUTED,
        );
    }

    let banner = match hud.status {
        GameStatus::Playing => None,
        GameStatus::NotStarted => Some(("Tap or press Space to start", palette::TEXT)),
        GameStatus::Paused => Some(("Paused - press P to resume", palette::TEXT)),
        GameStatus::Won => Some(("You win! Press R to play again", palette::GOOD)),
        GameStatus::Lost => Some(("Game over - press R to retry", palette::BAD)),
    };
    if let Some((message, color)) = banner {
        let size = surface.size();
        let center = Vec2::new(size.x / 2.0, (size.y + HUD_HEIGHT) / 2.0);
        let box_size = Vec2::new(size.x.min(420.0), 72.0);
        surface.fill_rect(center - box_size / 2.0, box_size, palette::SCRIM);
        let border = if hud.status == GameStatus::Won {
            palette::GOLD.with_alpha(0.4 + 0.6 * hud.pulse.clamp(0.0, 1.0))
        } else {
            color
        };
        surface.stroke_rect(center - box_size / 2.0, box_size, border, 2.0);
        surface.text(
            center + Vec2::new(-box_size.x / 2.0 + 20.0, 6.0),
            message,
            18.0,
            color,
        );
    }
}

/// One clickable hub tile
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub min: Vec2,
    pub size: Vec2,
}

impl MenuEntry {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x
            && p.y >= self.min.y
            && p.x < self.min.x + self.size.x
            && p.y < self.min.y + self.size.y
    }
}

pub fn draw_menu(surface: &mut dyn Surface, entries: &[MenuEntry], cursor: usize) {
    surface.clear(palette::BACKDROP);
    draw_top_bar(surface, "eGov Arcade");
    for (i, entry) in entries.iter().enumerate() {
        let fill = if i == cursor {
            palette::ACCENT
        } else {
            palette::PANEL
        };
        surface.fill_rect(entry.min, entry.size, fill);
        surface.text(
            entry.min + Vec2::new(16.0, entry.size.y / 2.0 + 6.0),
            &format!("{}  {}", i + 1, entry.label),
            18.0,
            palette::TEXT,
        );
    }
}

pub fn draw_not_found(surface: &mut dyn Surface, path: &str) {
    surface.clear(palette::BACKDROP);
    draw_top_bar(surface, "Page not found");
    surface.text(
        Vec2::new(16.0, HUD_HEIGHT + 48.0),
        &format!("Nothing lives at {}", path),
        18.0,
        palette::MUTED,
    );
    surface.text(
        Vec2::new(16.0, HUD_HEIGHT + 80.0),
        "Press Enter or H to go back to the arcade",
        16.0,
        palette::TEXT,
    );
}

pub fn draw_pdf(surface: &mut dyn Surface, pdf: &PdfCompressor, notice: Option<&str>) {
    surface.clear(palette::BACKDROP);
    draw_top_bar(surface, "PDF Compressor");

    let mut col = Column {
        y: HUD_HEIGHT + 36.0,
    };
    col.line(
        surface,
        &format!("Compression level: {}%   [-] [+]", pdf.level()),
        palette::TEXT,
    );
    if pdf.files().is_empty() {
        col.line(surface, "Drop PDFs here or click to browse", palette::MUTED);
    }
    for (row, entry) in pdf.files().iter().enumerate() {
        let (status, color) = match entry.state {
            JobState::Waiting => ("ready".to_string(), palette::MUTED),
            JobState::Queued => ("queued".to_string(), palette::MUTED),
            JobState::Compressing => ("compressing...".to_string(), palette::GOLD),
            JobState::Done { size } => (format!("-> {}", format_file_size(size)), palette::GOOD),
        };
        col.line(
            surface,
            &format!(
                "[{}] {}  {}  {}",
                row + 1,
                entry.name,
                format_file_size(entry.original_size),
                status
            ),
            color,
        );
    }

    let totals = pdf.totals();
    if totals.count > 0 {
        col.line(
            surface,
            &format!(
                "Saved {} of {} ({}%)",
                format_file_size(totals.saved),
                format_file_size(totals.original),
                totals.percent_saved
            ),
            palette::GOOD,
        );
    }
    if let Some(notice) = notice {
        col.line(surface, notice, palette::BAD);
    }
    col.line(
        surface,
        "[C] compress all   [D] remove last   [X] reset   [1-9] save one   [S] save all",
        palette::MUTED,
    );
}

/// Top-down text cursor
struct Column {
    y: f32,
}

impl Column {
    fn line(&mut self, surface: &mut dyn Surface, text: &str, color: Rgba) {
        surface.text(Vec2::new(16.0, self.y), text, 16.0, color);
        self.y += 26.0;
    }
}
