//! eGov Arcade Hub - a browser hub of small mini-games
//!
//! Core modules:
//! - `sim`: Deterministic game logic (clock, input, physics, collisions, sessions, maze)
//! - `games`: The individual mini-games, written as hooks for `sim::Session`
//! - `hub`: Screen routing, mount/unmount and session ownership
//! - `renderer`: Immediate-mode drawing surface and per-game scenes
//! - `platform`: Tick sources with cancellation, browser bindings
//! - `pdf`: Client-side PDF size reduction (simulated)

pub mod error;
pub mod games;
pub mod highscores;
pub mod hub;
pub mod pdf;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::ArcadeError;
pub use highscores::{MemoryStore, ScoreStore, SharedStore};
pub use hub::{Hub, Screen};
pub use settings::Settings;

use glam::Vec2;

/// Shared timing constants
pub mod consts {
    /// Nominal animation frame period (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Maximum ticks run per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap we are willing to simulate (tab switches etc.)
    pub const MAX_FRAME_MS: f64 = 100.0;
}

/// Euclidean distance between two screen-space points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Format whole seconds as `M:SS`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
