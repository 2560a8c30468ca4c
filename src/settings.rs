//! User preferences
//!
//! Persisted as JSON in LocalStorage, separately from the high scores.

use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;
use crate::highscores::ScoreStore;

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 2.0;
pub const ZOOM_STEP: f32 = 0.25;

/// Maze cell size for a viewport width, before zoom
pub fn base_cell_size(viewport_width: f32) -> f32 {
    if viewport_width < 480.0 {
        14.0
    } else if viewport_width < 768.0 {
        16.0
    } else if viewport_width < 1024.0 {
        20.0
    } else {
        22.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Maze zoom factor, in `ZOOM_STEP` increments
    pub maze_zoom: f32,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no flashing overlays)
    pub reduced_motion: bool,

    /// Fixed RNG seed for reproducible levels; random when unset
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            maze_zoom: 1.0,
            show_fps: false,
            reduced_motion: false,
            seed: None,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "arcade_hub_settings";

    /// Snap to the zoom grid and clamp into range
    pub fn set_zoom(&mut self, zoom: f32) {
        let snapped = (zoom / ZOOM_STEP).round() * ZOOM_STEP;
        self.maze_zoom = if snapped.is_finite() {
            snapped.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.maze_zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.maze_zoom - ZOOM_STEP);
    }

    /// Effective maze cell size for the current viewport
    pub fn maze_cell_size(&self, viewport_width: f32) -> f32 {
        base_cell_size(viewport_width) * self.maze_zoom
    }

    pub fn to_json(&self) -> Result<String, ArcadeError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ArcadeError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        // Stored values may predate the zoom grid
        settings.set_zoom(settings.maze_zoom);
        Ok(settings)
    }

    /// Load from a store, falling back to defaults on any problem
    pub fn load_from(store: &dyn ScoreStore) -> Self {
        match store.get_raw(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Discarding stored settings: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unavailable: {}", e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, store: &dyn ScoreStore) -> Result<(), ArcadeError> {
        store.set_raw(Self::STORAGE_KEY, &self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
