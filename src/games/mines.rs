//! Star Finder: a tiny minesweeper
//!
//! 5x5 tiles hide 3 mines. Every safe reveal earns a star, ten stars win,
//! one mine ends the run.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{GameKind, MiniGame};
use crate::renderer::{Scene, Surface, palette};
use crate::sim::{Direction, Game, InputProfile, Intent, Step, Verdict};

pub const GRID: usize = 5;
pub const MINE_COUNT: usize = 3;
pub const STARS_TO_WIN: u32 = 10;
/// Logical tile edge
pub const TILE: f32 = 80.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub mined: bool,
    pub revealed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mines {
    tiles: Vec<Tile>,
    cursor: (usize, usize),
    stars: u32,
}

impl Mines {
    pub fn new() -> Self {
        Self {
            tiles: vec![Tile::default(); GRID * GRID],
            cursor: (0, 0),
            stars: 0,
        }
    }

    pub fn tile(&self, row: usize, col: usize) -> Option<Tile> {
        (row < GRID && col < GRID).then(|| self.tiles[row * GRID + col])
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn stars(&self) -> u32 {
        self.stars
    }

    /// Positions of every mine, row-major
    pub fn mines(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.mined)
            .map(|(i, _)| (i / GRID, i % GRID))
    }

    fn reveal(&mut self, row: usize, col: usize) -> Step {
        if row >= GRID || col >= GRID {
            return Step::none();
        }
        let tile = &mut self.tiles[row * GRID + col];
        if tile.revealed {
            return Step::none();
        }
        tile.revealed = true;
        let mined = tile.mined;
        self.cursor = (row, col);

        if mined {
            log::debug!("Mine at ({}, {})", row, col);
            return Step::spend(1);
        }
        self.stars += 1;
        let step = Step::scored(1);
        if self.stars >= STARS_TO_WIN {
            step.with_verdict(Verdict::Won)
        } else {
            step
        }
    }

    fn move_cursor(&mut self, dir: Direction) {
        let (dr, dc) = dir.delta();
        let clamp = |v: usize, d: i32| (v as i32 + d).clamp(0, GRID as i32 - 1) as usize;
        self.cursor = (clamp(self.cursor.0, dr), clamp(self.cursor.1, dc));
    }
}

impl Default for Mines {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Mines {
    const NAME: &'static str = "Star Finder";
    const HIGH_SCORE_KEY: Option<&'static str> = Some("minesweeperHighScore");

    fn tick_interval_ms(&self) -> Option<f64> {
        None
    }

    fn reset(&mut self, rng: &mut Pcg32) {
        self.tiles.fill(Tile::default());
        self.cursor = (0, 0);
        self.stars = 0;

        let mut placed = 0;
        while placed < MINE_COUNT {
            let idx = rng.random_range(0..GRID * GRID);
            if !self.tiles[idx].mined {
                self.tiles[idx].mined = true;
                placed += 1;
            }
        }
    }

    fn on_intent(&mut self, intent: Intent, _rng: &mut Pcg32) -> Step {
        match intent {
            Intent::Select { row, col } => self.reveal(row, col),
            Intent::Activate => {
                let (row, col) = self.cursor;
                self.reveal(row, col)
            }
            Intent::Move(dir) => {
                self.move_cursor(dir);
                Step::none()
            }
            _ => Step::none(),
        }
    }

    fn on_terminal(&mut self, verdict: Verdict) {
        if verdict == Verdict::Lost {
            for tile in self.tiles.iter_mut().filter(|t| t.mined) {
                tile.revealed = true;
            }
        }
    }
}

impl MiniGame for Mines {
    const KIND: GameKind = GameKind::Mines;

    fn input_profile(&self) -> InputProfile {
        InputProfile::Grid {
            rows: GRID,
            cols: GRID,
            cell_size: TILE,
        }
    }

    fn field_size(&self) -> Vec2 {
        Vec2::splat(GRID as f32 * TILE)
    }
}

impl Scene for Mines {
    fn draw(&self, surface: &mut dyn Surface) {
        let inset = Vec2::splat(4.0);
        for (i, tile) in self.tiles.iter().enumerate() {
            let (row, col) = (i / GRID, i % GRID);
            let min = Vec2::new(col as f32, row as f32) * TILE;
            let color = match (tile.revealed, tile.mined) {
                (false, _) => palette::PANEL,
                (true, false) => palette::FLOOR,
                (true, true) => palette::BAD,
            };
            surface.fill_rect(min + inset, Vec2::splat(TILE) - inset * 2.0, color);

            if tile.revealed && !tile.mined {
                surface.fill_circle(min + Vec2::splat(TILE / 2.0), TILE * 0.2, palette::GOLD);
            }
            if self.cursor == (row, col) {
                surface.stroke_rect(min + inset, Vec2::splat(TILE) - inset * 2.0, palette::ACCENT, 3.0);
            }
        }
        surface.text(
            Vec2::new(0.0, GRID as f32 * TILE + 24.0),
            &format!("Stars {}/{}", self.stars, STARS_TO_WIN),
            18.0,
            palette::TEXT,
        );
    }
}
