//! The mini-games
//!
//! Each game is a set of [`Game`] hooks plus a [`Scene`]. The hub only sees
//! them through the object-safe [`Playable`] trait, which [`Session`]
//! implements for every [`MiniGame`].

pub mod flappy;
pub mod maze;
pub mod memory;
pub mod mines;
pub mod runner;

pub use flappy::Flappy;
pub use maze::MazeGame;
pub use memory::Memory;
pub use mines::Mines;
pub use runner::Runner;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::highscores::SharedStore;
use crate::renderer::{Scene, Surface};
use crate::sim::{Game, GameStatus, InputProfile, Intent, Session};

/// Every game the hub can mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    Mines,
    Flappy,
    Memory,
    Runner,
    Maze,
}

impl GameKind {
    /// Menu order
    pub const ALL: [GameKind; 5] = [
        GameKind::Mines,
        GameKind::Flappy,
        GameKind::Memory,
        GameKind::Runner,
        GameKind::Maze,
    ];

    pub fn title(self) -> &'static str {
        match self {
            GameKind::Mines => "Star Finder",
            GameKind::Flappy => "Flappy eGov",
            GameKind::Memory => "Memory Flip",
            GameKind::Runner => "Dino Runner",
            GameKind::Maze => "eGov Maze",
        }
    }

    /// Last path segment of the game's route
    pub fn slug(self) -> &'static str {
        match self {
            GameKind::Mines => "game-one",
            GameKind::Flappy => "game-two",
            GameKind::Memory => "memory-flip",
            GameKind::Runner => "dino-runner",
            GameKind::Maze => "egov-maze",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    pub fn high_score_key(self) -> Option<&'static str> {
        match self {
            GameKind::Mines => Mines::HIGH_SCORE_KEY,
            GameKind::Flappy => Flappy::HIGH_SCORE_KEY,
            GameKind::Memory => Memory::HIGH_SCORE_KEY,
            GameKind::Runner => Runner::HIGH_SCORE_KEY,
            GameKind::Maze => MazeGame::HIGH_SCORE_KEY,
        }
    }
}

/// A [`Game`] the hub can mount
pub trait MiniGame: Game + Scene {
    const KIND: GameKind;

    /// How raw input should be mapped for this game right now
    fn input_profile(&self) -> InputProfile;

    /// Logical play-field size in game units
    fn field_size(&self) -> Vec2;

    /// Whether the hub should scale the field to fit the screen
    fn scales_to_fit(&self) -> bool {
        true
    }

    /// Viewport or zoom change (only the maze cares)
    fn set_cell_size(&mut self, _cell_size: f32) {}
}

/// Type-erased session, as owned by the hub
pub trait Playable {
    fn kind(&self) -> GameKind;
    fn status(&self) -> GameStatus;
    fn score(&self) -> u64;
    fn best(&self) -> u64;
    fn budget(&self) -> u32;
    fn input_profile(&self) -> InputProfile;
    fn field_size(&self) -> Vec2;
    fn scales_to_fit(&self) -> bool;
    fn set_cell_size(&mut self, cell_size: f32);
    fn handle(&mut self, intent: Intent) -> Option<GameStatus>;
    fn advance(&mut self, elapsed_ms: f64) -> Option<GameStatus>;
    fn draw(&self, surface: &mut dyn Surface);
    fn teardown(&mut self);
}

impl<G: MiniGame> Playable for Session<G> {
    fn kind(&self) -> GameKind {
        G::KIND
    }

    fn status(&self) -> GameStatus {
        Session::status(self)
    }

    fn score(&self) -> u64 {
        Session::score(self)
    }

    fn best(&self) -> u64 {
        Session::best(self)
    }

    fn budget(&self) -> u32 {
        Session::budget(self)
    }

    fn input_profile(&self) -> InputProfile {
        self.game().input_profile()
    }

    fn field_size(&self) -> Vec2 {
        self.game().field_size()
    }

    fn scales_to_fit(&self) -> bool {
        self.game().scales_to_fit()
    }

    fn set_cell_size(&mut self, cell_size: f32) {
        self.game_mut().set_cell_size(cell_size);
    }

    fn handle(&mut self, intent: Intent) -> Option<GameStatus> {
        Session::handle(self, intent)
    }

    fn advance(&mut self, elapsed_ms: f64) -> Option<GameStatus> {
        Session::advance(self, elapsed_ms)
    }

    fn draw(&self, surface: &mut dyn Surface) {
        self.game().draw(surface);
    }

    fn teardown(&mut self) {
        Session::teardown(self);
    }
}

/// Build a fresh session for `kind`
pub fn launch(
    kind: GameKind,
    store: SharedStore,
    seed: u64,
    maze_cell_size: f32,
) -> Box<dyn Playable> {
    match kind {
        GameKind::Mines => Box::new(Session::new(Mines::new(), store, seed)),
        GameKind::Flappy => Box::new(Session::new(Flappy::new(), store, seed)),
        GameKind::Memory => Box::new(Session::new(Memory::new(), store, seed)),
        GameKind::Runner => Box::new(Session::new(Runner::new(), store, seed)),
        GameKind::Maze => Box::new(Session::new(MazeGame::new(maze_cell_size), store, seed)),
    }
}
