//! eGov Maze
//!
//! Draw a line from the start square to the finish without touching a wall.
//! A new maze is carved on every restart.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{GameKind, MiniGame};
use crate::renderer::{Scene, Surface, palette};
use crate::sim::{
    CellKind, Game, InputProfile, Intent, MAZE_COLS, MAZE_ROWS, Maze, PathTracer, Step,
    TraceOutcome,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MazeGame {
    rows: usize,
    cols: usize,
    maze: Option<Maze>,
    tracer: PathTracer,
}

impl MazeGame {
    pub fn new(cell_size: f32) -> Self {
        Self::with_size(MAZE_ROWS, MAZE_COLS, cell_size)
    }

    pub fn with_size(rows: usize, cols: usize, cell_size: f32) -> Self {
        Self {
            rows,
            cols,
            maze: None,
            tracer: PathTracer::new(cell_size),
        }
    }

    /// The current maze (generated on the first reset)
    pub fn maze(&self) -> Option<&Maze> {
        self.maze.as_ref()
    }

    pub fn tracer(&self) -> &PathTracer {
        &self.tracer
    }

    pub fn cell_size(&self) -> f32 {
        self.tracer.cell_size()
    }

    fn trace(&mut self, intent: Intent) -> Step {
        let Some(maze) = self.maze.as_ref() else {
            return Step::none();
        };
        let outcome = match intent {
            Intent::PenDown(p) => self.tracer.pen_down(maze, p),
            Intent::PenMove(p) => self.tracer.pen_move(maze, p),
            Intent::PenUp => {
                self.tracer.pen_up();
                TraceOutcome::Ignored
            }
            _ => TraceOutcome::Ignored,
        };
        match outcome {
            TraceOutcome::HitWall => Step::lost(),
            TraceOutcome::ReachedEnd => Step::won(),
            _ => Step::none(),
        }
    }
}

impl Game for MazeGame {
    const NAME: &'static str = "eGov Maze";
    const HIGH_SCORE_KEY: Option<&'static str> = None;

    fn tick_interval_ms(&self) -> Option<f64> {
        None
    }

    fn reset(&mut self, rng: &mut Pcg32) {
        self.maze = Some(Maze::generate(self.rows, self.cols, rng));
        self.tracer = PathTracer::new(self.tracer.cell_size());
    }

    fn on_intent(&mut self, intent: Intent, _rng: &mut Pcg32) -> Step {
        self.trace(intent)
    }
}

impl MiniGame for MazeGame {
    const KIND: GameKind = GameKind::Maze;

    fn input_profile(&self) -> InputProfile {
        InputProfile::Pen
    }

    fn field_size(&self) -> Vec2 {
        let (rows, cols) = self
            .maze
            .as_ref()
            .map_or((self.rows, self.cols), |m| (m.rows(), m.cols()));
        Vec2::new(cols as f32, rows as f32) * self.cell_size()
    }

    fn scales_to_fit(&self) -> bool {
        false
    }

    fn set_cell_size(&mut self, cell_size: f32) {
        self.tracer.set_cell_size(cell_size);
    }
}

impl Scene for MazeGame {
    fn draw(&self, surface: &mut dyn Surface) {
        let Some(maze) = self.maze.as_ref() else {
            return;
        };
        let cell = self.cell_size();
        for (row, col, kind) in maze.cells() {
            let color = match kind {
                CellKind::Wall => palette::WALL,
                CellKind::Path => palette::FLOOR,
                CellKind::Start => palette::GOOD,
                CellKind::End => palette::GOLD,
            };
            surface.fill_rect(
                Vec2::new(col as f32, row as f32) * cell,
                Vec2::splat(cell),
                color,
            );
        }
        for pair in self.tracer.path().windows(2) {
            surface.line(pair[0], pair[1], palette::BAD, (cell * 0.3).max(2.0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{MemoryStore, ScoreStore};
    use crate::sim::{GameStatus, Session, cell_center};
    use std::collections::VecDeque;

    const CELL: f32 = 16.0;

    fn session(seed: u64) -> Session<MazeGame> {
        Session::new(MazeGame::new(CELL), MemoryStore::shared(), seed)
    }

    fn route(maze: &Maze) -> Vec<(usize, usize)> {
        let idx = |(r, c): (usize, usize)| r * maze.cols() + c;
        let mut prev = vec![None; maze.rows() * maze.cols()];
        prev[idx(maze.start())] = Some(maze.start());
        let mut queue = VecDeque::from([maze.start()]);
        while let Some(cell) = queue.pop_front() {
            for n in maze.open_neighbors(cell.0, cell.1) {
                if prev[idx(n)].is_none() {
                    prev[idx(n)] = Some(cell);
                    queue.push_back(n);
                }
            }
        }
        let mut out = vec![maze.end()];
        while *out.last().unwrap() != maze.start() {
            out.push(prev[idx(*out.last().unwrap())].unwrap());
        }
        out.reverse();
        out
    }

    #[test]
    fn test_traced_solution_wins() {
        let mut s = session(31);
        let path = route(s.game().maze().unwrap());
        let point = |(r, c): (usize, usize)| cell_center(r, c, CELL);

        s.handle(Intent::PenDown(point(path[0])));
        for &cell in &path[1..] {
            s.handle(Intent::PenMove(point(cell)));
        }
        assert_eq!(s.status(), GameStatus::Won);
    }

    #[test]
    fn test_second_cell_wall_loses() {
        let mut s = session(31);
        let start = s.game().maze().unwrap().start();
        s.handle(Intent::PenDown(cell_center(start.0, start.1, CELL)));
        s.handle(Intent::PenMove(cell_center(start.0, start.1 - 1, CELL)));
        assert_eq!(s.status(), GameStatus::Lost);
    }

    #[test]
    fn test_lifted_pen_resumes_nearby() {
        let mut s = session(8);
        let path = route(s.game().maze().unwrap());
        let point = |(r, c): (usize, usize)| cell_center(r, c, CELL);

        s.handle(Intent::PenDown(point(path[0])));
        s.handle(Intent::PenMove(point(path[1])));
        s.handle(Intent::PenUp);
        assert!(!s.game().tracer().is_drawing());

        s.handle(Intent::PenDown(point(path[1]) + Vec2::new(1.0, 1.0)));
        assert!(s.game().tracer().is_drawing());
        for &cell in &path[2..] {
            s.handle(Intent::PenMove(point(cell)));
        }
        assert_eq!(s.status(), GameStatus::Won);
    }

    #[test]
    fn test_restart_carves_a_new_maze() {
        let mut s = session(5);
        let first = s.game().maze().unwrap().to_ascii();
        s.handle(Intent::Restart);
        assert_eq!(s.status(), GameStatus::Playing);
        assert_ne!(s.game().maze().unwrap().to_ascii(), first);
    }

    #[test]
    fn test_zoom_changes_field() {
        let mut game = MazeGame::new(CELL);
        assert_eq!(game.field_size(), Vec2::new(31.0 * CELL, 21.0 * CELL));
        game.set_cell_size(CELL * 2.0);
        assert_eq!(game.field_size(), Vec2::new(62.0 * CELL, 42.0 * CELL));
    }

    #[test]
    fn test_no_score_key_written() {
        let store = MemoryStore::shared();
        let mut s = Session::new(MazeGame::new(CELL), store.clone(), 1);
        s.teardown();
        assert_eq!(store.get_raw("egovMazeHighScore").unwrap(), None);
    }
}
