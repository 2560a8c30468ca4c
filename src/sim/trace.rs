//! Freehand path validation for the maze
//!
//! The player drags a pen from the start cell to the end cell. Every sampled
//! pointer position is mapped to a grid cell; touching a wall fails the
//! attempt and reaching the end wins it. Lifting the pen pauses the stroke,
//! and the next press only resumes it when it lands close to where the pen
//! was lifted. This samples positions rather than intersecting segments, so
//! a very fast drag can hop over a wall corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::cell_at;
use super::maze::{CellKind, Maze};
use crate::distance;

/// Resume radius as a fraction of the current cell size
pub const RESUME_TOLERANCE: f32 = 0.85;

/// Result of feeding one pen event to the tracer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOutcome {
    /// Nothing changed (off grid, not drawing, same cell, press elsewhere)
    Ignored,
    /// A fresh attempt began on the start cell
    Started,
    /// The pen went down again near the last point
    Resumed,
    /// The stroke moved into a new open cell
    Extended,
    /// A press too far from the stroke discarded the attempt
    Abandoned,
    HitWall,
    ReachedEnd,
}

/// Stroke state for one maze
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathTracer {
    cell_size: f32,
    started: bool,
    drawing: bool,
    last_point: Option<Vec2>,
    last_cell: Option<(usize, usize)>,
    /// Sampled points since the attempt began
    path: Vec<Vec2>,
}

impl PathTracer {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            started: false,
            drawing: false,
            last_point: None,
            last_cell: None,
            path: Vec::new(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Zoom/resize. Old screen-space points no longer line up, so the
    /// resume anchor is dropped.
    pub fn set_cell_size(&mut self, cell_size: f32) {
        if (cell_size - self.cell_size).abs() > f32::EPSILON {
            self.cell_size = cell_size;
            self.last_point = None;
            self.path.clear();
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn last_point(&self) -> Option<Vec2> {
        self.last_point
    }

    pub fn path(&self) -> &[Vec2] {
        &self.path
    }

    fn locate(&self, maze: &Maze, p: Vec2) -> Option<(usize, usize, CellKind)> {
        let (row, col) = cell_at(p, self.cell_size, maze.rows(), maze.cols())?;
        maze.get(row, col).map(|kind| (row, col, kind))
    }

    pub fn pen_down(&mut self, maze: &Maze, p: Vec2) -> TraceOutcome {
        let Some((row, col, kind)) = self.locate(maze, p) else {
            return TraceOutcome::Ignored;
        };

        if self.started {
            let near = self
                .last_point
                .is_some_and(|last| distance(p, last) < RESUME_TOLERANCE * self.cell_size);
            if near {
                self.drawing = true;
                return self.sample(row, col, kind, p, TraceOutcome::Resumed);
            }
            // The pencil jumped: this attempt is over
            log::debug!("Pen jumped to ({}, {}), discarding stroke", row, col);
            self.abandon();
            if kind != CellKind::Start {
                return TraceOutcome::Abandoned;
            }
        }

        if kind != CellKind::Start {
            return TraceOutcome::Ignored;
        }
        self.started = true;
        self.drawing = true;
        self.path.clear();
        self.path.push(p);
        self.last_point = Some(p);
        self.last_cell = Some((row, col));
        TraceOutcome::Started
    }

    pub fn pen_move(&mut self, maze: &Maze, p: Vec2) -> TraceOutcome {
        if !self.drawing {
            return TraceOutcome::Ignored;
        }
        let Some((row, col, kind)) = self.locate(maze, p) else {
            return TraceOutcome::Ignored;
        };
        if self.last_cell == Some((row, col)) {
            return TraceOutcome::Ignored;
        }
        self.sample(row, col, kind, p, TraceOutcome::Extended)
    }

    /// Lift the pen; the stroke is kept so it can be resumed
    pub fn pen_up(&mut self) {
        self.drawing = false;
    }

    fn sample(
        &mut self,
        row: usize,
        col: usize,
        kind: CellKind,
        p: Vec2,
        otherwise: TraceOutcome,
    ) -> TraceOutcome {
        self.last_cell = Some((row, col));
        self.last_point = Some(p);
        self.path.push(p);

        match kind {
            CellKind::Wall => {
                self.drawing = false;
                TraceOutcome::HitWall
            }
            CellKind::End => {
                self.drawing = false;
                TraceOutcome::ReachedEnd
            }
            CellKind::Path | CellKind::Start => otherwise,
        }
    }

    fn abandon(&mut self) {
        self.started = false;
        self.drawing = false;
        self.last_point = None;
        self.last_cell = None;
        self.path.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::cell_center;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::collections::VecDeque;

    const CELL: f32 = 20.0;

    fn maze() -> Maze {
        let mut rng = Pcg32::seed_from_u64(2024);
        Maze::generate(21, 31, &mut rng)
    }

    /// Cells along the unique passage from start to end
    fn solution(maze: &Maze) -> Vec<(usize, usize)> {
        let mut prev = vec![None; maze.rows() * maze.cols()];
        let mut queue = VecDeque::from([maze.start()]);
        let idx = |(r, c): (usize, usize)| r * maze.cols() + c;
        prev[idx(maze.start())] = Some(maze.start());
        while let Some(cell) = queue.pop_front() {
            if cell == maze.end() {
                break;
            }
            for n in maze.open_neighbors(cell.0, cell.1) {
                if prev[idx(n)].is_none() {
                    prev[idx(n)] = Some(cell);
                    queue.push_back(n);
                }
            }
        }
        let mut route = vec![maze.end()];
        let mut cur = maze.end();
        while cur != maze.start() {
            cur = prev[idx(cur)].unwrap();
            route.push(cur);
        }
        route.reverse();
        route
    }

    fn center(cell: (usize, usize)) -> Vec2 {
        cell_center(cell.0, cell.1, CELL)
    }

    #[test]
    fn test_press_off_start_is_ignored() {
        let m = maze();
        let mut t = PathTracer::new(CELL);
        let other = solution(&m)[1];
        assert_eq!(t.pen_down(&m, center(other)), TraceOutcome::Ignored);
        assert!(!t.is_started());
        assert_eq!(t.pen_down(&m, Vec2::new(-5.0, 5.0)), TraceOutcome::Ignored);
    }

    #[test]
    fn test_walk_solution_reaches_end() {
        let m = maze();
        let route = solution(&m);
        let mut t = PathTracer::new(CELL);
        assert_eq!(t.pen_down(&m, center(route[0])), TraceOutcome::Started);

        let mut last = TraceOutcome::Started;
        for &cell in &route[1..] {
            last = t.pen_move(&m, center(cell));
            assert_ne!(last, TraceOutcome::HitWall);
        }
        assert_eq!(last, TraceOutcome::ReachedEnd);
        assert!(!t.is_drawing());
    }

    #[test]
    fn test_wall_fails_immediately() {
        let m = maze();
        let mut t = PathTracer::new(CELL);
        t.pen_down(&m, center(m.start()));
        // (0, 1) is border wall right above the start
        assert_eq!(t.pen_move(&m, center((0, 1))), TraceOutcome::HitWall);
        assert_eq!(t.pen_move(&m, center(m.start())), TraceOutcome::Ignored);
    }

    #[test]
    fn test_same_cell_samples_skipped() {
        let m = maze();
        let mut t = PathTracer::new(CELL);
        t.pen_down(&m, center(m.start()));
        let nudge = center(m.start()) + Vec2::new(3.0, 2.0);
        assert_eq!(t.pen_move(&m, nudge), TraceOutcome::Ignored);
        assert_eq!(t.path().len(), 1);
    }

    #[test]
    fn test_resume_tolerance() {
        let m = maze();
        let route = solution(&m);
        let mut t = PathTracer::new(CELL);
        t.pen_down(&m, center(route[0]));
        t.pen_move(&m, center(route[1]));
        t.pen_up();
        let anchor = t.last_point().unwrap();

        // Step toward the cell we came from so the press stays on open ground
        let back = (center(route[0]) - anchor).normalize();

        let mut near = t.clone();
        assert_eq!(
            near.pen_down(&m, anchor + back * (0.84 * CELL)),
            TraceOutcome::Resumed
        );
        assert!(near.is_drawing());

        let mut far = t.clone();
        let outcome = far.pen_down(&m, anchor + back * (0.90 * CELL));
        // Landing on start again just opens a fresh attempt
        assert!(matches!(
            outcome,
            TraceOutcome::Started | TraceOutcome::Abandoned
        ));
        assert!(far.path().len() <= 1);
    }

    #[test]
    fn test_far_press_on_start_begins_new_attempt() {
        let m = maze();
        let route = solution(&m);
        let mut t = PathTracer::new(CELL);
        t.pen_down(&m, center(route[0]));
        for &cell in &route[1..4] {
            t.pen_move(&m, center(cell));
        }
        t.pen_up();
        assert_eq!(t.pen_down(&m, center(route[0])), TraceOutcome::Started);
        assert_eq!(t.path().len(), 1);
    }

    #[test]
    fn test_resize_drops_anchor() {
        let m = maze();
        let mut t = PathTracer::new(CELL);
        t.pen_down(&m, center(m.start()));
        t.pen_up();
        t.set_cell_size(CELL * 1.25);
        assert_eq!(t.last_point(), None);
        // Can't resume without an anchor; a press on start restarts
        let start = cell_center(1, 1, CELL * 1.25);
        assert_eq!(t.pen_down(&m, start), TraceOutcome::Started);
    }
}
