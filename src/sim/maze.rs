//! Perfect-maze generation
//!
//! Randomized depth-first carving on an odd-by-odd grid that starts as solid
//! wall. The carve walks two cells at a time and opens the wall between, so
//! passages form a tree: every open cell is reachable from the start by
//! exactly one simple path.
//!
//! The end cell is the open cell furthest from the start by Manhattan
//! distance. That approximates, but does not guarantee, the cell furthest
//! along the passage graph.

use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Default maze dimensions (both odd)
pub const MAZE_ROWS: usize = 21;
pub const MAZE_COLS: usize = 31;

/// Smallest grid that still has two distinct interior cells to link
const MIN_DIM: usize = 5;

/// Fixed carve origin, near the top-left corner
pub const MAZE_START: (usize, usize) = (1, 1);

const STEPS: [(isize, isize); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Wall,
    Path,
    Start,
    End,
}

impl CellKind {
    #[inline]
    pub fn is_open(self) -> bool {
        self != CellKind::Wall
    }
}

/// A generated maze grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maze {
    rows: usize,
    cols: usize,
    cells: Vec<CellKind>,
    start: (usize, usize),
    end: (usize, usize),
}

/// One pending carve position on the explicit stack
struct Frame {
    row: usize,
    col: usize,
    order: [(isize, isize); 4],
    next: usize,
}

impl Maze {
    /// Generate a maze. Even or too-small dimensions are bumped up to the
    /// next usable odd size.
    pub fn generate(rows: usize, cols: usize, rng: &mut Pcg32) -> Self {
        let rows = odd_at_least(rows);
        let cols = odd_at_least(cols);

        let mut maze = Self {
            rows,
            cols,
            cells: vec![CellKind::Wall; rows * cols],
            start: MAZE_START,
            end: MAZE_START,
        };
        maze.carve_from(MAZE_START, rng);
        maze.end = maze.farthest_open_from(MAZE_START);

        maze.set(maze.start, CellKind::Start);
        maze.set(maze.end, CellKind::End);
        log::debug!(
            "Generated {}x{} maze, end at {:?}",
            rows,
            cols,
            maze.end
        );
        maze
    }

    fn carve_from(&mut self, origin: (usize, usize), rng: &mut Pcg32) {
        let mut stack = vec![self.open_frame(origin, rng)];

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.order.len() {
                stack.pop();
                continue;
            }
            let (dr, dc) = frame.order[frame.next];
            frame.next += 1;
            let (row, col) = (frame.row, frame.col);

            let (Some(nr), Some(nc)) = (row.checked_add_signed(dr), col.checked_add_signed(dc))
            else {
                continue;
            };
            if !self.is_interior(nr, nc) || self.cells[self.index(nr, nc)] != CellKind::Wall {
                continue;
            }

            let between = (
                row.wrapping_add_signed(dr / 2),
                col.wrapping_add_signed(dc / 2),
            );
            self.set(between, CellKind::Path);
            let next = self.open_frame((nr, nc), rng);
            stack.push(next);
        }
    }

    /// Mark a cell as carved and draw its random neighbor order
    fn open_frame(&mut self, (row, col): (usize, usize), rng: &mut Pcg32) -> Frame {
        self.set((row, col), CellKind::Path);
        let mut order = STEPS;
        order.shuffle(rng);
        Frame {
            row,
            col,
            order,
            next: 0,
        }
    }

    fn farthest_open_from(&self, (sr, sc): (usize, usize)) -> (usize, usize) {
        let mut best = (sr, sc);
        let mut best_dist = 0;
        for row in 0..self.rows {
            for col in 0..self.cols {
                if self.cells[self.index(row, col)] != CellKind::Path {
                    continue;
                }
                let dist = row.abs_diff(sr) + col.abs_diff(sc);
                if dist > best_dist {
                    best_dist = dist;
                    best = (row, col);
                }
            }
        }
        best
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    fn is_interior(&self, row: usize, col: usize) -> bool {
        row > 0 && row < self.rows - 1 && col > 0 && col < self.cols - 1
    }

    fn set(&mut self, (row, col): (usize, usize), kind: CellKind) {
        let idx = self.index(row, col);
        self.cells[idx] = kind;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn start(&self) -> (usize, usize) {
        self.start
    }

    pub fn end(&self) -> (usize, usize) {
        self.end
    }

    /// Cell at (row, col); `None` off the grid
    pub fn get(&self, row: usize, col: usize) -> Option<CellKind> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        Some(self.cells[self.index(row, col)])
    }

    /// Open orthogonal neighbors of a cell
    pub fn open_neighbors(&self, row: usize, col: usize) -> Vec<(usize, usize)> {
        [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)]
            .iter()
            .filter_map(|&(dr, dc)| {
                let r = row.checked_add_signed(dr)?;
                let c = col.checked_add_signed(dc)?;
                self.get(r, c).filter(|k| k.is_open()).map(|_| (r, c))
            })
            .collect()
    }

    /// Row-major iterator over `(row, col, kind)`
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, CellKind)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &kind)| (i / self.cols, i % self.cols, kind))
    }

    /// Text rendering (`#` wall, `.` path, `S` start, `E` end)
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in 0..self.rows {
            for col in 0..self.cols {
                out.push(match self.cells[self.index(row, col)] {
                    CellKind::Wall => '#',
                    CellKind::Path => '.',
                    CellKind::Start => 'S',
                    CellKind::End => 'E',
                });
            }
            out.push('\n');
        }
        out
    }
}

fn odd_at_least(n: usize) -> usize {
    let n = n.max(MIN_DIM);
    if n % 2 == 0 { n + 1 } else { n }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    fn maze(seed: u64) -> Maze {
        let mut rng = Pcg32::seed_from_u64(seed);
        Maze::generate(MAZE_ROWS, MAZE_COLS, &mut rng)
    }

    /// BFS over open cells; returns how many were reached
    fn reachable_from(maze: &Maze, origin: (usize, usize)) -> usize {
        let mut seen = vec![false; maze.rows() * maze.cols()];
        let mut queue = VecDeque::from([origin]);
        seen[origin.0 * maze.cols() + origin.1] = true;
        let mut count = 0;
        while let Some((r, c)) = queue.pop_front() {
            count += 1;
            for (nr, nc) in maze.open_neighbors(r, c) {
                let i = nr * maze.cols() + nc;
                if !seen[i] {
                    seen[i] = true;
                    queue.push_back((nr, nc));
                }
            }
        }
        count
    }

    #[test]
    fn test_default_maze_shape() {
        let m = maze(1);
        assert_eq!((m.rows(), m.cols()), (21, 31));
        assert_eq!(m.start(), (1, 1));
        assert_eq!(m.get(1, 1), Some(CellKind::Start));
        let (er, ec) = m.end();
        assert_eq!(m.get(er, ec), Some(CellKind::End));
        assert_ne!(m.start(), m.end());
    }

    #[test]
    fn test_even_dimensions_rounded_up() {
        let mut rng = Pcg32::seed_from_u64(3);
        let m = Maze::generate(10, 2, &mut rng);
        assert_eq!((m.rows(), m.cols()), (11, 5));
    }

    #[test]
    fn test_same_seed_same_maze() {
        assert_eq!(maze(42).to_ascii(), maze(42).to_ascii());
    }

    #[test]
    fn test_end_is_manhattan_farthest() {
        let m = maze(9);
        let (er, ec) = m.end();
        let end_dist = (er - 1) + (ec - 1);
        for (r, c, kind) in m.cells() {
            if kind.is_open() {
                assert!((r - 1) + (c - 1) <= end_dist);
            }
        }
    }

    #[test]
    fn test_every_odd_interior_cell_is_carved() {
        let m = maze(5);
        for r in (1..m.rows()).step_by(2) {
            for c in (1..m.cols()).step_by(2) {
                assert!(m.get(r, c).unwrap().is_open(), "({r},{c}) not carved");
            }
        }
    }

    proptest! {
        #[test]
        fn prop_odd_dims_and_wall_border(seed in any::<u64>(), rows in 5usize..40, cols in 5usize..40) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let m = Maze::generate(rows, cols, &mut rng);
            prop_assert_eq!(m.rows() % 2, 1);
            prop_assert_eq!(m.cols() % 2, 1);
            for (r, c, kind) in m.cells() {
                if r == 0 || c == 0 || r == m.rows() - 1 || c == m.cols() - 1 {
                    prop_assert_eq!(kind, CellKind::Wall);
                }
            }
        }

        #[test]
        fn prop_perfect_maze(seed in any::<u64>()) {
            let m = maze(seed);
            let open: Vec<_> = m.cells().filter(|(_, _, k)| k.is_open()).collect();
            let starts = open.iter().filter(|(_, _, k)| *k == CellKind::Start).count();
            let ends = open.iter().filter(|(_, _, k)| *k == CellKind::End).count();
            prop_assert_eq!(starts, 1);
            prop_assert_eq!(ends, 1);

            // Connected: every open cell (end included) reachable from start
            prop_assert_eq!(reachable_from(&m, m.start()), open.len());

            // Acyclic: a connected graph with V-1 edges is a tree
            let edges: usize = open
                .iter()
                .map(|&(r, c, _)| m.open_neighbors(r, c).len())
                .sum::<usize>()
                / 2;
            prop_assert_eq!(edges, open.len() - 1);
        }
    }
}
