//! Deterministic simulation core
//!
//! Everything gameplay-related that does not touch the DOM lives here:
//! - Fixed-period ticks fed from frame deltas
//! - Seeded RNG only (`Pcg32`), so a seed replays a level exactly
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod input;
pub mod maze;
pub mod physics;
pub mod session;
pub mod trace;

pub use clock::{Countdown, Delay, FixedStep};
pub use collision::{Aabb, cell_at, cell_center, overlaps_forgiving};
pub use input::{Direction, InputEvent, InputMapper, InputProfile, Intent};
pub use maze::{CellKind, MAZE_COLS, MAZE_ROWS, Maze};
pub use physics::{Body, PhysicsParams, StepReport};
pub use session::{Game, GameStatus, Session, Step, Verdict};
pub use trace::{PathTracer, RESUME_TOLERANCE, TraceOutcome};
