//! Input mapping
//!
//! Raw keyboard/pointer events come in from the platform layer; games only
//! ever see discrete `Intent`s. Anything that does not map (out-of-bounds
//! clicks, key repeats, unbound keys) becomes `None` and is dropped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Minimum spacing between two accepted jump intents
pub const JUMP_DEBOUNCE_MS: f64 = 300.0;

/// Platform-neutral input event
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// `key` uses DOM `KeyboardEvent.key` naming (" ", "ArrowUp", "Enter", ...)
    KeyDown { key: String, repeat: bool, time_ms: f64 },
    /// Coordinates are relative to the play surface's top-left corner
    PointerDown { pos: Vec2, time_ms: f64 },
    PointerMove { pos: Vec2, time_ms: f64 },
    PointerUp,
    PointerCancel,
}

/// Grid step direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row, col) delta
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Discrete player intent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    Start,
    Restart,
    TogglePause,
    Jump,
    Move(Direction),
    Select { row: usize, col: usize },
    /// Select whatever cell the keyboard cursor is on
    Activate,
    PenDown(Vec2),
    PenMove(Vec2),
    PenUp,
}

/// How a screen wants its raw input interpreted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputProfile {
    /// One-button action games (flappy, runner)
    Action,
    /// Click-a-tile games (mines, memory)
    Grid { rows: usize, cols: usize, cell_size: f32 },
    /// Freehand drawing (maze)
    Pen,
}

/// Stateful event -> intent normalizer
#[derive(Debug, Clone)]
pub struct InputMapper {
    profile: InputProfile,
    last_jump_ms: Option<f64>,
}

impl InputMapper {
    pub fn new(profile: InputProfile) -> Self {
        Self {
            profile,
            last_jump_ms: None,
        }
    }

    pub fn profile(&self) -> InputProfile {
        self.profile
    }

    /// Swap profile parameters (e.g. after a zoom change), keeping debounce state
    pub fn set_profile(&mut self, profile: InputProfile) {
        self.profile = profile;
    }

    pub fn map(&mut self, event: &InputEvent) -> Option<Intent> {
        if let InputEvent::KeyDown { key, repeat, .. } = event {
            if *repeat {
                return None;
            }
            match key.as_str() {
                "p" | "P" | "Escape" => return Some(Intent::TogglePause),
                "r" | "R" => return Some(Intent::Restart),
                _ => {}
            }
        }

        match self.profile {
            InputProfile::Action => self.map_action(event),
            InputProfile::Grid {
                rows,
                cols,
                cell_size,
            } => map_grid(event, rows, cols, cell_size),
            InputProfile::Pen => match event {
                InputEvent::PointerDown { pos, .. } => Some(Intent::PenDown(*pos)),
                InputEvent::PointerMove { pos, .. } => Some(Intent::PenMove(*pos)),
                InputEvent::PointerUp | InputEvent::PointerCancel => Some(Intent::PenUp),
                _ => None,
            },
        }
    }

    fn map_action(&mut self, event: &InputEvent) -> Option<Intent> {
        let time_ms = match event {
            InputEvent::KeyDown { key, time_ms, .. } => match key.as_str() {
                " " | "ArrowUp" | "w" | "W" => *time_ms,
                "Enter" => return Some(Intent::Start),
                _ => return None,
            },
            InputEvent::PointerDown { time_ms, .. } => *time_ms,
            _ => return None,
        };

        if let Some(last) = self.last_jump_ms {
            if time_ms - last <= JUMP_DEBOUNCE_MS {
                return None;
            }
        }
        self.last_jump_ms = Some(time_ms);
        Some(Intent::Jump)
    }
}

fn map_grid(event: &InputEvent, rows: usize, cols: usize, cell_size: f32) -> Option<Intent> {
    match event {
        InputEvent::PointerDown { pos, .. } => {
            let (row, col) = super::collision::cell_at(*pos, cell_size, rows, cols)?;
            Some(Intent::Select { row, col })
        }
        InputEvent::KeyDown { key, .. } => match key.as_str() {
            "Enter" | " " => Some(Intent::Activate),
            other => Direction::from_key(other).map(Intent::Move),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: &str, time_ms: f64) -> InputEvent {
        InputEvent::KeyDown {
            key: key.to_string(),
            repeat: false,
            time_ms,
        }
    }

    #[test]
    fn test_action_jump_debounce() {
        let mut mapper = InputMapper::new(InputProfile::Action);
        assert_eq!(mapper.map(&key(" ", 0.0)), Some(Intent::Jump));
        assert_eq!(mapper.map(&key(" ", 200.0)), None);
        assert_eq!(
            mapper.map(&InputEvent::PointerDown {
                pos: Vec2::ZERO,
                time_ms: 301.0
            }),
            Some(Intent::Jump)
        );
    }

    #[test]
    fn test_key_repeat_ignored() {
        let mut mapper = InputMapper::new(InputProfile::Action);
        let event = InputEvent::KeyDown {
            key: " ".to_string(),
            repeat: true,
            time_ms: 0.0,
        };
        assert_eq!(mapper.map(&event), None);
    }

    #[test]
    fn test_grid_select_and_out_of_bounds() {
        let mut mapper = InputMapper::new(InputProfile::Grid {
            rows: 5,
            cols: 5,
            cell_size: 10.0,
        });
        let inside = InputEvent::PointerDown {
            pos: Vec2::new(25.0, 13.0),
            time_ms: 0.0,
        };
        assert_eq!(mapper.map(&inside), Some(Intent::Select { row: 1, col: 2 }));

        let outside = InputEvent::PointerDown {
            pos: Vec2::new(55.0, 13.0),
            time_ms: 0.0,
        };
        assert_eq!(mapper.map(&outside), None);

        let negative = InputEvent::PointerDown {
            pos: Vec2::new(-1.0, 3.0),
            time_ms: 0.0,
        };
        assert_eq!(mapper.map(&negative), None);
    }

    #[test]
    fn test_grid_keyboard_cursor() {
        let mut mapper = InputMapper::new(InputProfile::Grid {
            rows: 4,
            cols: 5,
            cell_size: 10.0,
        });
        assert_eq!(
            mapper.map(&key("ArrowLeft", 0.0)),
            Some(Intent::Move(Direction::Left))
        );
        assert_eq!(mapper.map(&key("Enter", 0.0)), Some(Intent::Activate));
        assert_eq!(mapper.map(&key("x", 0.0)), None);
    }

    #[test]
    fn test_pen_events() {
        let mut mapper = InputMapper::new(InputProfile::Pen);
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(
            mapper.map(&InputEvent::PointerDown { pos: p, time_ms: 0.0 }),
            Some(Intent::PenDown(p))
        );
        assert_eq!(mapper.map(&InputEvent::PointerCancel), Some(Intent::PenUp));
    }

    #[test]
    fn test_commands_in_every_profile() {
        let mut mapper = InputMapper::new(InputProfile::Pen);
        assert_eq!(mapper.map(&key("Escape", 0.0)), Some(Intent::TogglePause));
        assert_eq!(mapper.map(&key("r", 0.0)), Some(Intent::Restart));
    }
}
