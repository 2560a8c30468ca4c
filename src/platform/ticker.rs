//! Tick ownership
//!
//! A mounted screen owns a [`TickHandle`]; anything that schedules callbacks
//! on its behalf (animation frames, timers) holds the matching [`TickToken`]
//! and checks it before touching game state. Cancelling or dropping the
//! handle kills every token at once, so a late callback after unmount is a
//! no-op instead of a write into a torn-down session.

use std::cell::Cell;
use std::rc::Rc;

/// Owning side; cancels on drop
#[derive(Debug)]
pub struct TickHandle {
    live: Rc<Cell<bool>>,
    generation: u64,
}

/// Observing side, cheap to clone into callbacks
#[derive(Debug, Clone)]
pub struct TickToken {
    live: Rc<Cell<bool>>,
    generation: u64,
}

/// Create a live handle and its first token
pub fn tick_pair(generation: u64) -> (TickHandle, TickToken) {
    let live = Rc::new(Cell::new(true));
    let token = TickToken {
        live: live.clone(),
        generation,
    };
    (TickHandle { live, generation }, token)
}

impl TickHandle {
    pub fn token(&self) -> TickToken {
        TickToken {
            live: self.live.clone(),
            generation: self.generation,
        }
    }

    /// Stop every callback holding a token. Idempotent.
    pub fn cancel(&self) {
        if self.live.replace(false) {
            log::debug!("Tick source {} cancelled", self.generation);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        !self.live.get()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl TickToken {
    #[inline]
    pub fn is_live(&self) -> bool {
        self.live.get()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run `f` only while the owning handle is alive
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> Option<R> {
        self.is_live().then(f)
    }
}
