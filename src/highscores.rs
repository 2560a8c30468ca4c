//! Per-game best scores
//!
//! Each game owns one integer under `"<gameName>HighScore"` in a key-value
//! store. The store is an injected capability: LocalStorage in the browser,
//! an in-memory map in tests and on native.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::ArcadeError;

/// String key-value storage holding decimal integers
pub trait ScoreStore {
    /// Raw stored value, if any
    fn get_raw(&self, key: &str) -> Result<Option<String>, ArcadeError>;
    fn set_raw(&self, key: &str, value: &str) -> Result<(), ArcadeError>;

    /// Read an integer score; unparsable values count as absent
    fn read(&self, key: &str) -> Result<Option<u64>, ArcadeError> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(None);
        };
        match raw.trim().parse::<u64>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                log::warn!("Ignoring malformed score {:?} under {}", raw, key);
                Ok(None)
            }
        }
    }

    fn write(&self, key: &str, value: u64) -> Result<(), ArcadeError> {
        self.set_raw(key, &value.to_string())
    }
}

/// Store handle shared by every session in the hub
pub type SharedStore = Rc<dyn ScoreStore>;

/// In-memory store (native builds and tests)
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }
}

impl ScoreStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, ArcadeError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> Result<(), ArcadeError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Best score for one game, read once at session creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighScore {
    key: &'static str,
    best: u64,
}

impl HighScore {
    /// Load the stored best, treating storage failures as "no score yet"
    pub fn load(store: &dyn ScoreStore, key: &'static str) -> Self {
        let best = match store.read(key) {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                log::warn!("Could not read {}: {}", key, e);
                0
            }
        };
        Self { key, best }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Persist `score` if it beats the current best.
    ///
    /// Returns true when a new best was recorded.
    pub fn record(&mut self, store: &dyn ScoreStore, score: u64) -> Result<bool, ArcadeError> {
        if score <= self.best {
            return Ok(false);
        }
        store.write(self.key, score)?;
        log::info!("New best for {}: {} (was {})", self.key, score, self.best);
        self.best = score;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.read("flappyBirdHighScore").unwrap(), None);
        store.write("flappyBirdHighScore", 12).unwrap();
        assert_eq!(store.read("flappyBirdHighScore").unwrap(), Some(12));
    }

    #[test]
    fn test_malformed_value_is_absent() {
        let store = MemoryStore::new();
        store.set_raw("minesweeperHighScore", "NaN").unwrap();
        assert_eq!(store.read("minesweeperHighScore").unwrap(), None);
        assert_eq!(HighScore::load(&store, "minesweeperHighScore").best(), 0);
    }

    #[test]
    fn test_record_only_when_beaten() {
        let store = MemoryStore::new();
        store.write("dinorunnerHighScore", 10).unwrap();
        let mut high = HighScore::load(&store, "dinorunnerHighScore");
        assert_eq!(high.best(), 10);

        assert!(!high.record(&store, 5).unwrap());
        assert!(!high.record(&store, 10).unwrap());
        assert_eq!(store.read("dinorunnerHighScore").unwrap(), Some(10));

        assert!(high.record(&store, 15).unwrap());
        assert_eq!(store.read("dinorunnerHighScore").unwrap(), Some(15));
        assert_eq!(high.best(), 15);
    }

    #[test]
    fn test_keys_are_independent() {
        let store = MemoryStore::new();
        store.write("minesweeperHighScore", 3).unwrap();
        assert_eq!(store.read("flappyBirdHighScore").unwrap(), None);
    }
}
