//! Memory Flip
//!
//! Twenty face-down cards hide ten pairs. Flip two at a time; a matching pair
//! stays up, a mismatch turns back over. Clear the board before the 40 second
//! clock runs out.

use glam::Vec2;
use rand::seq::{IndexedRandom, SliceRandom};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{GameKind, MiniGame};
use crate::renderer::{Scene, Surface, palette};
use crate::sim::{Countdown, Delay, Direction, Game, InputProfile, Intent, Step, Verdict};

pub const ROWS: usize = 4;
pub const COLS: usize = 5;
pub const PAIRS: usize = ROWS * COLS / 2;
pub const TIME_BUDGET_SECS: u32 = 40;
pub const MATCH_DELAY_MS: f64 = 500.0;
pub const MISMATCH_DELAY_MS: f64 = 800.0;
pub const TICK_MS: f64 = 100.0;
/// Logical card edge
pub const CARD: f32 = 100.0;

/// Card faces to draw pairs from
pub const CATALOGUE: [&str; 23] = [
    "eBPLS",
    "eCommerce",
    "eGOV",
    "eGovAI",
    "eGovChain",
    "eGovDocs",
    "eGovPay",
    "eHealth",
    "eInvest",
    "eKYC",
    "eLGU",
    "eMessages",
    "eNationalID",
    "eNationalIDVerify",
    "eNews",
    "eNGA",
    "eReceipt",
    "eReport",
    "eResume",
    "eStartUp",
    "eTourism",
    "eTravel",
    "eVisa",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Index into [`CATALOGUE`]; equal faces form a pair
    pub face: usize,
    pub face_up: bool,
    pub matched: bool,
}

impl Card {
    pub fn label(&self) -> &'static str {
        CATALOGUE[self.face]
    }
}

/// Two face-up cards waiting to be resolved
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Pending {
    first: usize,
    second: usize,
    matched: bool,
    delay: Delay,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memory {
    cards: Vec<Card>,
    /// Face-up cards not yet resolved (at most two)
    flipped: Vec<usize>,
    pending: Option<Pending>,
    clock: Countdown,
    matched_pairs: usize,
    cursor: (usize, usize),
}

impl Memory {
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            flipped: Vec::new(),
            pending: None,
            clock: Countdown::from_secs(TIME_BUDGET_SECS),
            matched_pairs: 0,
            cursor: (0, 0),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, row: usize, col: usize) -> Option<&Card> {
        if row >= ROWS || col >= COLS {
            return None;
        }
        self.cards.get(row * COLS + col)
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn face_up_unresolved(&self) -> usize {
        self.flipped.len()
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    fn flip(&mut self, row: usize, col: usize) -> Step {
        if row >= ROWS || col >= COLS || self.flipped.len() >= 2 {
            return Step::none();
        }
        let idx = row * COLS + col;
        let Some(card) = self.cards.get_mut(idx) else {
            return Step::none();
        };
        if card.face_up || card.matched {
            return Step::none();
        }
        card.face_up = true;
        self.cursor = (row, col);
        self.flipped.push(idx);

        if let [first, second] = self.flipped[..] {
            let matched = self.cards[first].face == self.cards[second].face;
            let delay = if matched {
                MATCH_DELAY_MS
            } else {
                MISMATCH_DELAY_MS
            };
            self.pending = Some(Pending {
                first,
                second,
                matched,
                delay: Delay::new(delay),
            });
        }
        Step::none()
    }

    /// Settle a pair whose delay just ran out
    fn resolve(&mut self, pending: Pending) -> Step {
        self.flipped.clear();
        if pending.matched {
            self.cards[pending.first].matched = true;
            self.cards[pending.second].matched = true;
            self.matched_pairs += 1;
            log::debug!("Pair {} matched", self.cards[pending.first].label());
            let step = Step::scored(1);
            return if self.matched_pairs >= PAIRS {
                step.with_verdict(Verdict::Won)
            } else {
                step
            };
        }
        self.cards[pending.first].face_up = false;
        self.cards[pending.second].face_up = false;
        Step::none()
    }

    fn move_cursor(&mut self, dir: Direction) {
        let (dr, dc) = dir.delta();
        let row = (self.cursor.0 as i32 + dr).clamp(0, ROWS as i32 - 1) as usize;
        let col = (self.cursor.1 as i32 + dc).clamp(0, COLS as i32 - 1) as usize;
        self.cursor = (row, col);
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Memory {
    const NAME: &'static str = "Memory Flip";
    const HIGH_SCORE_KEY: Option<&'static str> = Some("memoryFlipHighScore");

    fn tick_interval_ms(&self) -> Option<f64> {
        Some(TICK_MS)
    }

    fn initial_budget(&self) -> u32 {
        TIME_BUDGET_SECS
    }

    fn reset(&mut self, rng: &mut Pcg32) {
        let faces: Vec<usize> = (0..CATALOGUE.len())
            .collect::<Vec<_>>()
            .choose_multiple(rng, PAIRS)
            .copied()
            .collect();

        self.cards = faces
            .iter()
            .flat_map(|&face| [face, face])
            .map(|face| Card {
                face,
                face_up: false,
                matched: false,
            })
            .collect();
        self.cards.shuffle(rng);

        self.flipped.clear();
        self.pending = None;
        self.clock = Countdown::from_secs(TIME_BUDGET_SECS);
        self.matched_pairs = 0;
        self.cursor = (0, 0);
    }

    fn on_tick(&mut self, dt_ms: f64, _rng: &mut Pcg32) -> Step {
        let mut step = Step::none();
        if let Some(mut pending) = self.pending.take() {
            if pending.delay.tick(dt_ms) {
                step = self.resolve(pending);
            } else {
                self.pending = Some(pending);
            }
        }
        step.merge(Step::spend(self.clock.tick(dt_ms)))
    }

    fn on_intent(&mut self, intent: Intent, _rng: &mut Pcg32) -> Step {
        match intent {
            Intent::Select { row, col } => self.flip(row, col),
            Intent::Activate => {
                let (row, col) = self.cursor;
                self.flip(row, col)
            }
            Intent::Move(dir) => {
                self.move_cursor(dir);
                Step::none()
            }
            _ => Step::none(),
        }
    }

    fn on_terminal(&mut self, verdict: Verdict) {
        self.pending = None;
        self.flipped.clear();
        if verdict == Verdict::Lost {
            for card in &mut self.cards {
                card.face_up = true;
            }
        }
    }
}

impl MiniGame for Memory {
    const KIND: GameKind = GameKind::Memory;

    fn input_profile(&self) -> InputProfile {
        InputProfile::Grid {
            rows: ROWS,
            cols: COLS,
            cell_size: CARD,
        }
    }

    fn field_size(&self) -> Vec2 {
        Vec2::new(COLS as f32 * CARD, ROWS as f32 * CARD)
    }
}

impl Scene for Memory {
    fn draw(&self, surface: &mut dyn Surface) {
        let inset = Vec2::splat(5.0);
        for (i, card) in self.cards.iter().enumerate() {
            let (row, col) = (i / COLS, i % COLS);
            let min = Vec2::new(col as f32, row as f32) * CARD + inset;
            let size = Vec2::splat(CARD) - inset * 2.0;
            let color = if card.matched {
                palette::GOOD
            } else if card.face_up {
                palette::FLOOR
            } else {
                palette::ACCENT
            };
            surface.fill_rect(min, size, color);
            if card.face_up || card.matched {
                surface.text(min + Vec2::new(6.0, size.y / 2.0), card.label(), 13.0, palette::BACKDROP);
            }
            if self.cursor == (row, col) {
                surface.stroke_rect(min, size, palette::GOLD, 3.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{MemoryStore, ScoreStore};
    use crate::sim::{GameStatus, Session};
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn session(seed: u64) -> (Session<Memory>, std::rc::Rc<MemoryStore>) {
        let store = MemoryStore::shared();
        (Session::new(Memory::new(), store.clone(), seed), store)
    }

    fn at(idx: usize) -> Intent {
        Intent::Select {
            row: idx / COLS,
            col: idx % COLS,
        }
    }

    /// Card indices grouped by face
    fn pairs(game: &Memory) -> Vec<(usize, usize)> {
        let mut by_face: HashMap<usize, Vec<usize>> = HashMap::new();
        for (i, card) in game.cards().iter().enumerate() {
            by_face.entry(card.face).or_default().push(i);
        }
        let mut out: Vec<_> = by_face.values().map(|v| (v[0], v[1])).collect();
        out.sort();
        out
    }

    #[test]
    fn test_deal_has_ten_distinct_pairs() {
        let mut game = Memory::new();
        game.reset(&mut Pcg32::seed_from_u64(8));
        assert_eq!(game.cards().len(), ROWS * COLS);
        let groups = pairs(&game);
        assert_eq!(groups.len(), PAIRS);
        assert!(game.cards().iter().all(|c| c.face < CATALOGUE.len()));
    }

    #[test]
    fn test_match_resolves_after_delay() {
        let (mut s, _) = session(4);
        let (a, b) = pairs(s.game())[0];
        s.handle(at(a));
        s.handle(at(b));
        assert_eq!(s.game().face_up_unresolved(), 2);
        s.advance(400.0);
        assert_eq!(s.score(), 0);
        s.advance(100.0);
        assert_eq!(s.score(), 1);
        assert!(s.game().cards()[a].matched);
        assert_eq!(s.game().face_up_unresolved(), 0);
    }

    #[test]
    fn test_third_flip_blocked_and_mismatch_flips_back() {
        let (mut s, _) = session(4);
        let groups = pairs(s.game());
        let (a, _) = groups[0];
        let (b, c) = groups[1];
        s.handle(at(a));
        s.handle(at(b));
        s.handle(at(c));
        assert!(!s.game().cards()[c].face_up);

        for _ in 0..8 {
            s.advance(100.0);
        }
        assert!(!s.game().cards()[a].face_up);
        assert!(!s.game().cards()[b].face_up);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_clear_board_wins() {
        let (mut s, store) = session(21);
        for (a, b) in pairs(s.game()) {
            s.handle(at(a));
            s.handle(at(b));
            for _ in 0..5 {
                s.advance(100.0);
            }
        }
        assert_eq!(s.status(), GameStatus::Won);
        assert_eq!(s.score(), PAIRS as u64);
        assert_eq!(store.read("memoryFlipHighScore").unwrap(), Some(PAIRS as u64));
        // Time spent is about 5 seconds
        assert_eq!(s.budget(), TIME_BUDGET_SECS - 5);
    }

    #[test]
    fn test_time_out_loses_and_reveals() {
        let (mut s, _) = session(2);
        for _ in 0..(TIME_BUDGET_SECS * 10 - 1) {
            s.advance(100.0);
        }
        assert_eq!(s.status(), GameStatus::Playing);
        assert_eq!(s.budget(), 1);
        s.advance(100.0);
        assert_eq!(s.status(), GameStatus::Lost);
        assert!(s.game().cards().iter().all(|c| c.face_up));
    }
}
