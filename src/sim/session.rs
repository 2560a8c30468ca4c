//! Generic mini-game session
//!
//! One state machine shared by every game:
//!
//! ```text
//! NotStarted --start--> Playing --goal--> Won
//!                          |  \--failure, budget exhausted--> Lost
//!                          +--pause--> Paused --resume--> Playing
//! Won | Lost --restart--> NotStarted --> Playing
//! ```
//!
//! Games plug in through the [`Game`] hooks and report what happened as a
//! [`Step`]; the session owns status, score, the failure budget and the
//! persisted best score.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::clock::FixedStep;
use super::input::Intent;
use crate::highscores::{HighScore, SharedStore};

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    NotStarted,
    Playing,
    Paused,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::NotStarted => "not started",
            GameStatus::Playing => "playing",
            GameStatus::Paused => "paused",
            GameStatus::Won => "won",
            GameStatus::Lost => "lost",
        }
    }
}

/// Terminal outcome requested by a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Won,
    Lost,
}

/// What a single tick or intent produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Step {
    /// Successful events (each worth one point)
    pub points: u32,
    /// Budget consumed (lives, seconds)
    pub spent: u32,
    pub verdict: Option<Verdict>,
}

impl Step {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn scored(points: u32) -> Self {
        Self {
            points,
            ..Self::default()
        }
    }

    pub fn spend(spent: u32) -> Self {
        Self {
            spent,
            ..Self::default()
        }
    }

    pub fn won() -> Self {
        Self {
            verdict: Some(Verdict::Won),
            ..Self::default()
        }
    }

    pub fn lost() -> Self {
        Self {
            verdict: Some(Verdict::Lost),
            ..Self::default()
        }
    }

    pub fn with_verdict(mut self, verdict: Verdict) -> Self {
        self.verdict = Some(verdict);
        self
    }

    /// Combine two steps from the same tick (fatal verdicts win)
    pub fn merge(self, other: Step) -> Step {
        let verdict = match (self.verdict, other.verdict) {
            (Some(Verdict::Lost), _) | (_, Some(Verdict::Lost)) => Some(Verdict::Lost),
            (a, b) => a.or(b),
        };
        Step {
            points: self.points + other.points,
            spent: self.spent + other.spent,
            verdict,
        }
    }
}

/// Per-game hooks driven by [`Session`]
pub trait Game {
    /// Display name, also used in logs
    const NAME: &'static str;
    /// Storage key for the best score; `None` for scoreless games
    const HIGH_SCORE_KEY: Option<&'static str>;

    /// Tick period, or `None` for purely input-driven games
    fn tick_interval_ms(&self) -> Option<f64>;

    /// Lives / seconds available before the session is lost
    fn initial_budget(&self) -> u32 {
        1
    }

    /// Enter `Playing` immediately on mount and restart
    fn autostart(&self) -> bool {
        true
    }

    /// Rebuild all per-level content (called at creation and on restart)
    fn reset(&mut self, rng: &mut Pcg32);

    fn on_tick(&mut self, _dt_ms: f64, _rng: &mut Pcg32) -> Step {
        Step::none()
    }

    fn on_intent(&mut self, intent: Intent, rng: &mut Pcg32) -> Step;

    /// Notification after entering `Won` or `Lost`
    fn on_terminal(&mut self, _verdict: Verdict) {}
}

/// One playthrough of a single game
pub struct Session<G: Game> {
    game: G,
    status: GameStatus,
    score: u64,
    budget: u32,
    high: Option<HighScore>,
    store: SharedStore,
    rng: Pcg32,
    clock: Option<FixedStep>,
    torn_down: bool,
}

impl<G: Game> Session<G> {
    /// Create a session, reading the best score and building the first level
    pub fn new(mut game: G, store: SharedStore, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        game.reset(&mut rng);

        let high = G::HIGH_SCORE_KEY.map(|key| HighScore::load(store.as_ref(), key));
        let clock = game.tick_interval_ms().map(FixedStep::new);
        let budget = game.initial_budget();

        let mut session = Self {
            game,
            status: GameStatus::NotStarted,
            score: 0,
            budget,
            high,
            store,
            rng,
            clock,
            torn_down: false,
        };
        log::info!("{} session created (seed {})", G::NAME, seed);
        if session.game.autostart() {
            session.start();
        }
        session
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Stored best (0 for scoreless games or when nothing is stored)
    pub fn best(&self) -> u64 {
        self.high.as_ref().map(HighScore::best).unwrap_or(0)
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// `NotStarted -> Playing`; no-op from any other state
    pub fn start(&mut self) -> bool {
        if self.status != GameStatus::NotStarted {
            return false;
        }
        if let Some(clock) = self.clock.as_mut() {
            clock.reset();
        }
        self.status = GameStatus::Playing;
        log::debug!("{} started", G::NAME);
        true
    }

    /// Route an intent. Returns the new status if it changed.
    pub fn handle(&mut self, intent: Intent) -> Option<GameStatus> {
        let before = self.status;
        match intent {
            Intent::Start => {
                self.start();
            }
            Intent::Restart => self.restart(),
            Intent::TogglePause => self.toggle_pause(),
            _ if self.status == GameStatus::Playing => {
                let step = self.game.on_intent(intent, &mut self.rng);
                self.apply(step);
            }
            // Everything else outside Playing is dropped
            _ => {}
        }
        (self.status != before).then_some(self.status)
    }

    /// Feed elapsed wall time; runs due ticks while still playing.
    pub fn advance(&mut self, elapsed_ms: f64) -> Option<GameStatus> {
        if self.status != GameStatus::Playing {
            return None;
        }
        let Some(clock) = self.clock.as_mut() else {
            return None;
        };
        let ticks = clock.advance(elapsed_ms);
        let dt = clock.period_ms();

        let before = self.status;
        for _ in 0..ticks {
            let step = self.game.on_tick(dt, &mut self.rng);
            self.apply(step);
            if self.status != GameStatus::Playing {
                break;
            }
        }
        (self.status != before).then_some(self.status)
    }

    fn toggle_pause(&mut self) {
        match self.status {
            GameStatus::Playing => {
                self.status = GameStatus::Paused;
                log::debug!("{} paused", G::NAME);
            }
            GameStatus::Paused => {
                // Don't replay the time spent paused
                if let Some(clock) = self.clock.as_mut() {
                    clock.reset();
                }
                self.status = GameStatus::Playing;
                log::debug!("{} resumed", G::NAME);
            }
            _ => {}
        }
    }

    fn apply(&mut self, step: Step) {
        if step.verdict == Some(Verdict::Lost) {
            self.enter(Verdict::Lost);
            return;
        }

        self.score += step.points as u64;

        if step.spent > 0 {
            self.budget = self.budget.saturating_sub(step.spent);
            if self.budget == 0 {
                self.enter(Verdict::Lost);
                return;
            }
        }

        if step.verdict == Some(Verdict::Won) {
            self.enter(Verdict::Won);
        }
    }

    fn enter(&mut self, verdict: Verdict) {
        self.status = match verdict {
            Verdict::Won => GameStatus::Won,
            Verdict::Lost => GameStatus::Lost,
        };
        log::info!("{} {} with score {}", G::NAME, self.status.as_str(), self.score);
        if verdict == Verdict::Won {
            self.persist_best();
        }
        self.game.on_terminal(verdict);
    }

    fn persist_best(&mut self) {
        let Some(high) = self.high.as_mut() else {
            return;
        };
        if let Err(e) = high.record(self.store.as_ref(), self.score) {
            log::warn!("{}: failed to save best score: {}", G::NAME, e);
        }
    }

    /// Throw away the current playthrough and start a fresh one with new
    /// procedural content.
    pub fn restart(&mut self) {
        self.persist_best();
        self.game.reset(&mut self.rng);
        self.score = 0;
        self.budget = self.game.initial_budget();
        if let Some(clock) = self.clock.as_mut() {
            clock.reset();
        }
        self.status = GameStatus::NotStarted;
        log::info!("{} restarted", G::NAME);
        self.start();
    }

    /// End of life for this session (screen unmount). Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.persist_best();
        self.torn_down = true;
        log::debug!("{} session torn down", G::NAME);
    }
}

impl<G: Game> Drop for Session<G> {
    fn drop(&mut self) {
        self.teardown();
    }
}
