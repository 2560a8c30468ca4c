//! Dino Runner
//!
//! Endless side-scroller: obstacles slide in from the right at a slowly
//! rising speed and the player jumps over them. One point per tick survived.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{GameKind, MiniGame};
use crate::consts::FRAME_MS;
use crate::renderer::{Scene, Surface, palette};
use crate::sim::{Aabb, Body, Game, InputProfile, Intent, PhysicsParams, Step, Verdict, overlaps_forgiving};

pub const FIELD_WIDTH: f32 = 800.0;
pub const FIELD_HEIGHT: f32 = 450.0;
pub const GROUND_Y: f32 = 400.0;
pub const PLAYER_SIZE: f32 = 55.0;
pub const PLAYER_X: f32 = 100.0;
/// Furthest the player drifts forward while rising
pub const DRIFT_MAX_X: f32 = 160.0;
pub const HITBOX_MARGIN: f32 = 8.0;

pub const START_SPEED: f32 = 2.8;
pub const SPEED_STEP: f32 = 0.4;
pub const SPEED_EVERY: u64 = 500;
pub const MAX_SPEED: f32 = 10.0;

/// Minimum horizontal room between the newest obstacle and the right edge
pub const MIN_SPAWN_GAP: f32 = 300.0;
pub const SPAWN_MIN_MS: f64 = 1800.0;
pub const SPAWN_SPREAD_MS: f64 = 1200.0;
/// Extra random offset past the right edge for new obstacles
pub const SPAWN_VARIANCE: u32 = 100;

const PARAMS: PhysicsParams = PhysicsParams {
    gravity: 0.4,
    terminal_velocity: 20.0,
    jump_velocity: -12.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_edges(self.x, GROUND_Y - self.height, self.x + self.width, GROUND_Y)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runner {
    player: Body,
    obstacles: Vec<Obstacle>,
    speed: f32,
    ticks: u64,
    elapsed_ms: f64,
    last_spawn_ms: Option<f64>,
    next_spawn_gap_ms: f64,
}

impl Runner {
    pub fn new() -> Self {
        Self {
            player: spawn_player(),
            obstacles: Vec::new(),
            speed: START_SPEED,
            ticks: 0,
            elapsed_ms: 0.0,
            last_spawn_ms: None,
            next_spawn_gap_ms: SPAWN_MIN_MS,
        }
    }

    pub fn player(&self) -> &Body {
        &self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Forward lean on the way up, slow return on the way down
    fn drift(&mut self) {
        let p = &mut self.player;
        if p.jumping {
            if p.vel.y < 0.0 {
                p.pos.x = (p.pos.x + 0.9).min(DRIFT_MAX_X);
            } else if p.vel.y > 0.0 {
                p.pos.x = (p.pos.x - 0.3).max(PLAYER_X);
            }
        } else if p.pos.x > PLAYER_X {
            p.pos.x = (p.pos.x - 0.2).max(PLAYER_X);
        }
    }

    fn can_spawn(&self) -> bool {
        let room = match self.obstacles.last() {
            None => true,
            Some(newest) => FIELD_WIDTH - newest.x > MIN_SPAWN_GAP,
        };
        let waited = match self.last_spawn_ms {
            None => true,
            Some(at) => self.elapsed_ms - at > self.next_spawn_gap_ms,
        };
        room && waited
    }

    fn spawn(&mut self, rng: &mut Pcg32) {
        let obstacle = Obstacle {
            x: FIELD_WIDTH + rng.random_range(0..SPAWN_VARIANCE) as f32,
            width: rng.random_range(45.0..60.0),
            height: rng.random_range(55.0..80.0),
        };
        self.obstacles.push(obstacle);
        self.last_spawn_ms = Some(self.elapsed_ms);
        self.next_spawn_gap_ms = SPAWN_MIN_MS + rng.random_range(0.0..SPAWN_SPREAD_MS);
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_player() -> Body {
    Body::new(
        Vec2::new(PLAYER_X, GROUND_Y - PLAYER_SIZE),
        Vec2::splat(PLAYER_SIZE),
    )
}

impl Game for Runner {
    const NAME: &'static str = "Dino Runner";
    const HIGH_SCORE_KEY: Option<&'static str> = Some("dinorunnerHighScore");

    fn tick_interval_ms(&self) -> Option<f64> {
        Some(FRAME_MS)
    }

    fn autostart(&self) -> bool {
        false
    }

    fn reset(&mut self, _rng: &mut Pcg32) {
        *self = Self::new();
    }

    fn on_tick(&mut self, dt_ms: f64, rng: &mut Pcg32) -> Step {
        self.elapsed_ms += dt_ms;

        self.drift();
        self.player.step(&PARAMS, Some(GROUND_Y));

        if self.can_spawn() {
            self.spawn(rng);
        }

        let speed = self.speed;
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;
        }
        self.obstacles.retain(|o| o.x + o.width >= 0.0);

        let player = self.player.bounds();
        if self
            .obstacles
            .iter()
            .any(|o| overlaps_forgiving(&player, &o.bounds(), HITBOX_MARGIN))
        {
            return Step::lost();
        }

        self.ticks += 1;
        if self.ticks % SPEED_EVERY == 0 {
            self.speed = (self.speed + SPEED_STEP).min(MAX_SPEED);
            log::debug!("Runner speed up to {:.1}", self.speed);
        }
        Step::scored(1)
    }

    fn on_intent(&mut self, intent: Intent, _rng: &mut Pcg32) -> Step {
        if intent == Intent::Jump {
            self.player.jump(&PARAMS);
        }
        Step::none()
    }

    fn on_terminal(&mut self, _verdict: Verdict) {
        log::debug!("Runner stopped after {} ticks", self.ticks);
    }
}

impl MiniGame for Runner {
    const KIND: GameKind = GameKind::Runner;

    fn input_profile(&self) -> InputProfile {
        InputProfile::Action
    }

    fn field_size(&self) -> Vec2 {
        Vec2::new(FIELD_WIDTH, FIELD_HEIGHT)
    }
}

impl Scene for Runner {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(Vec2::ZERO, Vec2::new(FIELD_WIDTH, FIELD_HEIGHT), palette::FLOOR);
        surface.line(
            Vec2::new(0.0, GROUND_Y),
            Vec2::new(FIELD_WIDTH, GROUND_Y),
            palette::MUTED,
            2.0,
        );
        for obstacle in &self.obstacles {
            let b = obstacle.bounds();
            surface.fill_rect(b.min, b.size(), palette::PIPE);
        }
        surface.fill_rect(self.player.pos, self.player.size, palette::ACCENT);
        surface.text(
            Vec2::new(FIELD_WIDTH - 140.0, 28.0),
            &format!("Speed {:.1}", self.speed),
            16.0,
            palette::MUTED,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::{MemoryStore, ScoreStore};
    use crate::sim::{GameStatus, Session};
    use rand::SeedableRng;

    fn game() -> (Runner, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(77);
        let mut runner = Runner::new();
        runner.reset(&mut rng);
        (runner, rng)
    }

    #[test]
    fn test_waits_for_start() {
        let store = MemoryStore::shared();
        let mut s = Session::new(Runner::new(), store, 1);
        assert_eq!(s.status(), GameStatus::NotStarted);
        s.advance(100.0);
        assert_eq!(s.score(), 0);
        s.handle(Intent::Start);
        s.advance(FRAME_MS * 3.0 + 0.1);
        assert_eq!(s.score(), 3);
    }

    #[test]
    fn test_no_double_jump() {
        let (mut runner, mut rng) = game();
        runner.on_intent(Intent::Jump, &mut rng);
        runner.obstacles.clear();
        runner.on_tick(FRAME_MS, &mut rng);
        let vel = runner.player().vel.y;
        runner.on_intent(Intent::Jump, &mut rng);
        assert_eq!(runner.player().vel.y, vel);
    }

    #[test]
    fn test_jump_drifts_forward_then_returns() {
        let (mut runner, mut rng) = game();
        runner.on_intent(Intent::Jump, &mut rng);
        let mut max_x = PLAYER_X;
        for _ in 0..200 {
            runner.obstacles.clear();
            runner.on_tick(FRAME_MS, &mut rng);
            max_x = max_x.max(runner.player().pos.x);
            assert!(runner.player().pos.x <= DRIFT_MAX_X);
        }
        assert!(max_x > PLAYER_X);
        assert_eq!(runner.player().pos.x, PLAYER_X);
        assert!(!runner.player().jumping);
    }

    #[test]
    fn test_obstacle_sizes_and_spacing() {
        let (mut runner, mut rng) = game();
        let mut seen = 0;
        for _ in 0..3000 {
            // Keep the player safely airborne above everything
            runner.player.pos.y = 0.0;
            runner.player.vel.y = -PARAMS.gravity;
            let before = runner.obstacles.len();
            runner.on_tick(FRAME_MS, &mut rng);
            if runner.obstacles.len() > before {
                seen += 1;
                let newest = runner.obstacles.last().unwrap();
                assert!((45.0..60.0).contains(&newest.width));
                assert!((55.0..80.0).contains(&newest.height));
            }
        }
        assert!(seen >= 2);
        for pair in runner.obstacles.windows(2) {
            assert!(pair[1].x - pair[0].x > MIN_SPAWN_GAP);
        }
    }

    #[test]
    fn test_speed_ramps_every_500_ticks() {
        let (mut runner, mut rng) = game();
        for _ in 0..1000 {
            runner.obstacles.clear();
            runner.last_spawn_ms = Some(runner.elapsed_ms);
            runner.on_tick(FRAME_MS, &mut rng);
        }
        assert!((runner.speed() - (START_SPEED + 2.0 * SPEED_STEP)).abs() < 1e-4);
    }

    #[test]
    fn test_collision_honors_margin() {
        let (mut runner, mut rng) = game();
        let player_right = PLAYER_X + PLAYER_SIZE;
        // Graze: overlapping by less than both margins combined
        runner.obstacles = vec![Obstacle {
            x: player_right - 10.0 + START_SPEED,
            width: 50.0,
            height: 60.0,
        }];
        runner.last_spawn_ms = Some(0.0);
        runner.next_spawn_gap_ms = f64::MAX;
        assert_eq!(runner.on_tick(FRAME_MS, &mut rng).verdict, None);

        runner.obstacles = vec![Obstacle {
            x: player_right - 30.0 + START_SPEED,
            width: 50.0,
            height: 60.0,
        }];
        assert_eq!(runner.on_tick(FRAME_MS, &mut rng).verdict, Some(Verdict::Lost));
    }

    #[test]
    fn test_best_recorded_at_teardown() {
        let store = MemoryStore::shared();
        store.write("dinorunnerHighScore", 10).unwrap();
        let mut s = Session::new(Runner::new(), store.clone(), 3);
        s.handle(Intent::Start);
        for _ in 0..15 {
            s.advance(FRAME_MS);
        }
        assert!(s.score() >= 10);
        let score = s.score();
        s.teardown();
        assert_eq!(store.read("dinorunnerHighScore").unwrap(), Some(score.max(10)));
    }
}
