//! Flappy eGov
//!
//! A bird falls through a 1000x1000 field while pipe pairs scroll in from the
//! right. Every pipe passed is a point; touching a pipe or leaving the field
//! ends the run. There is no win condition.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{GameKind, MiniGame};
use crate::renderer::{Scene, Surface, palette};
use crate::sim::{Aabb, Body, Game, InputProfile, Intent, PhysicsParams, Step, Verdict};

pub const FIELD: f32 = 1000.0;
pub const TICK_MS: f64 = 40.0;
pub const BIRD_SIZE: f32 = 70.0;
/// Horizontal center of the bird
pub const BIRD_X: f32 = 200.0;
pub const PIPE_WIDTH: f32 = 180.0;
pub const PIPE_GAP: f32 = 250.0;
pub const PIPE_SPACING: f32 = 450.0;
pub const PIPE_SPEED: f32 = 15.0;
/// Top pipe heights are drawn from this range
pub const PIPE_HEIGHTS: std::ops::Range<f32> = 100.0..500.0;

const PARAMS: PhysicsParams = PhysicsParams {
    gravity: 5.0,
    terminal_velocity: 60.0,
    jump_velocity: -22.0,
};

/// A top/bottom pipe pair; `height` is where the gap starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub x: f32,
    pub height: f32,
}

impl Pipe {
    pub fn top(&self) -> Aabb {
        Aabb::from_edges(self.x, 0.0, self.x + PIPE_WIDTH, self.height)
    }

    pub fn bottom(&self) -> Aabb {
        Aabb::from_edges(self.x, self.height + PIPE_GAP, self.x + PIPE_WIDTH, FIELD)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + PIPE_WIDTH
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flappy {
    bird: Body,
    pipes: Vec<Pipe>,
}

impl Flappy {
    pub fn new() -> Self {
        Self {
            bird: spawn_bird(),
            pipes: Vec::new(),
        }
    }

    pub fn bird(&self) -> &Body {
        &self.bird
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    fn new_pipe(rng: &mut Pcg32) -> Pipe {
        Pipe {
            x: FIELD,
            height: rng.random_range(PIPE_HEIGHTS).floor(),
        }
    }

    fn crashed(&self) -> bool {
        let bird = self.bird.bounds();
        self.bird.out_of_field(FIELD)
            || self
                .pipes
                .iter()
                .any(|p| bird.overlaps(&p.top()) || bird.overlaps(&p.bottom()))
    }
}

impl Default for Flappy {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_bird() -> Body {
    Body::new(
        Vec2::new(BIRD_X - BIRD_SIZE / 2.0, FIELD / 2.0),
        Vec2::splat(BIRD_SIZE),
    )
}

impl Game for Flappy {
    const NAME: &'static str = "Flappy eGov";
    const HIGH_SCORE_KEY: Option<&'static str> = Some("flappyBirdHighScore");

    fn tick_interval_ms(&self) -> Option<f64> {
        Some(TICK_MS)
    }

    fn reset(&mut self, rng: &mut Pcg32) {
        self.bird = spawn_bird();
        self.pipes.clear();
        self.pipes.push(Self::new_pipe(rng));
    }

    fn on_tick(&mut self, _dt_ms: f64, rng: &mut Pcg32) -> Step {
        self.bird.step(&PARAMS, None);

        let mut passed = 0;
        for pipe in &mut self.pipes {
            let was_ahead = pipe.right() >= BIRD_X;
            pipe.x -= PIPE_SPEED;
            if was_ahead && pipe.right() < BIRD_X {
                passed += 1;
            }
        }
        let rightmost = self.pipes.iter().fold(0.0f32, |max, p| max.max(p.x));
        self.pipes.retain(|p| p.right() > 0.0);
        if rightmost < FIELD - PIPE_SPACING {
            self.pipes.push(Self::new_pipe(rng));
        }

        let step = Step::scored(passed);
        if self.crashed() {
            step.with_verdict(Verdict::Lost)
        } else {
            step
        }
    }

    fn on_intent(&mut self, intent: Intent, _rng: &mut Pcg32) -> Step {
        if intent == Intent::Jump {
            self.bird.flap(&PARAMS);
        }
        Step::none()
    }
}

impl MiniGame for Flappy {
    const KIND: GameKind = GameKind::Flappy;

    fn input_profile(&self) -> InputProfile {
        InputProfile::Action
    }

    fn field_size(&self) -> Vec2 {
        Vec2::splat(FIELD)
    }
}

impl Scene for Flappy {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_rect(Vec2::ZERO, Vec2::splat(FIELD), palette::SKY);
        for pipe in &self.pipes {
            for rect in [pipe.top(), pipe.bottom()] {
                surface.fill_rect(rect.min, rect.size(), palette::PIPE);
            }
        }
        let bird = self.bird.bounds();
        surface.fill_circle(
            bird.min + bird.size() / 2.0,
            BIRD_SIZE / 2.0,
            palette::GOLD,
        );
    }
}
