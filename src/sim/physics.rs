//! Entity integration for the action games
//!
//! Per tick: `vel.y += gravity` (clamped to terminal velocity), then
//! `pos += vel`. Units are pixels and pixels/tick; y grows downward so an
//! upward jump is a negative velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;

/// Per-game integration constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsParams {
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Maximum downward speed per tick
    pub terminal_velocity: f32,
    /// Vertical velocity applied by a jump/flap (negative = up)
    pub jump_velocity: f32,
}

/// What happened to a body during one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// The body touched the floor this step
    pub landed: bool,
}

/// A moving rectangle (player, bird)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Airborne after a jump; blocks further jumps until landing
    pub jumping: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            jumping: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Integrate one tick. With a floor, the body is clamped onto it and
    /// its vertical velocity zeroed.
    pub fn step(&mut self, params: &PhysicsParams, floor: Option<f32>) -> StepReport {
        self.vel.y = (self.vel.y + params.gravity).min(params.terminal_velocity);
        self.pos += self.vel;

        let mut report = StepReport::default();
        if let Some(floor_y) = floor {
            if self.bottom() >= floor_y {
                self.pos.y = floor_y - self.size.y;
                self.vel.y = 0.0;
                self.jumping = false;
                report.landed = true;
            }
        }
        report
    }

    /// Grounded jump: ignored while already airborne.
    ///
    /// Returns whether the jump was applied.
    pub fn jump(&mut self, params: &PhysicsParams) -> bool {
        if self.jumping {
            return false;
        }
        self.jumping = true;
        self.vel.y = params.jump_velocity;
        true
    }

    /// Unconditional flap (flappy-style): always overwrites vertical velocity
    pub fn flap(&mut self, params: &PhysicsParams) {
        self.vel.y = params.jump_velocity;
    }

    /// True once any part of the body leaves `[0, height]` vertically
    pub fn out_of_field(&self, height: f32) -> bool {
        self.pos.y < 0.0 || self.bottom() > height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUNNER: PhysicsParams = PhysicsParams {
        gravity: 0.4,
        terminal_velocity: 20.0,
        jump_velocity: -12.0,
    };

    fn grounded() -> Body {
        Body::new(Vec2::new(100.0, 345.0), Vec2::new(55.0, 55.0))
    }

    #[test]
    fn test_gravity_then_position() {
        let mut body = Body::new(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
        body.vel.y = 1.0;
        body.step(&RUNNER, None);
        assert!((body.vel.y - 1.4).abs() < 1e-6);
        assert!((body.pos.y - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_terminal_velocity_clamp() {
        let mut body = Body::new(Vec2::ZERO, Vec2::splat(10.0));
        body.vel.y = 19.9;
        body.step(&RUNNER, None);
        assert_eq!(body.vel.y, 20.0);
    }

    #[test]
    fn test_jump_guard_while_airborne() {
        let mut body = grounded();
        assert!(body.jump(&RUNNER));
        body.step(&RUNNER, Some(400.0));
        let vel_before = body.vel;
        assert!(body.jumping);
        assert!(!body.jump(&RUNNER));
        assert_eq!(body.vel, vel_before);
    }

    #[test]
    fn test_landing_clamps_to_floor() {
        let mut body = grounded();
        body.jump(&RUNNER);
        let mut landed = false;
        for _ in 0..200 {
            if body.step(&RUNNER, Some(400.0)).landed {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert!(!body.jumping);
        assert_eq!(body.vel.y, 0.0);
        assert_eq!(body.bottom(), 400.0);
        // Grounded again, so a new jump is allowed
        assert!(body.jump(&RUNNER));
    }

    #[test]
    fn test_flap_ignores_guard() {
        let params = PhysicsParams {
            gravity: 5.0,
            terminal_velocity: 60.0,
            jump_velocity: -22.0,
        };
        let mut bird = Body::new(Vec2::new(200.0, 500.0), Vec2::splat(70.0));
        bird.flap(&params);
        bird.step(&params, None);
        bird.flap(&params);
        assert_eq!(bird.vel.y, -22.0);
    }

    #[test]
    fn test_out_of_field() {
        let mut bird = Body::new(Vec2::new(0.0, 10.0), Vec2::splat(70.0));
        assert!(!bird.out_of_field(1000.0));
        bird.pos.y = -1.0;
        assert!(bird.out_of_field(1000.0));
        bird.pos.y = 931.0;
        assert!(bird.out_of_field(1000.0));
    }
}
