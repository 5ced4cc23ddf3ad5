//! Ball motion integration
//!
//! Friction-damped velocity on the ground plane, clamped to the playfield,
//! with rolling rotation and a proximity slowdown near uncaptured targets.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::input::DesiredVelocity;
use super::targets::Target;
use crate::consts::*;
use crate::map_linear;
use crate::tuning::Tuning;

/// Closest uncaptured target to the ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    pub id: usize,
    pub distance: f32,
    pub position: Vec3,
}

/// Result of one motion step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub position: Vec3,
    pub nearest: Option<Nearest>,
}

/// The controlled ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec3,
    /// Ground-plane velocity (x, z) in units per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Accumulated rolling rotation around the x and z axes (radians)
    pub rotation: Vec2,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: SPAWN_POINT,
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
            rotation: Vec2::ZERO,
        }
    }
}

impl Ball {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the spawn point, at rest
    pub fn respawn(&mut self) {
        self.pos = SPAWN_POINT;
        self.vel = Vec2::ZERO;
        self.rotation = Vec2::ZERO;
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Advance one tick.
    ///
    /// Stick input replaces the velocity, key input adds to it. After moving,
    /// velocity decays by friction, the ball rolls, and its position is clamped
    /// to the plane. The nearest uncaptured target is measured from the clamped
    /// position and, inside the slowdown range, scales the velocity carried into
    /// the next tick.
    pub fn step(&mut self, desired: DesiredVelocity, targets: &[Target], tuning: &Tuning) -> StepResult {
        let prev_vel = self.vel;

        match desired {
            DesiredVelocity::Set(v) => self.vel = v,
            DesiredVelocity::Accelerate(a) => {
                if self.vel.x.abs() < tuning.rest_threshold {
                    self.vel.x = 0.0;
                }
                if self.vel.y.abs() < tuning.rest_threshold {
                    self.vel.y = 0.0;
                }
                self.vel += a;
            }
        }

        if !self.vel.is_finite() {
            log::debug!("Discarding non-finite velocity {:?}", self.vel);
            self.vel = if prev_vel.is_finite() { prev_vel } else { Vec2::ZERO };
        }

        self.pos.x += self.vel.x;
        self.pos.z += self.vel.y;
        self.vel *= tuning.friction;

        if self.vel != Vec2::ZERO {
            self.rotation.x += self.vel.y / self.radius;
            self.rotation.y -= self.vel.x / self.radius;
        }

        self.pos.x = self.pos.x.clamp(-PLANE_HALF_WIDTH, PLANE_HALF_WIDTH);
        self.pos.z = self.pos.z.clamp(-PLANE_HALF_DEPTH, PLANE_HALF_DEPTH);

        let nearest = nearest_uncaptured(self.pos, targets);
        if let Some(n) = nearest {
            self.vel *= speed_factor(n.distance, tuning);
        }

        StepResult {
            position: self.pos,
            nearest,
        }
    }
}

/// Proximity slowdown: `min_speed_factor` on top of a target, 1.0 at the edge
/// of the slowdown range and beyond
pub fn speed_factor(distance: f32, tuning: &Tuning) -> f32 {
    if distance < tuning.slowdown_range {
        map_linear(
            distance.max(0.0),
            0.0,
            tuning.slowdown_range,
            tuning.min_speed_factor,
            1.0,
        )
    } else {
        1.0
    }
}

/// Closest target that has not been captured yet (ties keep the lowest id)
pub fn nearest_uncaptured(pos: Vec3, targets: &[Target]) -> Option<Nearest> {
    targets
        .iter()
        .filter(|t| !t.is_captured())
        .map(|t| Nearest {
            id: t.id,
            distance: pos.distance(t.position),
            position: t.position,
        })
        .fold(None, |best: Option<Nearest>, n| match best {
            Some(b) if b.distance <= n.distance => Some(b),
            _ => Some(n),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::targets::TargetState;

    fn target(id: usize, x: f32, z: f32) -> Target {
        Target::new(id, Vec3::new(x, 0.0, z))
    }

    #[test]
    fn test_keys_accelerate_then_friction() {
        let tuning = Tuning::default();
        let mut ball = Ball::new();
        let result = ball.step(DesiredVelocity::Accelerate(Vec2::new(0.15, 0.0)), &[], &tuning);
        assert!((result.position.x - 0.15).abs() < 1e-6);
        assert!((ball.vel.x - 0.15 * 0.85).abs() < 1e-6);
        assert!(result.nearest.is_none());
    }

    #[test]
    fn test_stick_replaces_velocity() {
        let tuning = Tuning::default();
        let mut ball = Ball::new();
        ball.vel = Vec2::new(-3.0, 2.0);
        ball.step(DesiredVelocity::Set(Vec2::new(0.5, 0.0)), &[], &tuning);
        assert!((ball.pos.x - 0.5).abs() < 1e-6);
        assert!((ball.pos.z - 0.0).abs() < 1e-6);
    }

    #[test]
    fn test_tiny_velocity_snaps_to_rest() {
        let tuning = Tuning::default();
        let mut ball = Ball::new();
        ball.vel = Vec2::new(0.00005, -0.00002);
        ball.step(DesiredVelocity::Accelerate(Vec2::ZERO), &[], &tuning);
        assert_eq!(ball.vel, Vec2::ZERO);
        assert_eq!(ball.pos, SPAWN_POINT);
    }

    #[test]
    fn test_position_clamped_to_plane() {
        let tuning = Tuning::default();
        let mut ball = Ball::new();
        ball.pos.x = PLANE_HALF_WIDTH - 0.1;
        ball.pos.z = -PLANE_HALF_DEPTH + 0.1;
        ball.vel = Vec2::new(5.0, -5.0);
        let result = ball.step(DesiredVelocity::Accelerate(Vec2::ZERO), &[], &tuning);
        assert_eq!(result.position.x, PLANE_HALF_WIDTH);
        assert_eq!(result.position.z, -PLANE_HALF_DEPTH);
    }

    #[test]
    fn test_rolling_rotation_follows_velocity() {
        let tuning = Tuning::default();
        let mut ball = Ball::new();
        ball.step(DesiredVelocity::Set(Vec2::new(0.5, 0.0)), &[], &tuning);
        assert!(ball.rotation.y < 0.0);
        assert_eq!(ball.rotation.x, 0.0);
    }

    #[test]
    fn test_nearest_skips_captured() {
        let mut near = target(0, 10.0, 0.0);
        near.state = TargetState::Captured;
        let far = target(1, 50.0, 0.0);
        let n = nearest_uncaptured(Vec3::new(0.0, 0.0, 0.0), &[near, far]).expect("one uncaptured");
        assert_eq!(n.id, 1);
        assert!((n.distance - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_slowdown_near_target() {
        let tuning = Tuning::default();
        assert!((speed_factor(0.0, &tuning) - 0.2).abs() < 1e-6);
        assert!((speed_factor(7.5, &tuning) - 0.6).abs() < 1e-6);
        assert_eq!(speed_factor(15.0, &tuning), 1.0);
        assert_eq!(speed_factor(200.0, &tuning), 1.0);
    }

    #[test]
    fn test_slowdown_applied_in_step() {
        let tuning = Tuning::default();
        let targets = [target(0, 0.0, 0.0)];
        let mut ball = Ball::new();
        ball.step(DesiredVelocity::Set(Vec2::new(0.5, 0.0)), &targets, &tuning);
        // Ball sits ~4.53 from the target: well inside the slowdown range
        assert!(ball.vel.x < 0.5 * tuning.friction);
    }

    #[test]
    fn test_non_finite_velocity_discarded() {
        let tuning = Tuning::default();
        let mut ball = Ball::new();
        ball.step(DesiredVelocity::Set(Vec2::new(f32::NAN, 0.0)), &[], &tuning);
        assert!(ball.pos.is_finite());
        assert_eq!(ball.pos, SPAWN_POINT);
    }
}
