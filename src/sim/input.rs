//! Input aggregation
//!
//! Merges relative pointer motion (accumulated into a clamped virtual stick)
//! and four held direction keys into one desired velocity per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;
use crate::{clamp_length, sanitize};

/// Direction keys the aggregator listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Unit step on the ground plane (x, z)
    fn axis(self) -> Vec2 {
        match self {
            Direction::Up => Vec2::new(0.0, -1.0),
            Direction::Down => Vec2::new(0.0, 1.0),
            Direction::Left => Vec2::new(-1.0, 0.0),
            Direction::Right => Vec2::new(1.0, 0.0),
        }
    }
}

/// Held state of the four direction keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    pub fn set(&mut self, dir: Direction, pressed: bool) {
        match dir {
            Direction::Up => self.up = pressed,
            Direction::Down => self.down = pressed,
            Direction::Left => self.left = pressed,
            Direction::Right => self.right = pressed,
        }
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        match dir {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Velocity request for one tick, on the ground plane (x, z)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DesiredVelocity {
    /// Stick moved since the last sample: replace the ball's velocity
    Set(Vec2),
    /// Keys only: add to the ball's velocity (may be zero)
    Accelerate(Vec2),
}

impl DesiredVelocity {
    pub fn is_stick(&self) -> bool {
        matches!(self, DesiredVelocity::Set(_))
    }
}

/// Pointer + keyboard aggregator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputAggregator {
    /// Virtual stick (x right, y up), magnitude <= control radius
    pub stick: Vec2,
    /// Set by pointer motion, cleared by sampling
    stick_moved: bool,
    pub keys: HeldKeys,
    /// Pointer capture (lock) currently held
    pub captured: bool,
}

impl InputAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulate a relative pointer delta (screen pixels, y down).
    ///
    /// Ignored unless pointer capture is active. Non-finite deltas are dropped.
    pub fn pointer_moved(&mut self, dx: f32, dy: f32, tuning: &Tuning) {
        if !self.captured {
            return;
        }
        if !dx.is_finite() || !dy.is_finite() {
            log::debug!("Dropping non-finite pointer delta ({}, {})", dx, dy);
            return;
        }
        self.stick.x += dx * tuning.pointer_sensitivity;
        self.stick.y -= dy * tuning.pointer_sensitivity;
        self.stick = clamp_length(sanitize(self.stick), tuning.control_radius);
        self.stick_moved = true;
    }

    /// Place the stick directly (autopilot). Counts as stick motion.
    pub fn steer(&mut self, stick: Vec2, tuning: &Tuning) {
        self.stick = clamp_length(sanitize(stick), tuning.control_radius);
        self.stick_moved = true;
    }

    /// Key down/up for a DOM key name; unknown keys are ignored
    pub fn key_changed(&mut self, key: &str, pressed: bool) {
        if let Some(dir) = Direction::from_key(key) {
            self.keys.set(dir, pressed);
        }
    }

    /// Pointer capture gained or lost. Losing it zeroes the stick.
    pub fn capture_changed(&mut self, active: bool) {
        self.captured = active;
        if !active {
            self.stick = Vec2::ZERO;
            self.stick_moved = false;
        }
    }

    /// Whether pointer motion arrived since the last sample
    pub fn stick_moved(&self) -> bool {
        self.stick_moved
    }

    /// Produce this tick's desired velocity and consume the stick-moved edge.
    pub fn sample_desired_velocity(&mut self, tuning: &Tuning) -> DesiredVelocity {
        if std::mem::take(&mut self.stick_moved) {
            let dir = self.stick * tuning.stick_to_velocity;
            let vel = clamp_length(dir, tuning.max_stick_speed);
            // Stick y is screen-up, which is -z on the plane
            return DesiredVelocity::Set(Vec2::new(vel.x, -vel.y));
        }

        let mut accel = Vec2::ZERO;
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            if self.keys.is_held(dir) {
                accel += dir.axis() * tuning.key_acceleration;
            }
        }
        DesiredVelocity::Accelerate(accel)
    }

    /// Forget held keys and stick (round reset keeps capture state)
    pub fn clear(&mut self) {
        self.stick = Vec2::ZERO;
        self.stick_moved = false;
        self.keys = HeldKeys::default();
    }
}
