//! Star Seeker - roll a glowing ball across a dark plane to light up a constellation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (input, motion, targets, round lifecycle)
//! - `platform`: Capability surface the simulation is presented through
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven gameplay constants
//! - `settings`: Player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{Error, Result};
pub use settings::{LevelSelection, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (one tick per displayed frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks per second, for converting second-based durations to tick counts
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Playfield dimensions (plane is 800 x 400 centered at the origin)
    pub const PLANE_HALF_WIDTH: f32 = 400.0;
    pub const PLANE_HALF_DEPTH: f32 = 200.0;

    /// Where the ball spawns at the start of every round
    pub const SPAWN_POINT: Vec3 = Vec3::new(0.0, 4.5, 0.0);
    pub const BALL_RADIUS: f32 = 5.0;

    /// Target discs
    pub const TARGET_RADIUS: f32 = 4.0;
    pub const TARGET_HEIGHT: f32 = 0.1;

    /// Camera rig
    pub const CAMERA_FOLLOW_OFFSET: Vec3 = Vec3::new(0.0, 75.0, 50.0);
    pub const CAMERA_OVERVIEW: Vec3 = Vec3::new(0.0, 250.0, 0.0);
    pub const CAMERA_START: Vec3 = Vec3::new(0.0, 75.0, 50.0);
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly remap `x` from range [a1, a2] to [b1, b2] (unclamped)
#[inline]
pub fn map_linear(x: f32, a1: f32, a2: f32, b1: f32, b2: f32) -> f32 {
    b1 + (x - a1) * (b2 - b1) / (a2 - a1)
}

/// Scale `v` down so its length does not exceed `max`.
///
/// Vectors already inside the radius are returned untouched, so the clamp is
/// exact on the boundary: `(50, 0)` with `max = 10` becomes `(10, 0)`.
#[inline]
pub fn clamp_length(v: Vec2, max: f32) -> Vec2 {
    let len = v.length();
    if len > max && len > 0.0 {
        v * (max / len)
    } else {
        v
    }
}

/// Replace non-finite components with zero
#[inline]
pub fn sanitize(v: Vec2) -> Vec2 {
    Vec2::new(
        if v.x.is_finite() { v.x } else { 0.0 },
        if v.y.is_finite() { v.y } else { 0.0 },
    )
}
