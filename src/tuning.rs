//! Data-driven gameplay constants
//!
//! Every number that shapes how the ball handles, how targets capture and how
//! feedback responds lives here so a round can be re-balanced without code
//! changes. Values are per tick unless the name says otherwise.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Input ===
    /// Pointer delta scale applied before accumulating into the virtual stick
    pub pointer_sensitivity: f32,
    /// Maximum virtual stick magnitude
    pub control_radius: f32,
    /// Virtual stick to velocity scale
    pub stick_to_velocity: f32,
    /// Speed cap for stick-driven velocity
    pub max_stick_speed: f32,
    /// Velocity added per tick for each held direction key
    pub key_acceleration: f32,

    // === Motion ===
    /// Velocity multiplier applied after every step (< 1)
    pub friction: f32,
    /// Velocity components below this snap to zero on frames without stick motion
    pub rest_threshold: f32,
    /// Distance to the nearest uncaptured target where the ball starts slowing
    pub slowdown_range: f32,
    /// Speed factor right on top of a target
    pub min_speed_factor: f32,

    // === Targets ===
    /// Added to the target disc radius to form the capture radius
    pub capture_margin: f32,
    /// Continuous dwell needed to capture a target (seconds of fixed ticks)
    pub dwell_threshold_secs: f32,

    // === Feedback ===
    /// Distance at which brightness/volume bottom out
    pub feedback_max_distance: f32,
    pub min_brightness: f32,
    pub max_brightness: f32,
    /// Ball point light intensity at full brightness
    pub ball_light_scale: f32,
    pub min_volume: f32,
    pub max_volume: f32,
    /// Volume at the start of a session
    pub initial_volume: f32,
    /// Fraction of the remaining gap the volume closes each tick
    pub volume_damping: f32,
    /// Horizontal offset that maps to a full left/right pan
    pub pan_range: f32,

    // === Round ===
    /// Camera glide to the overview position (frames)
    pub camera_glide_frames: u32,
    /// Link progress added per frame while drawing the constellation
    pub link_draw_speed: f32,
    /// Pause after the celebration before the next round (seconds of fixed ticks)
    pub reset_delay_secs: f32,

    // === Intro message (wall clock) ===
    pub intro_cycle_ms: f64,
    pub intro_fade_delay_ms: f64,
    pub intro_fade_duration_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            pointer_sensitivity: 0.1,
            control_radius: 10.0,
            stick_to_velocity: 0.1,
            max_stick_speed: 0.8,
            key_acceleration: 0.15,

            friction: 0.85,
            rest_threshold: 0.0001,
            slowdown_range: 15.0,
            min_speed_factor: 0.2,

            capture_margin: 5.0,
            dwell_threshold_secs: 1.5,

            feedback_max_distance: 100.0,
            min_brightness: 0.1,
            max_brightness: 1.0,
            ball_light_scale: 50.0,
            min_volume: 0.1,
            max_volume: 1.0,
            initial_volume: 1.0,
            volume_damping: 0.01,
            pan_range: 100.0,

            camera_glide_frames: 90,
            link_draw_speed: 0.02,
            reset_delay_secs: 7.0,

            intro_cycle_ms: 3000.0,
            intro_fade_delay_ms: 500.0,
            intro_fade_duration_ms: 1000.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::InvalidTuning)
    }

    /// Reset delay in whole ticks
    pub fn reset_delay_ticks(&self) -> u32 {
        secs_to_ticks(self.reset_delay_secs)
    }
}

/// Convert seconds to fixed ticks, rounding to the nearest tick
pub fn secs_to_ticks(secs: f32) -> u32 {
    (secs.max(0.0) * crate::consts::TICKS_PER_SECOND as f32).round() as u32
}
