//! Proximity feedback
//!
//! Distance to the nearest uncaptured target drives the ball's glow, the
//! ambient volume and the stereo pan. Brightness snaps; volume eases toward
//! its target so it never steps audibly.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::lerp;
use crate::tuning::Tuning;

/// Output of the stateless part of the mapping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeedbackLevels {
    pub brightness: f32,
    /// Where the volume is heading (not the smoothed volume)
    pub target_volume: f32,
}

/// Map a distance to clamped inverse-linear brightness and volume targets
pub fn map(distance: f32, max_distance: f32, tuning: &Tuning) -> FeedbackLevels {
    let closeness = if max_distance > 0.0 && distance.is_finite() {
        1.0 - distance / max_distance
    } else {
        0.0
    };
    FeedbackLevels {
        brightness: closeness.clamp(tuning.min_brightness, tuning.max_brightness),
        target_volume: closeness.clamp(tuning.min_volume, tuning.max_volume),
    }
}

/// Signed horizontal offset from ball to target mapped to [-1, 1]
pub fn pan(ball: Vec3, target: Vec3, pan_range: f32) -> f32 {
    let offset = target.x - ball.x;
    if pan_range <= 0.0 || !offset.is_finite() {
        return 0.0;
    }
    (offset / pan_range).clamp(-1.0, 1.0)
}

/// Current audiovisual parameters, recomputed every Playing tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub brightness: f32,
    pub volume: f32,
    pub pan: f32,
}

impl Feedback {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            brightness: tuning.max_brightness,
            volume: tuning.initial_volume,
            pan: 0.0,
        }
    }

    /// Ball point light intensity for the current brightness
    pub fn light_intensity(&self, tuning: &Tuning) -> f32 {
        self.brightness * tuning.ball_light_scale
    }

    /// Update from the ball and its nearest uncaptured target
    pub fn update(&mut self, ball: Vec3, target: Vec3, distance: f32, tuning: &Tuning) {
        let levels = map(distance, tuning.feedback_max_distance, tuning);
        self.brightness = levels.brightness;
        self.volume = lerp(self.volume, levels.target_volume, tuning.volume_damping);
        self.pan = pan(ball, target, tuning.pan_range);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brightness_clamp_boundaries() {
        let tuning = Tuning::default();
        assert_eq!(map(0.0, 100.0, &tuning).brightness, tuning.max_brightness);
        assert_eq!(map(200.0, 100.0, &tuning).brightness, tuning.min_brightness);
        assert!((map(40.0, 100.0, &tuning).brightness - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_volume_eases_toward_target() {
        let tuning = Tuning::default();
        let mut feedback = Feedback::new(&tuning);
        assert_eq!(feedback.volume, 1.0);

        let far = Vec3::new(500.0, 0.0, 0.0);
        feedback.update(Vec3::ZERO, far, 500.0, &tuning);
        // One tick closes 1% of the gap toward 0.1
        assert!((feedback.volume - (1.0 - 0.9 * 0.01)).abs() < 1e-6);
        assert_eq!(feedback.brightness, tuning.min_brightness);

        for _ in 0..2000 {
            feedback.update(Vec3::ZERO, far, 500.0, &tuning);
        }
        assert!((feedback.volume - tuning.min_volume).abs() < 1e-3);
    }

    #[test]
    fn test_pan_uses_signed_horizontal_offset() {
        assert_eq!(pan(Vec3::ZERO, Vec3::new(50.0, 0.0, 999.0), 100.0), 0.5);
        assert_eq!(pan(Vec3::ZERO, Vec3::new(-300.0, 0.0, 0.0), 100.0), -1.0);
        assert_eq!(pan(Vec3::new(10.0, 0.0, 0.0), Vec3::new(10.0, 0.0, -40.0), 100.0), 0.0);
    }

    #[test]
    fn test_non_finite_distance_is_dimmest() {
        let tuning = Tuning::default();
        assert_eq!(map(f32::NAN, 100.0, &tuning).brightness, tuning.min_brightness);
    }

    #[test]
    fn test_light_intensity_scale() {
        let tuning = Tuning::default();
        let mut feedback = Feedback::new(&tuning);
        feedback.brightness = 0.5;
        assert_eq!(feedback.light_intensity(&tuning), 25.0);
    }
}
