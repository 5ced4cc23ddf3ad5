//! Target tracking
//!
//! Each target (a "dot" on the plane) moves through Idle -> Revealed ->
//! Captured. Dwell time accumulates in fixed ticks only while the ball stays
//! inside the capture radius; leaving early resets it. Captured is terminal
//! until the round is reset.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tuning::{Tuning, secs_to_ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TargetState {
    /// Invisible, waiting for the ball
    #[default]
    Idle,
    /// Ball is on the target but has not dwelled long enough
    Revealed,
    /// Lit for the rest of the round
    Captured,
}

/// A single target disc
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    /// Stable index into the level's position list
    pub id: usize,
    pub position: Vec3,
    pub state: TargetState,
    /// Continuous ticks the ball has spent inside the capture radius
    pub dwell_ticks: u32,
    /// Top radius of the disc
    pub radius_top: f32,
}

impl Target {
    pub fn new(id: usize, position: Vec3) -> Self {
        Self {
            id,
            position,
            state: TargetState::Idle,
            dwell_ticks: 0,
            radius_top: TARGET_RADIUS,
        }
    }

    pub fn is_captured(&self) -> bool {
        self.state == TargetState::Captured
    }

    /// Dwell time in seconds of fixed ticks
    pub fn dwell_secs(&self) -> f32 {
        self.dwell_ticks as f32 * SIM_DT
    }

    pub fn capture_radius(&self, tuning: &Tuning) -> f32 {
        self.radius_top + tuning.capture_margin
    }

    fn reset(&mut self) {
        self.state = TargetState::Idle;
        self.dwell_ticks = 0;
    }
}

/// State change produced by one tracker update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetTransition {
    Revealed(usize),
    Captured(usize),
    /// Ball left before the dwell threshold
    Lost(usize),
}

/// Owns the round's targets and the captured counter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetTracker {
    pub targets: Vec<Target>,
    captured: usize,
    /// Dwell threshold in ticks
    threshold_ticks: u32,
}

impl TargetTracker {
    pub fn new(positions: &[Vec3], tuning: &Tuning) -> Self {
        Self {
            targets: positions
                .iter()
                .enumerate()
                .map(|(id, &pos)| Target::new(id, pos))
                .collect(),
            captured: 0,
            threshold_ticks: secs_to_ticks(tuning.dwell_threshold_secs).max(1),
        }
    }

    /// Replace all targets with a new level's positions
    pub fn load(&mut self, positions: &[Vec3], tuning: &Tuning) {
        *self = Self::new(positions, tuning);
    }

    /// All targets back to Idle, counter to zero
    pub fn reset(&mut self) {
        for target in &mut self.targets {
            target.reset();
        }
        self.captured = 0;
    }

    pub fn captured_count(&self) -> usize {
        self.captured
    }

    pub fn total(&self) -> usize {
        self.targets.len()
    }

    pub fn all_captured(&self) -> bool {
        !self.targets.is_empty() && self.captured == self.targets.len()
    }

    /// Advance dwell timers for the ball at `ball_pos`.
    ///
    /// Returns how many targets were captured this tick; transitions are pushed
    /// to `transitions`. Captured targets are never touched again.
    pub fn update(
        &mut self,
        ball_pos: Vec3,
        tuning: &Tuning,
        transitions: &mut Vec<TargetTransition>,
    ) -> usize {
        let mut delta = 0;

        for target in &mut self.targets {
            if target.is_captured() {
                continue;
            }

            let inside = ball_pos.distance(target.position) < target.capture_radius(tuning);
            if inside {
                target.dwell_ticks += 1;
                if target.dwell_ticks >= self.threshold_ticks {
                    target.state = TargetState::Captured;
                    transitions.push(TargetTransition::Captured(target.id));
                    delta += 1;
                } else if target.state == TargetState::Idle {
                    target.state = TargetState::Revealed;
                    transitions.push(TargetTransition::Revealed(target.id));
                }
            } else if target.state != TargetState::Idle || target.dwell_ticks > 0 {
                target.reset();
                transitions.push(TargetTransition::Lost(target.id));
            }
        }

        self.captured += delta;
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> TargetTracker {
        TargetTracker::new(
            &[Vec3::new(0.0, 0.0, 0.0), Vec3::new(100.0, 0.0, 0.0)],
            &Tuning::default(),
        )
    }

    fn on_first() -> Vec3 {
        Vec3::new(1.0, 4.5, 0.0)
    }

    #[test]
    fn test_reveal_then_capture_after_threshold() {
        let tuning = Tuning::default();
        let mut tracker = tracker();
        let mut transitions = Vec::new();

        assert_eq!(tracker.update(on_first(), &tuning, &mut transitions), 0);
        assert_eq!(tracker.targets[0].state, TargetState::Revealed);
        assert_eq!(transitions, vec![TargetTransition::Revealed(0)]);

        // 1.5s at 60 Hz = 90 ticks in total
        for _ in 1..89 {
            assert_eq!(tracker.update(on_first(), &tuning, &mut transitions), 0);
        }
        assert_eq!(tracker.targets[0].state, TargetState::Revealed);
        assert_eq!(tracker.update(on_first(), &tuning, &mut transitions), 1);
        assert_eq!(tracker.targets[0].state, TargetState::Captured);
        assert_eq!(tracker.captured_count(), 1);
    }

    #[test]
    fn test_leaving_resets_dwell() {
        let tuning = Tuning::default();
        let mut tracker = tracker();
        let mut transitions = Vec::new();

        for _ in 0..60 {
            tracker.update(on_first(), &tuning, &mut transitions);
        }
        assert_eq!(tracker.targets[0].dwell_ticks, 60);

        tracker.update(Vec3::new(50.0, 4.5, 0.0), &tuning, &mut transitions);
        assert_eq!(tracker.targets[0].dwell_ticks, 0);
        assert_eq!(tracker.targets[0].state, TargetState::Idle);
        assert_eq!(transitions.last(), Some(&TargetTransition::Lost(0)));
    }

    #[test]
    fn test_capture_is_sticky_and_counted_once() {
        let tuning = Tuning::default();
        let mut tracker = tracker();
        let mut transitions = Vec::new();

        for _ in 0..200 {
            tracker.update(on_first(), &tuning, &mut transitions);
        }
        assert_eq!(tracker.captured_count(), 1);
        let dwell = tracker.targets[0].dwell_ticks;

        // Leave and come back: still captured, no recount, no dwell reset
        tracker.update(Vec3::new(50.0, 4.5, 0.0), &tuning, &mut transitions);
        tracker.update(on_first(), &tuning, &mut transitions);
        assert!(tracker.targets[0].is_captured());
        assert_eq!(tracker.targets[0].dwell_ticks, dwell);
        assert_eq!(tracker.captured_count(), 1);
        let captures = transitions
            .iter()
            .filter(|t| matches!(t, TargetTransition::Captured(_)))
            .count();
        assert_eq!(captures, 1);
    }

    #[test]
    fn test_capture_radius_uses_3d_distance() {
        let tuning = Tuning::default();
        let mut tracker = tracker();
        let mut transitions = Vec::new();
        // Horizontal 8 at height 4.5 -> ~9.18 > 9
        tracker.update(Vec3::new(8.0, 4.5, 0.0), &tuning, &mut transitions);
        assert_eq!(tracker.targets[0].state, TargetState::Idle);
        // Horizontal 7 -> ~8.32 < 9
        tracker.update(Vec3::new(7.0, 4.5, 0.0), &tuning, &mut transitions);
        assert_eq!(tracker.targets[0].state, TargetState::Revealed);
    }

    #[test]
    fn test_reset_clears_everything() {
        let tuning = Tuning::default();
        let mut tracker = tracker();
        let mut transitions = Vec::new();
        for _ in 0..100 {
            tracker.update(on_first(), &tuning, &mut transitions);
        }
        tracker.reset();
        assert_eq!(tracker.captured_count(), 0);
        assert!(tracker
            .targets
            .iter()
            .all(|t| t.state == TargetState::Idle && t.dwell_ticks == 0));
    }

    #[test]
    fn test_all_captured_requires_targets() {
        let tracker = TargetTracker::new(&[], &Tuning::default());
        assert!(!tracker.all_captured());
    }
}
