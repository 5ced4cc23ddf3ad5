//! Round lifecycle
//!
//! Playing -> Ending -> Resetting -> Playing. The phase owns whatever the
//! phase needs: the in-flight celebration lives inside `Ending` and is
//! consumed on the way out, so nothing animated can leak into the next round.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::camera::CameraPose;
use super::celebration::{Celebration, Link};
use crate::tuning::Tuning;

/// Plain round state, without phase data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// Ball responds to input, motion and tracking run
    Playing,
    /// Ball frozen, celebration animating
    Ending,
    /// Fixed pause before everything resets
    Resetting,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RoundPhase {
    Playing,
    Ending(Celebration),
    Resetting {
        ticks_left: u32,
        /// The finished constellation, shown until the reset
        links: Vec<Link>,
    },
}

/// What the round machine did this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundStep {
    /// Nothing to do outside Playing
    Playing,
    /// Celebration advanced; camera moved
    Celebrating(CameraPose),
    /// Celebration finished this tick; pause started
    CelebrationFinished(CameraPose),
    /// Waiting out the reset delay
    Waiting,
    /// Delay elapsed: the caller must reset the round now
    ResetDue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundStateMachine {
    phase: RoundPhase,
    /// Rounds started so far (first round is 1)
    round: u32,
}

impl Default for RoundStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundStateMachine {
    pub fn new() -> Self {
        Self {
            phase: RoundPhase::Playing,
            round: 1,
        }
    }

    pub fn state(&self) -> RoundState {
        match self.phase {
            RoundPhase::Playing => RoundState::Playing,
            RoundPhase::Ending(_) => RoundState::Ending,
            RoundPhase::Resetting { .. } => RoundState::Resetting,
        }
    }

    pub fn phase(&self) -> &RoundPhase {
        &self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// Constellation lines currently on screen
    pub fn links(&self) -> &[Link] {
        match &self.phase {
            RoundPhase::Playing => &[],
            RoundPhase::Ending(celebration) => &celebration.lines.links,
            RoundPhase::Resetting { links, .. } => links,
        }
    }

    /// Playing -> Ending, exactly when every target of the level is captured.
    /// Returns true on the transition.
    pub fn check_complete(
        &mut self,
        captured: usize,
        total: usize,
        camera: CameraPose,
        stars: &[Vec3],
        tuning: &Tuning,
    ) -> bool {
        if !matches!(self.phase, RoundPhase::Playing) || total == 0 || captured != total {
            return false;
        }
        log::info!("Round {} complete: {}/{} stars lit", self.round, captured, total);
        self.phase = RoundPhase::Ending(Celebration::new(camera, stars, tuning));
        true
    }

    /// Advance the non-Playing phases by one tick
    pub fn advance(&mut self, tuning: &Tuning) -> RoundStep {
        match &mut self.phase {
            RoundPhase::Playing => RoundStep::Playing,
            RoundPhase::Ending(celebration) => {
                let pose = celebration.step();
                if !celebration.is_finished() {
                    return RoundStep::Celebrating(pose);
                }
                log::info!("Celebration finished after {} frames", celebration.frames());
                let finished = std::mem::replace(&mut self.phase, RoundPhase::Playing);
                let links = match finished {
                    RoundPhase::Ending(celebration) => celebration.into_links(),
                    _ => Vec::new(),
                };
                self.phase = RoundPhase::Resetting {
                    ticks_left: tuning.reset_delay_ticks(),
                    links,
                };
                RoundStep::CelebrationFinished(pose)
            }
            RoundPhase::Resetting { ticks_left, .. } => {
                *ticks_left = ticks_left.saturating_sub(1);
                if *ticks_left == 0 {
                    RoundStep::ResetDue
                } else {
                    RoundStep::Waiting
                }
            }
        }
    }

    /// Resetting -> Playing; drops the finished lines
    pub fn begin_round(&mut self) {
        self.phase = RoundPhase::Playing;
        self.round += 1;
        log::info!("Round {} started", self.round);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stars() -> Vec<Vec3> {
        vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)]
    }

    #[test]
    fn test_ends_only_when_all_captured() {
        let tuning = Tuning::default();
        let mut round = RoundStateMachine::new();
        assert!(!round.check_complete(1, 2, CameraPose::start(), &stars(), &tuning));
        assert_eq!(round.state(), RoundState::Playing);
        assert!(!round.check_complete(0, 0, CameraPose::start(), &[], &tuning));
        assert_eq!(round.state(), RoundState::Playing);

        assert!(round.check_complete(2, 2, CameraPose::start(), &stars(), &tuning));
        assert_eq!(round.state(), RoundState::Ending);
        // Already ending: no second transition
        assert!(!round.check_complete(2, 2, CameraPose::start(), &stars(), &tuning));
    }

    #[test]
    fn test_full_cycle() {
        let tuning = Tuning::default();
        let mut round = RoundStateMachine::new();
        round.check_complete(2, 2, CameraPose::start(), &stars(), &tuning);

        let mut frames = 0;
        loop {
            frames += 1;
            match round.advance(&tuning) {
                RoundStep::Celebrating(_) => assert_eq!(round.state(), RoundState::Ending),
                RoundStep::CelebrationFinished(pose) => {
                    assert!((pose.position - CameraPose::overview().position).length() < 1e-3);
                    break;
                }
                other => panic!("unexpected {:?}", other),
            }
        }
        // The glide (90) outlasts a single link (50)
        assert_eq!(frames, 90);
        assert_eq!(round.state(), RoundState::Resetting);
        assert_eq!(round.links().len(), 1);

        for _ in 0..tuning.reset_delay_ticks() - 1 {
            assert_eq!(round.advance(&tuning), RoundStep::Waiting);
        }
        assert_eq!(round.advance(&tuning), RoundStep::ResetDue);

        round.begin_round();
        assert_eq!(round.state(), RoundState::Playing);
        assert_eq!(round.round(), 2);
        assert!(round.links().is_empty());
    }
}
