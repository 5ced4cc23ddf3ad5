//! Game state and core simulation types
//!
//! Everything the per-tick update mutates lives in `GameState`. There is one
//! instance for the lifetime of the page; rounds reset it in place.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::CameraPose;
use super::feedback::Feedback;
use super::input::InputAggregator;
use super::intro::IntroMessage;
use super::level::{self, LEVELS, Level};
use super::motion::Ball;
use super::round::{RoundState, RoundStateMachine};
use super::targets::TargetTracker;
use crate::settings::LevelSelection;
use crate::tuning::Tuning;

/// Something noteworthy that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelLoaded { index: usize },
    TargetRevealed { id: usize },
    TargetLost { id: usize },
    TargetCaptured { id: usize, captured: usize, total: usize },
    RoundEnding,
    CelebrationFinished,
    RoundReset { level: usize },
    IntroDismissed,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub level_selection: LevelSelection,
    pub rng_state: RngState,
    #[serde(skip, default = "default_rng")]
    rng: Pcg32,
    /// Catalog index of the active level
    pub level_index: usize,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub input: InputAggregator,
    pub ball: Ball,
    pub tracker: TargetTracker,
    pub feedback: Feedback,
    pub intro: IntroMessage,
    pub round: RoundStateMachine,
    pub camera: CameraPose,
    /// Events raised since the platform last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

impl GameState {
    /// Create a new game with the given seed and load the first level
    pub fn new(seed: u64, tuning: Tuning, level_selection: LevelSelection) -> Self {
        let rng_state = RngState::new(seed);
        let mut state = Self {
            feedback: Feedback::new(&tuning),
            rng: rng_state.to_rng(),
            rng_state,
            level_index: 0,
            time_ticks: 0,
            input: InputAggregator::new(),
            ball: Ball::new(),
            tracker: TargetTracker::default(),
            intro: IntroMessage::new(),
            round: RoundStateMachine::new(),
            camera: CameraPose::start(),
            events: Vec::new(),
            tuning,
            level_selection,
        };
        state.load_next_level(None);
        state
    }

    pub fn round_state(&self) -> RoundState {
        self.round.state()
    }

    pub fn level(&self) -> &'static Level {
        &LEVELS[self.level_index]
    }

    /// Target positions of the active level, in connection order
    pub fn star_positions(&self) -> Vec<Vec3> {
        self.tracker.targets.iter().map(|t| t.position).collect()
    }

    fn load_next_level(&mut self, previous: Option<usize>) {
        self.level_index = level::select(self.level_selection, previous, &mut self.rng);
        let level = &LEVELS[self.level_index];
        self.tracker.load(&level.positions(), &self.tuning);
        log::info!(
            "Level {} loaded: {} ({} stars)",
            self.level_index,
            level.name,
            level.len()
        );
        self.events.push(GameEvent::LevelLoaded {
            index: self.level_index,
        });
    }

    /// Full reset for a new round: ball to spawn, targets idle, counter zero,
    /// camera to its start pose, level (re)selected, intro text back up.
    pub fn reset_round(&mut self) {
        self.ball.respawn();
        self.input.clear();
        self.load_next_level(Some(self.level_index));
        self.tracker.reset();
        self.camera = CameraPose::start();
        self.intro.reactivate();
        self.round.begin_round();
        self.events.push(GameEvent::RoundReset {
            level: self.level_index,
        });
        log::info!("Game reset");
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SPAWN_POINT;
    use crate::sim::targets::TargetState;

    #[test]
    fn test_new_state_loads_fixed_level() {
        let state = GameState::new(7, Tuning::default(), LevelSelection::Fixed(1));
        assert_eq!(state.level_index, 1);
        assert_eq!(state.tracker.total(), LEVELS[1].len());
        assert_eq!(state.round_state(), RoundState::Playing);
        assert_eq!(state.events, vec![GameEvent::LevelLoaded { index: 1 }]);
    }

    #[test]
    fn test_reset_round_restores_spawn() {
        let mut state = GameState::new(7, Tuning::default(), LevelSelection::Fixed(0));
        state.ball.pos = Vec3::new(120.0, 4.5, -60.0);
        state.ball.vel = glam::Vec2::new(0.3, 0.1);
        state.tracker.targets[0].state = TargetState::Captured;

        state.reset_round();
        assert_eq!(state.ball.pos, SPAWN_POINT);
        assert_eq!(state.ball.vel, glam::Vec2::ZERO);
        assert_eq!(state.tracker.captured_count(), 0);
        assert!(state.tracker.targets.iter().all(|t| t.state == TargetState::Idle));
        assert_eq!(state.camera, CameraPose::start());
        assert!(state.intro.is_active());
        assert_eq!(state.round.round(), 2);
    }

    #[test]
    fn test_cycle_selection_advances_on_reset() {
        let mut state = GameState::new(7, Tuning::default(), LevelSelection::Cycle);
        assert_eq!(state.level_index, 0);
        state.reset_round();
        assert_eq!(state.level_index, 1);
    }
}
