//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed ticks only (the intro fade is the one wall-clock exception)
//! - Seeded RNG only
//! - Stable iteration order (targets by id)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod camera;
pub mod celebration;
pub mod feedback;
pub mod input;
pub mod intro;
pub mod level;
pub mod motion;
pub mod round;
pub mod state;
pub mod targets;
pub mod tick;

pub use camera::CameraPose;
pub use celebration::{Celebration, Link};
pub use feedback::{Feedback, FeedbackLevels};
pub use input::{DesiredVelocity, Direction, InputAggregator};
pub use intro::IntroMessage;
pub use level::{LEVELS, Level};
pub use motion::{Ball, Nearest, StepResult};
pub use round::{RoundPhase, RoundState, RoundStateMachine, RoundStep};
pub use state::{GameEvent, GameState};
pub use targets::{Target, TargetState, TargetTracker, TargetTransition};
pub use tick::{TickInput, tick};
