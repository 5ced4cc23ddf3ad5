//! Platform abstraction layer
//!
//! The simulation never touches the scene, audio or DOM directly. Once per
//! tick `present` pushes the current state through the `Stage` capability
//! surface, which the browser (or a headless recorder) implements.

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::RecordingStage;

use glam::{Vec2, Vec3};

use crate::error::Result;
use crate::settings::Settings;
use crate::sim::{CameraPose, GameEvent, GameState, Link, TargetState};

/// Material/light parameters of one target disc
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetVisual {
    pub opacity: f32,
    /// Emissive RGB (0-1)
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    /// Point light hovering above the disc
    pub light_intensity: f32,
}

impl TargetVisual {
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        emissive: [0.0; 3],
        emissive_intensity: 0.0,
        light_intensity: 0.0,
    };

    pub const REVEALED: Self = Self {
        opacity: 0.5,
        emissive: [1.0; 3],
        emissive_intensity: 0.2,
        light_intensity: 0.0,
    };

    pub const LIT: Self = Self {
        opacity: 1.0,
        emissive: [1.0; 3],
        emissive_intensity: 1.0,
        light_intensity: 50.0,
    };

    pub fn for_state(state: TargetState) -> Self {
        match state {
            TargetState::Idle => Self::HIDDEN,
            TargetState::Revealed => Self::REVEALED,
            TargetState::Captured => Self::LIT,
        }
    }
}

/// Capabilities the simulation is presented through
pub trait Stage {
    /// Recreate target visuals for a freshly loaded level
    fn load_targets(&mut self, positions: &[Vec3]);
    fn set_ball(&mut self, position: Vec3, rotation: Vec2);
    fn set_ball_glow(&mut self, emissive_intensity: f32, light_intensity: f32);
    fn set_target_visual(&mut self, id: usize, visual: TargetVisual);
    /// Constellation lines (empty outside the end-of-round sequence)
    fn set_links(&mut self, links: &[Link]);
    fn set_camera(&mut self, pose: CameraPose);

    /// Start the ambient track. May be refused by the host until a user gesture.
    fn play_ambient_audio(&mut self) -> Result<()>;
    fn stop_ambient_audio(&mut self);
    fn set_audio_volume(&mut self, volume: f32);
    /// Stereo pan in [-1, 1]; hosts without a panner ignore it
    fn set_audio_pan(&mut self, _pan: f32) {}

    fn show_message(&mut self, text: &str, opacity: f32);
    fn hide_message(&mut self);

    /// Called once per tick after every other update
    fn render_frame(&mut self);
}

/// React to drained simulation events (logging + level reloads)
pub fn handle_events(events: &[GameEvent], state: &GameState, stage: &mut impl Stage) {
    for event in events {
        match event {
            GameEvent::LevelLoaded { index } => {
                log::debug!("Presenting level {}", index);
                stage.load_targets(&state.star_positions());
            }
            GameEvent::TargetRevealed { id } => log::trace!("Star {} revealed", id),
            GameEvent::TargetLost { id } => log::trace!("Star {} lost", id),
            GameEvent::TargetCaptured { .. } => {}
            GameEvent::RoundEnding => log::info!("End state reached"),
            GameEvent::CelebrationFinished => log::info!("Constellation drawn"),
            GameEvent::RoundReset { level } => log::info!("New round on level {}", level),
            GameEvent::IntroDismissed => log::debug!("Intro text deactivated"),
        }
    }
}

/// Push the current simulation state through the stage and render
pub fn present(state: &GameState, settings: &Settings, stage: &mut impl Stage) {
    let tuning = &state.tuning;

    stage.set_ball(state.ball.pos, state.ball.rotation);
    stage.set_ball_glow(
        state.feedback.brightness,
        state.feedback.light_intensity(tuning),
    );
    for target in &state.tracker.targets {
        stage.set_target_visual(target.id, TargetVisual::for_state(target.state));
    }
    stage.set_links(state.round.links());
    stage.set_camera(state.camera);

    stage.set_audio_volume((state.feedback.volume * settings.master_volume).clamp(0.0, 1.0));
    if settings.panning {
        stage.set_audio_pan(state.feedback.pan);
    }

    match state.intro.text() {
        Some(text) => stage.show_message(text, state.intro.opacity()),
        None => stage.hide_message(),
    }

    stage.render_frame();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LevelSelection;
    use crate::sim::{TickInput, tick};
    use crate::tuning::Tuning;

    #[test]
    fn test_visual_for_state() {
        assert_eq!(TargetVisual::for_state(TargetState::Idle).opacity, 0.0);
        assert_eq!(TargetVisual::for_state(TargetState::Revealed).opacity, 0.5);
        assert_eq!(TargetVisual::for_state(TargetState::Captured).light_intensity, 50.0);
    }

    #[test]
    fn test_present_drives_every_capability() {
        let mut state = GameState::new(3, Tuning::default(), LevelSelection::Fixed(3));
        let mut stage = RecordingStage::new();
        let events = state.drain_events();
        handle_events(&events, &state, &mut stage);
        assert_eq!(stage.targets.len(), 4);

        tick(&mut state, &TickInput::default());
        present(&state, &Settings::default(), &mut stage);

        assert_eq!(stage.frames, 1);
        assert_eq!(stage.ball_position, state.ball.pos);
        assert_eq!(stage.message.as_deref(), Some("Connect the Stars"));
        assert!(stage.pan.is_some());
        assert!(stage.volume > 0.0 && stage.volume <= 1.0);
    }

    #[test]
    fn test_panning_disabled_leaves_pan_alone() {
        let mut state = GameState::new(3, Tuning::default(), LevelSelection::Fixed(0));
        let mut stage = RecordingStage::new();
        let settings = Settings {
            panning: false,
            ..Default::default()
        };
        tick(&mut state, &TickInput::default());
        present(&state, &settings, &mut stage);
        assert_eq!(stage.pan, None);
    }
}
