//! Headless stage that records the last value pushed through every capability.
//!
//! Used by the native demo binary and by tests.

use glam::{Vec2, Vec3};

use super::{Stage, TargetVisual};
use crate::error::{Error, Result};
use crate::sim::{CameraPose, Link};

#[derive(Debug, Clone)]
pub struct RecordingStage {
    pub targets: Vec<(Vec3, TargetVisual)>,
    pub ball_position: Vec3,
    pub ball_rotation: Vec2,
    pub ball_glow: (f32, f32),
    pub links: Vec<Link>,
    pub camera: CameraPose,
    pub volume: f32,
    pub pan: Option<f32>,
    pub message: Option<String>,
    pub message_opacity: f32,
    pub audio_playing: bool,
    /// Simulate a host that refuses audio playback
    pub refuse_audio: bool,
    pub frames: u64,
}

impl Default for RecordingStage {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingStage {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            ball_position: Vec3::ZERO,
            ball_rotation: Vec2::ZERO,
            ball_glow: (0.0, 0.0),
            links: Vec::new(),
            camera: CameraPose::start(),
            volume: 0.0,
            pan: None,
            message: None,
            message_opacity: 0.0,
            audio_playing: false,
            refuse_audio: false,
            frames: 0,
        }
    }

    /// Number of targets currently presented as lit
    pub fn lit_count(&self) -> usize {
        self.targets
            .iter()
            .filter(|(_, visual)| *visual == TargetVisual::LIT)
            .count()
    }
}

impl Stage for RecordingStage {
    fn load_targets(&mut self, positions: &[Vec3]) {
        self.targets = positions
            .iter()
            .map(|&p| (p, TargetVisual::HIDDEN))
            .collect();
    }

    fn set_ball(&mut self, position: Vec3, rotation: Vec2) {
        self.ball_position = position;
        self.ball_rotation = rotation;
    }

    fn set_ball_glow(&mut self, emissive_intensity: f32, light_intensity: f32) {
        self.ball_glow = (emissive_intensity, light_intensity);
    }

    fn set_target_visual(&mut self, id: usize, visual: TargetVisual) {
        if let Some(entry) = self.targets.get_mut(id) {
            entry.1 = visual;
        }
    }

    fn set_links(&mut self, links: &[Link]) {
        self.links.clear();
        self.links.extend_from_slice(links);
    }

    fn set_camera(&mut self, pose: CameraPose) {
        self.camera = pose;
    }

    fn play_ambient_audio(&mut self) -> Result<()> {
        if self.refuse_audio {
            return Err(Error::AudioRefused("autoplay blocked".into()));
        }
        self.audio_playing = true;
        Ok(())
    }

    fn stop_ambient_audio(&mut self) {
        self.audio_playing = false;
    }

    fn set_audio_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_audio_pan(&mut self, pan: f32) {
        self.pan = Some(pan);
    }

    fn show_message(&mut self, text: &str, opacity: f32) {
        if self.message.as_deref() != Some(text) {
            self.message = Some(text.to_string());
        }
        self.message_opacity = opacity;
    }

    fn hide_message(&mut self) {
        self.message = None;
        self.message_opacity = 0.0;
    }

    fn render_frame(&mut self) {
        self.frames += 1;
    }
}
