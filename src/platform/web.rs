//! Browser stage: WebGPU scene, DOM overlay message, WebAudio ambient track

use glam::{Vec2, Vec3};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use super::{Stage, TargetVisual};
use crate::audio::AudioManager;
use crate::error::Result;
use crate::renderer::{SceneFrame, SdfRenderState};
use crate::sim::{CameraPose, Link};

/// DOM id of the intro overlay
pub const MESSAGE_ELEMENT_ID: &str = "intro-text";

pub struct WebStage {
    pub scene: SceneFrame,
    pub render_state: Option<SdfRenderState>,
    audio: AudioManager,
    message: Option<HtmlElement>,
    shown_text: Option<String>,
    time_ms: f64,
}

impl WebStage {
    pub fn new() -> Self {
        let message = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(MESSAGE_ELEMENT_ID))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if message.is_none() {
            log::warn!("No #{} element - intro text disabled", MESSAGE_ELEMENT_ID);
        }

        Self {
            scene: SceneFrame::new(),
            render_state: None,
            audio: AudioManager::new(),
            message,
            shown_text: None,
            time_ms: 0.0,
        }
    }

    /// Host clock for the next `render_frame`
    pub fn set_time(&mut self, time_ms: f64) {
        self.time_ms = time_ms;
    }

    pub fn audio_playing(&self) -> bool {
        self.audio.is_playing()
    }
}

impl Default for WebStage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for WebStage {
    fn load_targets(&mut self, positions: &[Vec3]) {
        self.scene.load_targets(positions);
    }

    fn set_ball(&mut self, position: Vec3, rotation: Vec2) {
        self.scene.ball.position = position;
        self.scene.ball.rotation = rotation;
    }

    fn set_ball_glow(&mut self, emissive_intensity: f32, light_intensity: f32) {
        self.scene.ball.emissive_intensity = emissive_intensity;
        self.scene.ball.light_intensity = light_intensity;
    }

    fn set_target_visual(&mut self, id: usize, visual: TargetVisual) {
        self.scene.set_target_visual(id, visual);
    }

    fn set_links(&mut self, links: &[Link]) {
        self.scene.links.clear();
        self.scene.links.extend_from_slice(links);
    }

    fn set_camera(&mut self, pose: CameraPose) {
        self.scene.camera = pose;
    }

    fn play_ambient_audio(&mut self) -> Result<()> {
        self.audio.start()
    }

    fn stop_ambient_audio(&mut self) {
        self.audio.stop();
    }

    fn set_audio_volume(&mut self, volume: f32) {
        self.audio.set_volume(volume);
    }

    fn set_audio_pan(&mut self, pan: f32) {
        self.audio.set_pan(pan);
    }

    fn show_message(&mut self, text: &str, opacity: f32) {
        let Some(el) = &self.message else { return };
        if self.shown_text.as_deref() != Some(text) {
            el.set_text_content(Some(text));
            self.shown_text = Some(text.to_string());
        }
        let style = el.style();
        let _ = style.set_property("display", "block");
        let _ = style.set_property("opacity", &format!("{:.3}", opacity));
    }

    fn hide_message(&mut self) {
        let Some(el) = &self.message else { return };
        if self.shown_text.take().is_some() {
            let _ = el.style().set_property("display", "none");
        }
    }

    fn render_frame(&mut self) {
        if let Some(ref mut render_state) = self.render_state {
            match render_state.render(&self.scene, self.time_ms) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }
    }
}
