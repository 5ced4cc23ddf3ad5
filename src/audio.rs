//! Ambient audio using the Web Audio API
//!
//! One looping music track routed element -> stereo panner -> speakers. The
//! proximity feedback drives the element volume and the panner position.

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen_futures::JsFuture;
use web_sys::{AudioContext, HtmlAudioElement, MediaElementAudioSourceNode, StereoPannerNode};

use crate::error::{Error, Result};

/// Background music, relative to the page
pub const AMBIENT_TRACK: &str = "./audio/bard.bgm.1hr.mp3";

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    element: Option<HtmlAudioElement>,
    panner: Option<StereoPannerNode>,
    // Kept alive so the graph is not collected
    _source: Option<MediaElementAudioSourceNode>,
    playing: Rc<Cell<bool>>,
    pending: Rc<Cell<bool>>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }

        let element = HtmlAudioElement::new_with_src(AMBIENT_TRACK).ok();
        if let Some(el) = &element {
            el.set_loop(true);
        }

        let (source, panner) = match (&ctx, &element) {
            (Some(ctx), Some(el)) => Self::build_graph(ctx, el),
            _ => (None, None),
        };

        Self {
            ctx,
            element,
            panner,
            _source: source,
            playing: Rc::new(Cell::new(false)),
            pending: Rc::new(Cell::new(false)),
        }
    }

    fn build_graph(
        ctx: &AudioContext,
        element: &HtmlAudioElement,
    ) -> (Option<MediaElementAudioSourceNode>, Option<StereoPannerNode>) {
        let Ok(source) = ctx.create_media_element_source(element) else {
            log::warn!("Failed to create media element source");
            return (None, None);
        };
        let panner = ctx.create_stereo_panner().ok();
        let routed = match &panner {
            Some(p) => source
                .connect_with_audio_node(p)
                .and_then(|_| p.connect_with_audio_node(&ctx.destination()))
                .is_ok(),
            // No panner support: straight to the speakers
            None => source.connect_with_audio_node(&ctx.destination()).is_ok(),
        };
        if !routed {
            log::warn!("Failed to connect audio graph");
        }
        (Some(source), panner)
    }

    pub fn is_playing(&self) -> bool {
        self.playing.get()
    }

    /// Resume the context and start the track. Must run inside a user gesture;
    /// a refusal is logged and the next gesture tries again.
    pub fn start(&self) -> Result<()> {
        if self.playing.get() || self.pending.get() {
            return Ok(());
        }
        let (Some(ctx), Some(element)) = (&self.ctx, &self.element) else {
            return Err(Error::AudioUnavailable);
        };

        let _ = ctx.resume();
        let promise = element
            .play()
            .map_err(|e| Error::AudioRefused(format!("{:?}", e)))?;

        self.pending.set(true);
        let playing = self.playing.clone();
        let pending = self.pending.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => {
                    log::info!("Background music is playing");
                    playing.set(true);
                }
                Err(err) => {
                    log::error!("Error playing background music: {:?}", err);
                    playing.set(false);
                }
            }
            pending.set(false);
        });
        Ok(())
    }

    pub fn stop(&self) {
        if let Some(element) = &self.element {
            let _ = element.pause();
        }
        self.playing.set(false);
    }

    /// Element volume (0.0 - 1.0)
    pub fn set_volume(&self, volume: f32) {
        if let Some(element) = &self.element {
            element.set_volume(volume.clamp(0.0, 1.0) as f64);
        }
    }

    /// Stereo position (-1.0 left - 1.0 right)
    pub fn set_pan(&self, pan: f32) {
        if let Some(panner) = &self.panner {
            panner.pan().set_value(pan.clamp(-1.0, 1.0));
        }
    }
}
