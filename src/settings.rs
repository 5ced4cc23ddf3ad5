//! Player settings and preferences
//!
//! Persisted in LocalStorage on the web, defaults everywhere else.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// How the level for each round is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LevelSelection {
    /// Seeded random pick, re-rolled every round
    #[default]
    Random,
    /// Always the same catalog entry (wraps if out of range)
    Fixed(usize),
    /// Walk the catalog in order, one level per round
    Cycle,
}

impl LevelSelection {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "random" => Some(LevelSelection::Random),
            "cycle" => Some(LevelSelection::Cycle),
            other => other.parse().ok().map(LevelSelection::Fixed),
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Level selection policy
    pub level: LevelSelection,
    /// Pan the ambient track toward the nearest target
    pub panning: bool,
    /// Master volume (0.0 - 1.0), multiplied into the proximity volume
    pub master_volume: f32,
    /// Fixed RNG seed (None = seeded from the clock at startup)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: LevelSelection::Random,
            panning: true,
            master_volume: 1.0,
            seed: None,
        }
    }
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "star_seeker_settings";

    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Self = serde_json::from_str(json).map_err(Error::InvalidSettings)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.to_json());
            log::info!("Settings saved");
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
