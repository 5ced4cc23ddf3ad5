//! Error types
//!
//! Nothing in the simulation is fatal; these only surface from configuration
//! loading and from host capabilities (audio) that the browser may refuse.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid tuning: {0}")]
    InvalidTuning(#[source] serde_json::Error),

    #[error("invalid settings: {0}")]
    InvalidSettings(#[source] serde_json::Error),

    #[error("audio context unavailable")]
    AudioUnavailable,

    #[error("audio playback refused: {0}")]
    AudioRefused(String),
}

pub type Result<T> = std::result::Result<T, Error>;
