//! Error types for the audio engine.
//!
//! None of these ever reach the playback surface: `SoundEngine` and the
//! synthesizers absorb them and log. They are returned from configuration
//! parsing and from the internal seams (output backend, parameter automation).

/// Errors raised inside the engine.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// No audio output is available in this environment.
    #[error("Audio output unsupported: {0}")]
    Unsupported(String),

    /// Waking a suspended output endpoint failed.
    #[error("Failed to resume audio output: {0}")]
    Resume(String),

    /// An exponential ramp was given a target it cannot reach.
    #[error("Invalid exponential ramp to {value} at t={time}s")]
    InvalidRamp { value: f64, time: f64 },

    /// Tempo must be finite and positive.
    #[error("Invalid tempo: {0} BPM")]
    InvalidTempo(f64),

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Configuration JSON could not be decoded.
    #[error("Config parse error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Json(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
