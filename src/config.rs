//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::sequencer::tick_interval;

/// Tempo the backing track starts at.
pub const DEFAULT_TEMPO_BPM: f64 = 145.0;
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub const DEFAULT_NOISE_SEED: u64 = 0x5EED_CAFE_F00D_0001;

/// Construction-time settings. Every field is optional in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Initial backing-track tempo.
    pub tempo_bpm: f64,
    /// Sample rate of the software output endpoint.
    pub sample_rate: u32,
    /// Gain applied to the final mix before soft clipping.
    pub master_gain: f64,
    /// Seed for the percussion noise buffer.
    pub noise_seed: u64,
    /// Open the output suspended, as browsers do before a user gesture.
    pub start_suspended: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tempo_bpm: DEFAULT_TEMPO_BPM,
            sample_rate: DEFAULT_SAMPLE_RATE,
            master_gain: 1.0,
            noise_seed: DEFAULT_NOISE_SEED,
            start_suspended: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if tick_interval(self.tempo_bpm).is_none() {
            return Err(EngineError::InvalidTempo(self.tempo_bpm));
        }
        if !(8_000..=192_000).contains(&self.sample_rate) {
            return Err(EngineError::Config(format!(
                "sampleRate {} outside 8000..=192000",
                self.sample_rate
            )));
        }
        if !self.master_gain.is_finite() || self.master_gain < 0.0 {
            return Err(EngineError::Config(format!(
                "masterGain {} must be finite and >= 0",
                self.master_gain
            )));
        }
        Ok(())
    }
}
