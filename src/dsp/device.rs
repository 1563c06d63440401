//! Audio device: the single output endpoint, its clock, and the arena of
//! scheduled voices.
//!
//! The device is pull-rendered: the host (an AudioWorklet, a sound card
//! callback, or the offline renderer) calls [`AudioDevice::render`] for each
//! block. The device clock only advances while the device is running.

use log::debug;

use super::mixer::Mixer;
use super::noise::NoiseBuffer;
use super::voice::Voice;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

/// Parameters reported by a backend when its endpoint is opened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputConfig {
    pub sample_rate: u32,
    /// Endpoint opens suspended and needs a resume before the clock runs.
    pub start_suspended: bool,
}

/// The platform audio endpoint.
pub trait OutputBackend {
    /// Open the endpoint. Failing here marks the environment unsupported.
    fn open(&mut self) -> Result<OutputConfig>;

    /// Wake a suspended endpoint.
    fn resume(&mut self) -> Result<()>;
}

/// Software endpoint rendered on demand by the host.
#[derive(Debug, Clone)]
pub struct SoftwareOutput {
    sample_rate: u32,
    start_suspended: bool,
}

impl SoftwareOutput {
    pub fn new(sample_rate: u32, start_suspended: bool) -> Self {
        SoftwareOutput {
            sample_rate,
            start_suspended,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.sample_rate, config.start_suspended)
    }
}

impl OutputBackend for SoftwareOutput {
    fn open(&mut self) -> Result<OutputConfig> {
        Ok(OutputConfig {
            sample_rate: self.sample_rate,
            start_suspended: self.start_suspended,
        })
    }

    fn resume(&mut self) -> Result<()> {
        Ok(())
    }
}

/// An environment without audio output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOutput;

impl OutputBackend for NoOutput {
    fn open(&mut self) -> Result<OutputConfig> {
        Err(EngineError::Unsupported("no audio output available".into()))
    }

    fn resume(&mut self) -> Result<()> {
        Err(EngineError::Unsupported("no audio output available".into()))
    }
}

/// Lifecycle of the output device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Uninitialized,
    Suspended,
    Running,
}

pub struct AudioDevice {
    state: DeviceState,
    sample_rate: u32,
    /// Frames rendered while running; the device clock.
    frames: u64,
    voices: Vec<Voice>,
    noise: Option<NoiseBuffer>,
    noise_seed: u64,
    mixer: Mixer,
}

impl AudioDevice {
    pub fn new(output: OutputConfig, master_gain: f64, noise_seed: u64) -> Self {
        AudioDevice {
            state: if output.start_suspended {
                DeviceState::Suspended
            } else {
                DeviceState::Running
            },
            sample_rate: output.sample_rate,
            frames: 0,
            voices: Vec::new(),
            noise: None,
            noise_seed,
            mixer: Mixer::new(master_gain),
        }
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Current device time in seconds.
    pub fn now(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }

    pub(crate) fn mark_running(&mut self) {
        if self.state != DeviceState::Running {
            debug!(target: "audio::device", "device running at t={:.3}s", self.now());
            self.state = DeviceState::Running;
        }
    }

    /// The shared noise buffer, built on first request.
    pub fn noise_buffer(&mut self) -> NoiseBuffer {
        let (sample_rate, seed) = (self.sample_rate, self.noise_seed);
        self.noise
            .get_or_insert_with(|| {
                debug!(target: "audio::device", "building noise buffer at {sample_rate} Hz");
                NoiseBuffer::generate(sample_rate, seed)
            })
            .clone()
    }

    pub fn has_noise_buffer(&self) -> bool {
        self.noise.is_some()
    }

    /// Hand a voice to the device. It plays and expires on its own.
    pub fn schedule(&mut self, voice: Voice) {
        if voice.is_expired(self.now()) {
            debug!(target: "audio::device", "dropping {:?} voice that ended before now", voice.tag);
            return;
        }
        self.voices.push(voice);
    }

    /// Voices that have not yet expired.
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Render the next `frames` mono samples.
    ///
    /// A suspended device returns silence without advancing its clock.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        if self.state != DeviceState::Running {
            return vec![0.0; frames];
        }

        let start = self.now();
        let sample_rate = self.sample_rate as f64;
        self.mixer.mix(&mut self.voices, start, frames, sample_rate);
        self.frames += frames as u64;

        let now = self.now();
        self.voices.retain(|v| !v.is_expired(now));

        self.mixer.output()
    }
}
