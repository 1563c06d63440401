//! SoundEngine: the surface the host application talks to.
//!
//! Owns the device context, the backing-track sequencer and the host clock.
//! No method returns an error: unsupported audio, failed resumes and bad
//! envelopes all degrade to quieter output.

use std::time::Duration;

use crate::clock::{Clock, ManualClock};
use crate::config::EngineConfig;
use crate::context::DeviceContext;
use crate::dsp::device::{DeviceState, OutputBackend, SoftwareOutput};
use crate::sequencer::Sequencer;
use crate::sfx::{self, Cue};

pub struct SoundEngine<C: Clock> {
    context: DeviceContext,
    sequencer: Sequencer,
    clock: C,
}

impl SoundEngine<ManualClock> {
    /// Engine whose host time is pushed in by the caller.
    pub fn manual(config: &EngineConfig, clock: ManualClock) -> Self {
        Self::with_backend(config, Box::new(SoftwareOutput::from_config(config)), clock)
    }
}

impl<C: Clock> SoundEngine<C> {
    pub fn with_backend(config: &EngineConfig, backend: Box<dyn OutputBackend>, clock: C) -> Self {
        SoundEngine {
            context: DeviceContext::new(backend, config.master_gain, config.noise_seed),
            sequencer: Sequencer::new(config.tempo_bpm),
            clock,
        }
    }

    // --- sound effects ---

    pub fn play(&mut self, cue: Cue) {
        sfx::play(&mut self.context, cue);
    }

    pub fn success(&mut self) {
        sfx::success(&mut self.context);
    }

    pub fn error(&mut self) {
        sfx::error(&mut self.context);
    }

    pub fn party(&mut self) {
        sfx::party(&mut self.context);
    }

    /// Open/resume the device without playing anything.
    pub fn ensure(&mut self) {
        sfx::ensure(&mut self.context);
    }

    // --- backing track ---

    pub fn start(&mut self) {
        let now = self.clock.now();
        self.sequencer.start(&mut self.context, now);
    }

    pub fn stop(&mut self) {
        self.sequencer.stop();
    }

    pub fn toggle(&mut self) {
        let now = self.clock.now();
        self.sequencer.toggle(&mut self.context, now);
    }

    pub fn ensure_start(&mut self) {
        let now = self.clock.now();
        self.sequencer.ensure_start(&mut self.context, now);
    }

    pub fn set_tempo(&mut self, bpm: f64) {
        let now = self.clock.now();
        self.sequencer.set_tempo(&mut self.context, bpm, now);
    }

    pub fn is_playing(&self) -> bool {
        self.sequencer.is_playing()
    }

    pub fn tempo(&self) -> f64 {
        self.sequencer.tempo()
    }

    pub fn tick_interval(&self) -> Duration {
        self.sequencer.tick_interval()
    }

    pub fn step_cursor(&self) -> u64 {
        self.sequencer.step_cursor()
    }

    /// Host timer hook: fire the sequencer if a tick is due.
    pub fn poll(&mut self) -> bool {
        let now = self.clock.now();
        self.sequencer.poll(&mut self.context, now)
    }

    // --- output ---

    /// Pull the next block of mono samples from the device.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        self.context.render(frames)
    }

    pub fn device_state(&self) -> DeviceState {
        self.context.state()
    }

    pub fn context(&self) -> &DeviceContext {
        &self.context
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
