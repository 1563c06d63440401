//! Device context: lazy, process-lifetime ownership of the audio device.
//!
//! Every synthesizer and the sequencer reach the device through
//! [`DeviceContext::acquire`]. The first call opens the backend; an
//! unsupported environment is remembered and every later call returns
//! `None`, so all playback degrades to a silent no-op.

use log::{debug, warn};

use crate::config::EngineConfig;
use crate::dsp::device::{AudioDevice, DeviceState, OutputBackend, SoftwareOutput};
use crate::dsp::noise::NoiseBuffer;

pub struct DeviceContext {
    backend: Box<dyn OutputBackend>,
    device: Option<AudioDevice>,
    unsupported: bool,
    master_gain: f64,
    noise_seed: u64,
}

impl DeviceContext {
    pub fn new(backend: Box<dyn OutputBackend>, master_gain: f64, noise_seed: u64) -> Self {
        DeviceContext {
            backend,
            device: None,
            unsupported: false,
            master_gain,
            noise_seed,
        }
    }

    /// Context over a [`SoftwareOutput`] built from `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            Box::new(SoftwareOutput::from_config(config)),
            config.master_gain,
            config.noise_seed,
        )
    }

    /// The shared device, opened on first use and resumed if suspended.
    ///
    /// Returns `None` when audio is unsupported. Resume failures are logged
    /// and the (still suspended) device is returned.
    pub fn acquire(&mut self) -> Option<&mut AudioDevice> {
        if self.unsupported {
            return None;
        }

        if self.device.is_none() {
            match self.backend.open() {
                Ok(output) => {
                    debug!(
                        target: "audio::device",
                        "opened output at {} Hz (suspended: {})",
                        output.sample_rate,
                        output.start_suspended
                    );
                    self.device = Some(AudioDevice::new(output, self.master_gain, self.noise_seed));
                }
                Err(e) => {
                    warn!(target: "audio::device", "audio disabled: {e}");
                    self.unsupported = true;
                    return None;
                }
            }
        }

        let device = self.device.as_mut()?;
        if device.state() == DeviceState::Suspended {
            match self.backend.resume() {
                Ok(()) => device.mark_running(),
                Err(e) => warn!(target: "audio::device", "resume failed, staying muted: {e}"),
            }
        }
        Some(device)
    }

    /// The shared noise buffer, built the first time it is asked for.
    pub fn noise_buffer(&mut self) -> Option<NoiseBuffer> {
        self.acquire().map(AudioDevice::noise_buffer)
    }

    pub fn state(&self) -> DeviceState {
        self.device
            .as_ref()
            .map_or(DeviceState::Uninitialized, AudioDevice::state)
    }

    pub fn is_unsupported(&self) -> bool {
        self.unsupported
    }

    /// The device if it has been opened, without opening or resuming it.
    pub fn device(&self) -> Option<&AudioDevice> {
        self.device.as_ref()
    }

    /// Pull the next block from the device; silence if it was never opened.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        match self.device.as_mut() {
            Some(device) => device.render(frames),
            None => vec![0.0; frames],
        }
    }
}
