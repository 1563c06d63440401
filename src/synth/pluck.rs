//! Melodic synthesizer: short triangle plucks over a fixed arpeggio.

use log::debug;

use crate::dsp::device::AudioDevice;
use crate::dsp::envelope::Envelope;
use crate::dsp::oscillator::Waveform;
use crate::dsp::param::Automation;
use crate::dsp::voice::{Voice, VoiceTag};

/// Root pitch of the scale (A4).
pub const ROOT_HZ: f64 = 440.0;

const ARPEGGIO: [i32; 8] = [0, 4, 7, 12, 7, 4, 0, 4];

/// Semitone offsets above a root, read cyclically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTable {
    pub root: f64,
    offsets: [i32; 8],
}

impl Default for ScaleTable {
    fn default() -> Self {
        ScaleTable {
            root: ROOT_HZ,
            offsets: ARPEGGIO,
        }
    }
}

impl ScaleTable {
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Offset at `index`, wrapping around the table.
    pub fn offset(&self, index: usize) -> i32 {
        self.offsets[index % self.offsets.len()]
    }

    pub fn frequency(&self, index: usize) -> f64 {
        offset_to_frequency(self.root, self.offset(index))
    }
}

/// `root · 2^(semitones / 12)`
pub fn offset_to_frequency(root: f64, semitones: i32) -> f64 {
    root * (2.0_f64).powf(semitones as f64 / 12.0)
}

pub fn pluck_voice(t: f64, frequency: f64, sample_rate: f64) -> Voice {
    let envelope = Envelope::hit(0.2, 0.01, 0.12);
    let mut gain = Automation::new(envelope.peak);
    if let Err(e) = envelope.apply(&mut gain, t) {
        debug!(target: "audio::tone", "pluck envelope dropped: {e}");
        gain.clear();
    }

    Voice::oscillator(
        VoiceTag::Pluck,
        Waveform::Triangle,
        Automation::new(frequency),
        sample_rate,
    )
    .with_gain(gain)
    .scheduled(t, t + 0.14)
}

/// Schedule a pluck at absolute device time `t`.
pub fn pluck(device: &mut AudioDevice, t: f64, frequency: f64) {
    let voice = pluck_voice(t, frequency, device.sample_rate() as f64);
    device.schedule(voice);
}
