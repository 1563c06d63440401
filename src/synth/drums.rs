//! Percussion synthesizer: kick, snare and hi-hat recipes.
//!
//! The kick is a sine with an exponential pitch drop; snare and hat are
//! bursts of the device's shared noise buffer through a highpass. Each hit is
//! scheduled independently at an absolute device time and overlapping hits
//! simply add.

use log::debug;

use crate::dsp::device::AudioDevice;
use crate::dsp::envelope::Envelope;
use crate::dsp::filter::BiquadFilter;
use crate::dsp::oscillator::Waveform;
use crate::dsp::param::Automation;
use crate::dsp::voice::{Voice, VoiceTag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrumHit {
    Kick,
    Snare,
    Hat,
}

impl DrumHit {
    /// Gain envelope of the hit.
    pub fn envelope(self) -> Envelope {
        match self {
            DrumHit::Kick => Envelope::hit(0.5, 0.005, 0.15),
            DrumHit::Snare => Envelope::hit(0.25, 0.01, 0.08),
            DrumHit::Hat => Envelope::hit(0.12, 0.005, 0.03),
        }
    }

    /// How long the hit's source runs, in seconds.
    pub fn lifetime(self) -> f64 {
        match self {
            DrumHit::Kick => 0.2,
            DrumHit::Snare => 0.08,
            DrumHit::Hat => 0.04,
        }
    }

    /// Highpass cutoff for the noise-based hits.
    pub fn cutoff(self) -> Option<f64> {
        match self {
            DrumHit::Kick => None,
            DrumHit::Snare => Some(1800.0),
            DrumHit::Hat => Some(6000.0),
        }
    }

    fn tag(self) -> VoiceTag {
        match self {
            DrumHit::Kick => VoiceTag::Kick,
            DrumHit::Snare => VoiceTag::Snare,
            DrumHit::Hat => VoiceTag::Hat,
        }
    }

    /// Build the hit's voice starting at device time `t`.
    pub fn voice(self, device: &mut AudioDevice, t: f64) -> Voice {
        let sample_rate = device.sample_rate() as f64;
        let voice = match self.cutoff() {
            None => Voice::oscillator(self.tag(), Waveform::Sine, kick_sweep(t), sample_rate),
            Some(cutoff) => Voice::noise(self.tag(), device.noise_buffer())
                .with_filter(BiquadFilter::highpass(cutoff, sample_rate)),
        };

        let envelope = self.envelope();
        let mut gain = Automation::new(envelope.peak);
        if let Err(e) = envelope.apply(&mut gain, t) {
            debug!(target: "audio::tone", "{self:?} envelope dropped: {e}");
            gain.clear();
        }

        voice.with_gain(gain).scheduled(t, t + self.lifetime())
    }

    /// Schedule the hit on `device` at absolute time `t`.
    pub fn play(self, device: &mut AudioDevice, t: f64) {
        let voice = self.voice(device, t);
        device.schedule(voice);
    }
}

/// 140 Hz falling to 50 Hz over 120 ms.
fn kick_sweep(t: f64) -> Automation {
    let mut frequency = Automation::new(140.0);
    let swept = frequency
        .set_value_at_time(140.0, t)
        .and_then(|()| frequency.exponential_ramp_to_value_at_time(50.0, t + 0.12));
    if let Err(e) = swept {
        debug!(target: "audio::tone", "kick sweep dropped: {e}");
        frequency.clear();
    }
    frequency
}

pub fn kick(device: &mut AudioDevice, t: f64) {
    DrumHit::Kick.play(device, t);
}

pub fn snare(device: &mut AudioDevice, t: f64) {
    DrumHit::Snare.play(device, t);
}

pub fn hat(device: &mut AudioDevice, t: f64) {
    DrumHit::Hat.play(device, t);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::device::OutputConfig;
    use approx::assert_relative_eq;

    fn device() -> AudioDevice {
        AudioDevice::new(
            OutputConfig {
                sample_rate: 44100,
                start_suspended: false,
            },
            1.0,
            11,
        )
    }

    #[test]
    fn kick_sweeps_pitch_down() {
        let mut dev = device();
        let v = DrumHit::Kick.voice(&mut dev, 1.0);
        assert_eq!(v.waveform(), Some(Waveform::Sine));
        assert_relative_eq!(v.frequency_at(1.0).unwrap(), 140.0);
        assert_relative_eq!(v.frequency_at(1.12).unwrap(), 50.0, epsilon = 1e-9);
        assert_relative_eq!(v.frequency_at(1.18).unwrap(), 50.0, epsilon = 1e-9);
        assert_relative_eq!(v.stop, 1.2, epsilon = 1e-12);
        assert!(!dev.has_noise_buffer(), "kick should not touch the noise buffer");
    }

    #[test]
    fn kick_envelope() {
        let mut dev = device();
        let v = DrumHit::Kick.voice(&mut dev, 0.0);
        assert_relative_eq!(v.gain.value_at(0.0), 0.001);
        assert_relative_eq!(v.gain.value_at(0.005), 0.5);
        assert_relative_eq!(v.gain.value_at(0.15), 0.001);
    }

    #[test]
    fn noise_hits_share_buffer_and_lifetimes() {
        let mut dev = device();
        let snare = DrumHit::Snare.voice(&mut dev, 0.5);
        let hat = DrumHit::Hat.voice(&mut dev, 0.5);
        assert!(dev.has_noise_buffer());
        assert_eq!(snare.waveform(), None);
        assert_relative_eq!(snare.stop - snare.start, 0.08, epsilon = 1e-12);
        assert_relative_eq!(hat.stop - hat.start, 0.04, epsilon = 1e-12);
        assert_relative_eq!(snare.gain.value_at(0.51), 0.25, epsilon = 1e-12);
        assert_relative_eq!(hat.gain.value_at(0.505), 0.12, epsilon = 1e-12);
    }

    #[test]
    fn overlapping_hits_layer() {
        let mut dev = device();
        kick(&mut dev, 0.0);
        snare(&mut dev, 0.0);
        hat(&mut dev, 0.0);
        let tags: Vec<_> = dev.voices().iter().map(|v| v.tag).collect();
        assert_eq!(tags, vec![VoiceTag::Kick, VoiceTag::Snare, VoiceTag::Hat]);

        let out = dev.render(4410);
        assert!(out.iter().any(|s| s.abs() > 0.05), "hits should be audible");
        dev.render(44100);
        assert!(dev.voices().is_empty(), "all hits self-release");
    }

    #[test]
    fn hat_is_brighter_than_kick() {
        let zero_crossings = |out: &[f32]| out.windows(2).filter(|w| (w[0] < 0.0) != (w[1] < 0.0)).count();

        let mut dev = device();
        hat(&mut dev, 0.0);
        let hat_out = dev.render(1764);

        let mut dev = device();
        kick(&mut dev, 0.0);
        let kick_out = dev.render(1764);

        assert!(zero_crossings(&hat_out[..]) > 10 * zero_crossings(&kick_out[..]).max(1));
    }
}
