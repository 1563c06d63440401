//! Voice: one fire-and-forget node chain: source → (filter) → gain.
//!
//! A voice is fully described when it is scheduled and is never touched
//! again; the device drops it once the clock passes its stop time.

use super::filter::BiquadFilter;
use super::noise::{NoiseBuffer, NoisePlayer};
use super::oscillator::{Oscillator, Waveform};
use super::param::Automation;

/// What produced a voice. Lets tests and hosts inspect the schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceTag {
    Tone,
    Kick,
    Snare,
    Hat,
    Pluck,
}

#[derive(Debug, Clone)]
enum Source {
    Oscillator { osc: Oscillator, frequency: Automation },
    Noise(NoisePlayer),
}

#[derive(Debug, Clone)]
pub struct Voice {
    pub tag: VoiceTag,
    source: Source,
    filter: Option<BiquadFilter>,
    pub gain: Automation,
    /// Device time the voice starts sounding.
    pub start: f64,
    /// Device time after which the voice is silent and can be dropped.
    pub stop: f64,
}

impl Voice {
    /// An oscillator voice whose pitch follows `frequency`.
    pub fn oscillator(
        tag: VoiceTag,
        waveform: Waveform,
        frequency: Automation,
        sample_rate: f64,
    ) -> Self {
        Voice {
            tag,
            source: Source::Oscillator {
                osc: Oscillator::new(waveform, sample_rate),
                frequency,
            },
            filter: None,
            gain: Automation::new(1.0),
            start: 0.0,
            stop: 0.0,
        }
    }

    /// A one-shot playback of the shared noise buffer.
    pub fn noise(tag: VoiceTag, buffer: NoiseBuffer) -> Self {
        Voice {
            tag,
            source: Source::Noise(NoisePlayer::new(buffer)),
            filter: None,
            gain: Automation::new(1.0),
            start: 0.0,
            stop: 0.0,
        }
    }

    pub fn with_filter(mut self, filter: BiquadFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_gain(mut self, gain: Automation) -> Self {
        self.gain = gain;
        self
    }

    /// Sound between device times `start` and `stop`.
    pub fn scheduled(mut self, start: f64, stop: f64) -> Self {
        self.start = start;
        self.stop = stop.max(start);
        self
    }

    pub fn waveform(&self) -> Option<Waveform> {
        match &self.source {
            Source::Oscillator { osc, .. } => Some(osc.waveform),
            Source::Noise(_) => None,
        }
    }

    /// Pitch at device time `t`, for oscillator voices.
    pub fn frequency_at(&self, t: f64) -> Option<f64> {
        match &self.source {
            Source::Oscillator { frequency, .. } => Some(frequency.value_at(t)),
            Source::Noise(_) => None,
        }
    }

    /// Output at device time `t`. Sources only advance while the voice is live.
    pub fn next_sample(&mut self, t: f64) -> f64 {
        if t < self.start || t >= self.stop {
            return 0.0;
        }

        let raw = match &mut self.source {
            Source::Oscillator { osc, frequency } => osc.next_sample(frequency.value_at(t)),
            Source::Noise(player) => player.next_sample(),
        };
        let filtered = match &mut self.filter {
            Some(f) => f.process(raw),
            None => raw,
        };

        filtered * self.gain.value_at(t)
    }

    /// Has the voice finished by device time `t`?
    pub fn is_expired(&self, t: f64) -> bool {
        t >= self.stop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 44100.0;

    fn render(voice: &mut Voice, from: f64, samples: usize) -> Vec<f64> {
        (0..samples)
            .map(|i| voice.next_sample(from + i as f64 / SR))
            .collect()
    }

    #[test]
    fn silent_outside_window() {
        let mut v = Voice::oscillator(VoiceTag::Tone, Waveform::Square, Automation::new(440.0), SR)
            .scheduled(0.1, 0.2);
        let before = render(&mut v, 0.0, 4000);
        assert!(before.iter().all(|&s| s == 0.0), "voice should be silent before start");
        let during = render(&mut v, 0.1, 4000);
        assert!(during.iter().any(|s| s.abs() > 0.1), "voice should sound while live");
        let after = render(&mut v, 0.2, 4000);
        assert!(after.iter().all(|&s| s == 0.0), "voice should be silent after stop");
        assert!(v.is_expired(0.2));
        assert!(!v.is_expired(0.19));
    }

    #[test]
    fn gain_scales_output() {
        let mut v = Voice::oscillator(VoiceTag::Tone, Waveform::Sine, Automation::new(440.0), SR)
            .with_gain(Automation::new(0.05))
            .scheduled(0.0, 1.0);
        let peak = render(&mut v, 0.0, 44100)
            .iter()
            .fold(0.0_f64, |m, s| m.max(s.abs()));
        assert!((peak - 0.05).abs() < 1e-3, "peak should be ~0.05, got {peak}");
    }

    #[test]
    fn noise_voice_is_filtered_and_ends() {
        let buf = NoiseBuffer::generate(SR as u32, 9);
        let mut v = Voice::noise(VoiceTag::Hat, buf)
            .with_filter(BiquadFilter::highpass(6000.0, SR))
            .scheduled(0.0, 1.0);
        assert_eq!(v.waveform(), None);
        let out = render(&mut v, 0.0, 44100);
        assert!(out[..6000].iter().any(|s| s.abs() > 0.01));
        // Buffer is 0.15 s; the filter rings out shortly after.
        assert!(out[8000..].iter().all(|s| s.abs() < 1e-3));
    }

    #[test]
    fn stop_never_precedes_start() {
        let v = Voice::oscillator(VoiceTag::Tone, Waveform::Sine, Automation::new(440.0), SR)
            .scheduled(1.0, 0.5);
        assert_eq!(v.stop, 1.0);
    }
}
