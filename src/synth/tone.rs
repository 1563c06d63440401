//! Tone synthesizer: one enveloped oscillator per call.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::context::DeviceContext;
use crate::dsp::envelope::Envelope;
use crate::dsp::oscillator::Waveform;
use crate::dsp::param::Automation;
use crate::dsp::voice::{Voice, VoiceTag};

/// Extra time a tone's oscillator runs past its envelope, so the release
/// is never cut off.
pub const TAIL: f64 = 0.02;

/// A one-shot tone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneSpec {
    /// Pitch in Hz.
    pub frequency: f64,
    /// Envelope length in seconds.
    pub duration: f64,
    pub waveform: Waveform,
    pub peak_gain: f64,
    /// Seconds after "now" the tone starts.
    pub start_delay: f64,
}

impl ToneSpec {
    /// True when every field is a finite number.
    pub fn is_finite(&self) -> bool {
        [self.frequency, self.duration, self.peak_gain, self.start_delay]
            .iter()
            .all(|v| v.is_finite())
    }

    pub const fn new(
        frequency: f64,
        waveform: Waveform,
        duration: f64,
        peak_gain: f64,
        start_delay: f64,
    ) -> Self {
        ToneSpec {
            frequency,
            duration,
            waveform,
            peak_gain,
            start_delay,
        }
    }
}

/// Build the voice for `spec` with `now` as the reference time.
///
/// If the envelope cannot be scheduled the tone still plays, at a flat
/// `peak_gain`. A spec with a non-finite field yields no voice.
pub fn tone_voice(spec: &ToneSpec, now: f64, sample_rate: f64) -> Option<Voice> {
    if !spec.is_finite() {
        debug!(target: "audio::tone", "dropping non-finite tone {spec:?}");
        return None;
    }
    let t0 = now + spec.start_delay;

    let mut gain = Automation::new(spec.peak_gain);
    if let Err(e) = Envelope::tone(spec.peak_gain, spec.duration).apply(&mut gain, t0) {
        debug!(target: "audio::tone", "{e}; playing {} Hz tone unshaped", spec.frequency);
        gain.clear();
    }

    let voice = Voice::oscillator(
        VoiceTag::Tone,
        spec.waveform,
        Automation::new(spec.frequency),
        sample_rate,
    )
    .with_gain(gain)
    .scheduled(t0, t0 + spec.duration + TAIL);
    Some(voice)
}

/// Schedule `spec` on the shared device. Silent no-op without audio.
pub fn play_tone(ctx: &mut DeviceContext, spec: &ToneSpec) {
    let Some(device) = ctx.acquire() else {
        return;
    };
    if let Some(voice) = tone_voice(spec, device.now(), device.sample_rate() as f64) {
        device.schedule(voice);
    }
}
