//! Sound effects: fixed micro-scores of layered tones.
//!
//! Each cue is fire-and-forget: the tones are scheduled relative to the
//! device clock when the cue is triggered and nothing is kept afterwards.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::DeviceContext;
use crate::dsp::oscillator::Waveform;
use crate::synth::tone::{play_tone, ToneSpec};

/// Rising three-note chime for a correct answer.
pub const SUCCESS: [ToneSpec; 3] = [
    ToneSpec::new(660.0, Waveform::Sine, 0.10, 0.08, 0.0),
    ToneSpec::new(880.0, Waveform::Triangle, 0.09, 0.06, 0.12),
    ToneSpec::new(1320.0, Waveform::Sine, 0.12, 0.05, 0.24),
];

/// Low buzz for a wrong answer.
pub const ERROR: [ToneSpec; 2] = [
    ToneSpec::new(140.0, Waveform::Sawtooth, 0.18, 0.07, 0.0),
    ToneSpec::new(110.0, Waveform::Sawtooth, 0.22, 0.06, 0.05),
];

const PARTY_NOTES: usize = 6;

/// Celebration burst: six square-wave notes climbing from 600 Hz in 110 Hz
/// steps, 60 ms apart.
pub fn party_score() -> [ToneSpec; PARTY_NOTES] {
    std::array::from_fn(|i| {
        ToneSpec::new(
            600.0 + i as f64 * 110.0,
            Waveform::Square,
            0.06,
            0.05,
            i as f64 * 0.06,
        )
    })
}

/// Cues the host can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Success,
    Error,
    Party,
}

impl FromStr for Cue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Cue::Success),
            "error" => Ok(Cue::Error),
            "party" => Ok(Cue::Party),
            other => Err(format!("unknown cue '{other}'")),
        }
    }
}

impl Cue {
    pub fn score(self) -> Vec<ToneSpec> {
        match self {
            Cue::Success => SUCCESS.to_vec(),
            Cue::Error => ERROR.to_vec(),
            Cue::Party => party_score().to_vec(),
        }
    }
}

pub fn play(ctx: &mut DeviceContext, cue: Cue) {
    for spec in &cue.score() {
        play_tone(ctx, spec);
    }
}

pub fn success(ctx: &mut DeviceContext) {
    play(ctx, Cue::Success);
}

pub fn error(ctx: &mut DeviceContext) {
    play(ctx, Cue::Error);
}

pub fn party(ctx: &mut DeviceContext) {
    play(ctx, Cue::Party);
}

/// Open and wake the device without playing anything.
pub fn ensure(ctx: &mut DeviceContext) {
    let _ = ctx.acquire();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::dsp::device::{DeviceState, NoOutput};
    use crate::dsp::voice::VoiceTag;
    use approx::assert_relative_eq;

    fn ctx() -> DeviceContext {
        DeviceContext::from_config(&EngineConfig::default())
    }

    fn starts(ctx: &DeviceContext) -> Vec<f64> {
        ctx.device()
            .map(|d| d.voices().iter().map(|v| v.start).collect())
            .unwrap_or_default()
    }

    #[test]
    fn success_schedules_three_tones() {
        let mut ctx = ctx();
        success(&mut ctx);
        let starts = starts(&ctx);
        assert_eq!(starts.len(), 3);
        for (got, want) in starts.iter().zip([0.0, 0.12, 0.24]) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn error_schedules_two_sawtooth_tones() {
        let mut ctx = ctx();
        error(&mut ctx);
        let device = ctx.device().unwrap();
        assert_eq!(device.voices().len(), 2);
        assert!(device.voices().iter().all(|v| v.tag == VoiceTag::Tone));
        assert!(device.voices().iter().all(|v| v.waveform() == Some(Waveform::Sawtooth)));
        assert_relative_eq!(device.voices()[1].start, 0.05, epsilon = 1e-12);
    }

    #[test]
    fn party_climbs() {
        let score = party_score();
        let freqs: Vec<f64> = score.iter().map(|t| t.frequency).collect();
        assert_eq!(freqs, vec![600.0, 710.0, 820.0, 930.0, 1040.0, 1150.0]);
        for (i, tone) in score.iter().enumerate() {
            assert_relative_eq!(tone.start_delay, i as f64 * 0.06);
            assert_eq!(tone.waveform, Waveform::Square);
        }
        assert_relative_eq!(score[5].start_delay, 0.30, epsilon = 1e-12);

        let mut ctx = ctx();
        party(&mut ctx);
        assert_eq!(starts(&ctx).len(), 6);
    }

    #[test]
    fn cues_are_relative_to_device_clock() {
        let mut ctx = ctx();
        ensure(&mut ctx);
        ctx.render(44100);
        success(&mut ctx);
        let first = starts(&ctx)[0];
        assert_relative_eq!(first, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn cues_render_and_expire() {
        let mut ctx = ctx();
        party(&mut ctx);
        let out = ctx.render(22050);
        assert!(out.iter().any(|s| s.abs() > 0.02));
        assert!(ctx.device().unwrap().voices().is_empty());
    }

    #[test]
    fn ensure_wakes_without_sound() {
        let mut ctx = ctx();
        assert_eq!(ctx.state(), DeviceState::Uninitialized);
        ensure(&mut ctx);
        assert_eq!(ctx.state(), DeviceState::Running);
        assert!(starts(&ctx).is_empty());
    }

    #[test]
    fn cue_names() {
        assert_eq!("party".parse::<Cue>(), Ok(Cue::Party));
        assert_eq!("success".parse::<Cue>(), Ok(Cue::Success));
        assert!("fanfare".parse::<Cue>().is_err());
    }

    #[test]
    fn unsupported_device_is_silent() {
        let mut ctx = DeviceContext::new(Box::new(NoOutput), 1.0, 1);
        success(&mut ctx);
        error(&mut ctx);
        party(&mut ctx);
        ensure(&mut ctx);
        assert!(ctx.device().is_none());
    }
}
