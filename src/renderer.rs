//! Offline renderer: plays a scripted session into a WAV byte buffer.
//!
//! The sequencer is driven from a [`ManualClock`] kept in lockstep with the
//! rendered frames, so the output is deterministic.

use std::time::Duration;

use crate::clock::ManualClock;
use crate::config::EngineConfig;
use crate::engine::SoundEngine;
use crate::error::{EngineError, Result};
use crate::sfx::Cue;

/// Frames rendered between sequencer polls.
const BLOCK: usize = 128;

/// Longest preview that will be rendered.
pub const MAX_PREVIEW_SECONDS: f64 = 600.0;

/// What to render.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub seconds: f64,
    /// Run the backing track from t=0.
    pub backing_track: bool,
    /// Sound effects and the time (seconds) they fire.
    pub cues: Vec<(f64, Cue)>,
}

impl Preview {
    pub fn backing_track(seconds: f64) -> Self {
        Preview {
            seconds,
            backing_track: true,
            cues: Vec::new(),
        }
    }
}

/// Render `preview` to mono f32 samples.
///
/// Fails if the config is invalid or the length is outside
/// `0..=MAX_PREVIEW_SECONDS`.
pub fn render_samples(config: &EngineConfig, preview: &Preview) -> Result<Vec<f32>> {
    config.validate()?;
    if !(0.0..=MAX_PREVIEW_SECONDS).contains(&preview.seconds) {
        return Err(EngineError::Config(format!(
            "preview length {}s outside 0..={MAX_PREVIEW_SECONDS}s",
            preview.seconds
        )));
    }
    let config = EngineConfig {
        start_suspended: false,
        ..config.clone()
    };
    let sample_rate = config.sample_rate as f64;
    let total = (preview.seconds * sample_rate) as usize;

    let clock = ManualClock::new();
    let mut engine = SoundEngine::manual(&config, clock.clone());
    engine.ensure();
    if preview.backing_track {
        engine.start();
    }

    let mut cues = preview.cues.clone();
    cues.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut cues = cues.into_iter().peekable();

    let mut out = Vec::with_capacity(total);
    while out.len() < total {
        let now = out.len() as f64 / sample_rate;
        clock.set(Duration::from_secs_f64(now));

        while let Some(&(at, cue)) = cues.peek() {
            if at > now {
                break;
            }
            engine.play(cue);
            cues.next();
        }
        engine.poll();

        let frames = BLOCK.min(total - out.len());
        out.extend(engine.render(frames));
    }
    Ok(out)
}

/// Render `preview` to a 16-bit mono PCM WAV.
pub fn render_wav(config: &EngineConfig, preview: &Preview) -> Result<Vec<u8>> {
    let samples = render_samples(config, preview)?;
    let pcm: Vec<i16> = samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect();
    Ok(encode_wav(&pcm, config.sample_rate, 1))
}

/// Encode interleaved i16 PCM samples to a WAV byte buffer.
fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = channels * (bits_per_sample / 8);
    let data_size = (samples.len() * 2) as u32;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_size).to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        buf.extend_from_slice(&sample.to_le_bytes());
    }

    buf
}
