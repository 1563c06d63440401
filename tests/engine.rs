//! End-to-end behaviour of the public engine surface, driven by a manual
//! host clock so tick timing is deterministic.

use std::time::Duration;

use approx::assert_relative_eq;
use tinytune_core::clock::ManualClock;
use tinytune_core::config::EngineConfig;
use tinytune_core::dsp::device::{DeviceState, NoOutput};
use tinytune_core::dsp::voice::VoiceTag;
use tinytune_core::engine::SoundEngine;
use tinytune_core::renderer::{render_wav, Preview};
use tinytune_core::sfx::Cue;

fn engine() -> (SoundEngine<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    (SoundEngine::manual(&EngineConfig::default(), clock.clone()), clock)
}

fn tags(engine: &SoundEngine<ManualClock>) -> Vec<VoiceTag> {
    engine
        .context()
        .device()
        .map(|d| d.voices().iter().map(|v| v.tag).collect())
        .unwrap_or_default()
}

/// Advance the host clock one tick and poll once.
fn step(engine: &mut SoundEngine<ManualClock>, clock: &ManualClock) -> bool {
    clock.advance(engine.tick_interval());
    engine.poll()
}

#[test]
fn set_tempo_while_running_restarts_at_step_zero() {
    let (mut engine, clock) = engine();
    engine.start();
    assert_relative_eq!(engine.tick_interval().as_secs_f64(), 60.0 / 145.0 / 4.0, epsilon = 1e-9);
    for _ in 0..5 {
        assert!(step(&mut engine, &clock));
    }
    assert_eq!(engine.step_cursor(), 5);

    engine.set_tempo(200.0);
    assert!(engine.is_playing());
    assert_eq!(engine.step_cursor(), 0);
    assert_relative_eq!(engine.tick_interval().as_secs_f64(), 0.075, epsilon = 1e-9);

    // Not due until a full new interval has passed.
    clock.advance(Duration::from_millis(74));
    assert!(!engine.poll());
    clock.advance(Duration::from_millis(1));
    assert!(engine.poll());
    assert_eq!(engine.step_cursor(), 1);
}

#[test]
fn repeated_start_keeps_one_tick_source() {
    let (mut engine, clock) = engine();
    engine.start();
    engine.start();
    engine.ensure_start();
    assert!(step(&mut engine, &clock));
    assert!(!engine.poll());
    assert_eq!(engine.step_cursor(), 1);
}

#[test]
fn toggle_parity() {
    let (mut engine, _) = engine();
    for n in 1..=7 {
        engine.toggle();
        assert_eq!(engine.is_playing(), n % 2 == 1, "after {n} toggles");
    }
}

#[test]
fn stop_then_start_resumes_ticking() {
    let (mut engine, clock) = engine();
    engine.start();
    assert!(step(&mut engine, &clock));
    engine.stop();
    assert!(!step(&mut engine, &clock));
    engine.start();
    assert!(step(&mut engine, &clock));
    assert_eq!(engine.step_cursor(), 2);
}

#[test]
fn first_bar_plays_the_pattern() {
    let (mut engine, clock) = engine();
    engine.start();
    let mut per_step = Vec::new();
    for _ in 0..16 {
        let before = tags(&engine).len();
        assert!(step(&mut engine, &clock));
        per_step.push(tags(&engine)[before..].to_vec());
        // Keep the arena small so every tick's voices are the newest entries.
        engine.render(4410);
    }
    for (step, voices) in per_step.iter().enumerate() {
        let count = |tag| voices.iter().filter(|&&t| t == tag).count();
        assert_eq!(count(VoiceTag::Hat), 1, "step {step}");
        assert_eq!(count(VoiceTag::Kick), usize::from(step % 4 == 0), "step {step}");
        assert_eq!(count(VoiceTag::Snare), usize::from(step == 4 || step == 12), "step {step}");
        assert_eq!(
            count(VoiceTag::Pluck),
            usize::from(matches!(step, 0 | 3 | 6 | 9 | 12)),
            "step {step}"
        );
    }
}

#[test]
fn cues_schedule_their_scores() {
    let (mut engine, _) = engine();
    engine.success();
    engine.error();
    engine.party();
    let device = engine.context().device().expect("device opened");
    assert_eq!(device.voices().len(), 3 + 2 + 6);
    assert!(device.voices().iter().all(|v| v.tag == VoiceTag::Tone));
}

#[test]
fn unsupported_audio_never_plays() {
    let mut engine =
        SoundEngine::with_backend(&EngineConfig::default(), Box::new(NoOutput), ManualClock::new());
    engine.success();
    engine.start();
    assert!(!engine.is_playing());
    engine.set_tempo(200.0);
    assert_eq!(engine.tempo(), 200.0);
    assert!(!engine.is_playing());
    assert_eq!(engine.device_state(), DeviceState::Uninitialized);
}

#[test]
fn invalid_tempo_is_ignored() {
    let (mut engine, _) = engine();
    engine.start();
    engine.set_tempo(0.0);
    engine.set_tempo(f64::NAN);
    engine.set_tempo(-30.0);
    assert_eq!(engine.tempo(), 145.0);
    assert!(engine.is_playing());
}

#[test]
fn tempo_too_slow_to_time_is_ignored() {
    let (mut engine, clock) = engine();
    engine.start();
    engine.set_tempo(1e-20);
    engine.set_tempo(1e300);
    assert_eq!(engine.tempo(), 145.0);
    assert!(engine.is_playing());
    assert!(step(&mut engine, &clock));
}

#[test]
fn unvalidated_slow_tempo_config_still_starts() {
    let config = EngineConfig {
        tempo_bpm: 1e-20,
        ..EngineConfig::default()
    };
    assert!(config.validate().is_err());
    let clock = ManualClock::new();
    let mut engine = SoundEngine::manual(&config, clock.clone());
    engine.start();
    assert!(engine.is_playing());
    assert_eq!(engine.tempo(), 145.0);
    assert!(step(&mut engine, &clock));
}

#[test]
fn config_json_drives_the_engine() {
    let config = EngineConfig::from_json(r#"{"tempoBpm": 120, "sampleRate": 22050}"#).unwrap();
    let clock = ManualClock::new();
    let mut engine = SoundEngine::manual(&config, clock);
    assert_eq!(engine.tempo(), 120.0);
    engine.ensure();
    assert_eq!(engine.context().device().unwrap().sample_rate(), 22050);
}

#[test]
fn preview_wav_contains_audio() {
    let config = EngineConfig {
        sample_rate: 16000,
        ..EngineConfig::default()
    };
    let preview = Preview {
        seconds: 1.0,
        backing_track: true,
        cues: vec![(0.0, Cue::Success)],
    };
    let wav = render_wav(&config, &preview).expect("preview renders");
    assert_eq!(wav.len(), 44 + 2 * 16000);
    let loudest = wav[44..]
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]).unsigned_abs())
        .max()
        .unwrap();
    assert!(loudest > 500);
}
