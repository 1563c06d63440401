pub mod clock;
pub mod config;
pub mod context;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod renderer;
pub mod sequencer;
pub mod sfx;
pub mod synth;

use std::time::Duration;

use crate::clock::{Clock, ManualClock};
use crate::config::EngineConfig;
use crate::engine::SoundEngine;
use crate::renderer::Preview;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the tinytune-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Decode an optional JS config object. `undefined`/`null` means defaults.
fn config_from_js(value: JsValue) -> Result<EngineConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(EngineConfig::default());
    }
    let config: EngineConfig =
        serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    config
        .validate()
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    Ok(config)
}

/// Host milliseconds as a `Duration`; `None` for negative, non-finite or
/// out-of-range times.
fn host_time(host_ms: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(host_ms / 1000.0).ok()
}

/// WASM-exposed sound engine.
///
/// The page drives it: `poll(performance.now())` from a timer or animation
/// frame, and `render(frames)` from the AudioWorklet.
#[wasm_bindgen]
pub struct WebSoundEngine {
    engine: SoundEngine<ManualClock>,
    clock: ManualClock,
}

#[wasm_bindgen]
impl WebSoundEngine {
    /// Build an engine. A config that fails to decode or validate is logged
    /// and replaced by the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> WebSoundEngine {
        let config = config_from_js(config).unwrap_or_else(|e| {
            log::warn!(target: "audio::device", "bad engine config {e:?}, using defaults");
            EngineConfig::default()
        });
        let clock = ManualClock::new();
        WebSoundEngine {
            engine: SoundEngine::manual(&config, clock.clone()),
            clock,
        }
    }

    pub fn success(&mut self) {
        self.engine.success();
    }

    pub fn error(&mut self) {
        self.engine.error();
    }

    pub fn party(&mut self) {
        self.engine.party();
    }

    pub fn ensure(&mut self) {
        self.engine.ensure();
    }

    pub fn start(&mut self) {
        self.engine.start();
    }

    pub fn stop(&mut self) {
        self.engine.stop();
    }

    pub fn toggle(&mut self) {
        self.engine.toggle();
    }

    #[wasm_bindgen(js_name = ensureStart)]
    pub fn ensure_start(&mut self) {
        self.engine.ensure_start();
    }

    #[wasm_bindgen(getter)]
    pub fn playing(&self) -> bool {
        self.engine.is_playing()
    }

    #[wasm_bindgen(getter)]
    pub fn tempo(&self) -> f64 {
        self.engine.tempo()
    }

    #[wasm_bindgen(js_name = setTempo)]
    pub fn set_tempo(&mut self, bpm: f64) {
        self.engine.set_tempo(bpm);
    }

    /// Advance host time to `host_ms` and fire a sequencer tick if one is
    /// due. Returns whether a tick fired.
    pub fn poll(&mut self, host_ms: f64) -> bool {
        if let Some(now) = host_time(host_ms) {
            if now > self.clock.now() {
                self.clock.set(now);
            }
        }
        self.engine.poll()
    }

    /// Pull `frames` mono samples from the device.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        self.engine.render(frames)
    }
}

/// WASM-exposed: render a preview of the backing track (optionally with a
/// cue at t=0) to a WAV byte array.
#[wasm_bindgen(js_name = renderPreviewWav)]
pub fn render_preview_wav(config: JsValue, seconds: f64, cue: Option<String>) -> Result<Vec<u8>, JsValue> {
    let config = config_from_js(config)?;
    let mut preview = Preview::backing_track(seconds);
    if let Some(name) = cue {
        let cue = name.parse().map_err(|e: String| JsValue::from_str(&e))?;
        preview.cues.push((0.0, cue));
    }
    renderer::render_wav(&config, &preview).map_err(|e| JsValue::from_str(&format!("{e}")))
}
