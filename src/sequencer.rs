//! Step sequencer: the looping backing track.
//!
//! A 16-step drum + arpeggio pattern advanced one sixteenth note per tick.
//! Ticks come from an [`IntervalTimer`] polled against the host clock; the
//! sounds of each tick are placed at the device clock's "now".
//!
//! ```text
//! step   0 1 2 3 4 5 6 7 8 9 A B C D E F
//! hat    x x x x x x x x x x x x x x x x
//! kick   x       x       x       x
//! snare          x               x
//! pluck  x     x     x     x     x
//! ```

use std::time::Duration;

use log::{debug, warn};

use crate::config::DEFAULT_TEMPO_BPM;
use crate::context::DeviceContext;
use crate::synth::drums::{hat, kick, snare};
use crate::synth::pluck::{pluck, ScaleTable};

/// Steps in one loop of the pattern.
pub const STEPS: u64 = 16;

/// Length of one sixteenth note at `bpm`.
///
/// `None` unless `bpm` is finite and positive and the interval is a
/// non-zero `Duration`.
pub fn tick_interval(bpm: f64) -> Option<Duration> {
    if !bpm.is_finite() || bpm <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(60.0 / bpm / 4.0)
        .ok()
        .filter(|interval| !interval.is_zero())
}

/// What sounds on a given step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepHits {
    pub hat: bool,
    pub kick: bool,
    pub snare: bool,
    /// Pluck frequency in Hz.
    pub pluck: Option<f64>,
}

/// The fixed backing-track pattern.
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    scale: ScaleTable,
}

impl Pattern {
    /// Scale index for the pluck on this step, if the step has one.
    ///
    /// The completed-loop count is added in so the arpeggio shifts by one
    /// degree every loop.
    pub fn scale_index(&self, cursor: u64) -> Option<usize> {
        let step = cursor % STEPS;
        if !matches!(step, 0 | 3 | 6 | 9 | 12) {
            return None;
        }
        let index = (step / 3 + cursor / STEPS) % self.scale.len() as u64;
        Some(index as usize)
    }

    pub fn hits(&self, cursor: u64) -> StepHits {
        let step = cursor % STEPS;
        StepHits {
            hat: true,
            kick: step % 4 == 0,
            snare: step == 4 || step == 12,
            pluck: self.scale_index(cursor).map(|i| self.scale.frequency(i)),
        }
    }
}

/// A recurring timer: first due one interval after it is armed.
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTimer {
    pub id: u64,
    pub interval: Duration,
    next_due: Duration,
}

impl IntervalTimer {
    pub fn new(id: u64, interval: Duration, now: Duration) -> Self {
        IntervalTimer {
            id,
            interval,
            next_due: now.saturating_add(interval),
        }
    }

    /// Report whether the timer fired at host time `now`.
    ///
    /// At most one firing per call. A host that falls more than one interval
    /// behind loses the missed firings instead of getting a burst.
    pub fn poll(&mut self, now: Duration) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = self.next_due.saturating_add(self.interval);
        if self.next_due <= now {
            self.next_due = now.saturating_add(self.interval);
        }
        true
    }

    pub fn next_due(&self) -> Duration {
        self.next_due
    }
}

pub struct Sequencer {
    tempo_bpm: f64,
    interval: Duration,
    step_cursor: u64,
    timer: Option<IntervalTimer>,
    timers_created: u64,
    pattern: Pattern,
}

impl Sequencer {
    /// A stopped sequencer. An unusable tempo falls back to the default.
    pub fn new(tempo_bpm: f64) -> Self {
        let (tempo_bpm, interval) = match tick_interval(tempo_bpm) {
            Some(interval) => (tempo_bpm, interval),
            None => {
                warn!(target: "audio::seq", "invalid tempo {tempo_bpm}, using {DEFAULT_TEMPO_BPM}");
                (
                    DEFAULT_TEMPO_BPM,
                    Duration::from_secs_f64(60.0 / DEFAULT_TEMPO_BPM / 4.0),
                )
            }
        };
        Sequencer {
            tempo_bpm,
            interval,
            step_cursor: 0,
            timer: None,
            timers_created: 0,
            pattern: Pattern::default(),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.timer.is_some()
    }

    pub fn tempo(&self) -> f64 {
        self.tempo_bpm
    }

    pub fn tick_interval(&self) -> Duration {
        self.interval
    }

    pub fn step_cursor(&self) -> u64 {
        self.step_cursor
    }

    /// The live tick source, if running.
    pub fn timer(&self) -> Option<&IntervalTimer> {
        self.timer.as_ref()
    }

    /// Begin ticking. No-op if already running or if audio is unsupported.
    pub fn start(&mut self, ctx: &mut DeviceContext, now: Duration) {
        if self.is_playing() {
            return;
        }
        if ctx.acquire().is_none() {
            debug!(target: "audio::seq", "start ignored: no audio output");
            return;
        }
        self.timers_created += 1;
        let timer = IntervalTimer::new(self.timers_created, self.tick_interval(), now);
        debug!(
            target: "audio::seq",
            "start at {} BPM, tick every {:?}",
            self.tempo_bpm,
            timer.interval
        );
        self.timer = Some(timer);
    }

    /// Cancel the tick source. Sounds already scheduled play out.
    pub fn stop(&mut self) {
        if self.timer.take().is_some() {
            debug!(target: "audio::seq", "stop at step {}", self.step_cursor);
        }
    }

    pub fn toggle(&mut self, ctx: &mut DeviceContext, now: Duration) {
        if self.is_playing() {
            self.stop();
        } else {
            self.start(ctx, now);
        }
    }

    /// Start if stopped; for hosts that may only start audio after a gesture.
    pub fn ensure_start(&mut self, ctx: &mut DeviceContext, now: Duration) {
        if !self.is_playing() {
            self.start(ctx, now);
        }
    }

    /// Change tempo. While running this restarts the timer at the new
    /// interval and returns the pattern to step 0.
    pub fn set_tempo(&mut self, ctx: &mut DeviceContext, bpm: f64, now: Duration) {
        let Some(interval) = tick_interval(bpm) else {
            warn!(target: "audio::seq", "ignoring invalid tempo {bpm}");
            return;
        };
        self.tempo_bpm = bpm;
        self.interval = interval;
        if self.is_playing() {
            self.stop();
            self.step_cursor = 0;
            self.start(ctx, now);
        }
    }

    /// Fire a tick if the timer is due at host time `now`.
    pub fn poll(&mut self, ctx: &mut DeviceContext, now: Duration) -> bool {
        let due = match self.timer.as_mut() {
            Some(timer) => timer.poll(now),
            None => false,
        };
        if due {
            self.tick(ctx);
        }
        due
    }

    /// Play the current step at the device's "now" and advance the cursor.
    pub fn tick(&mut self, ctx: &mut DeviceContext) {
        let Some(device) = ctx.acquire() else {
            return;
        };
        let t = device.now();
        let hits = self.pattern.hits(self.step_cursor);

        if hits.hat {
            hat(device, t);
        }
        if hits.kick {
            kick(device, t);
        }
        if hits.snare {
            snare(device, t);
        }
        if let Some(freq) = hits.pluck {
            pluck(device, t, freq);
        }

        self.step_cursor += 1;
    }
}
