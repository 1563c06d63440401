//! Exponential attack/release gain envelopes.

use super::param::Automation;
use crate::error::Result;

/// Floor used by one-shot tones.
pub const TONE_FLOOR: f64 = 0.0001;
/// Floor used by drum and pluck recipes.
pub const HIT_FLOOR: f64 = 0.001;

/// Gain shape over a sound's lifetime: start at `floor`, ramp exponentially
/// to `peak` by `attack`, then back down to `floor` by `release`.
///
/// Times are offsets from the sound's start. The floor is never zero since
/// an exponential ramp cannot reach or leave zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub floor: f64,
    pub peak: f64,
    /// Offset at which `peak` is reached.
    pub attack: f64,
    /// Offset at which the gain is back at `floor`.
    pub release: f64,
}

impl Envelope {
    /// Envelope for a tone of `duration` seconds: 10 ms attack.
    pub fn tone(peak: f64, duration: f64) -> Self {
        Envelope {
            floor: TONE_FLOOR,
            peak,
            attack: 0.01,
            release: duration,
        }
    }

    pub fn hit(peak: f64, attack: f64, release: f64) -> Self {
        Envelope {
            floor: HIT_FLOOR,
            peak,
            attack,
            release,
        }
    }

    /// Write the envelope onto `gain` starting at device time `t0`.
    ///
    /// On error `gain` may hold a partial timeline; callers that want to
    /// recover should clear it.
    pub fn apply(&self, gain: &mut Automation, t0: f64) -> Result<()> {
        gain.set_value_at_time(self.floor, t0)?;
        gain.exponential_ramp_to_value_at_time(self.peak, t0 + self.attack)?;
        gain.exponential_ramp_to_value_at_time(self.floor, t0 + self.release)?;
        Ok(())
    }
}
