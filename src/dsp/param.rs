//! Parameter automation: matches WebAudio AudioParam timeline semantics
//! for `setValueAtTime` and `exponentialRampToValueAtTime`.

use crate::error::{EngineError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Event {
    SetValue { time: f64, value: f64 },
    ExponentialRamp { time: f64, value: f64 },
}

impl Event {
    fn time(&self) -> f64 {
        match *self {
            Event::SetValue { time, .. } | Event::ExponentialRamp { time, .. } => time,
        }
    }

    fn value(&self) -> f64 {
        match *self {
            Event::SetValue { value, .. } | Event::ExponentialRamp { value, .. } => value,
        }
    }
}

/// A controllable parameter (gain, frequency) with a timeline of events
/// on the device clock.
#[derive(Debug, Clone)]
pub struct Automation {
    /// Value before the first event.
    pub default_value: f64,
    events: Vec<Event>,
}

impl Automation {
    pub fn new(default_value: f64) -> Self {
        Automation {
            default_value,
            events: Vec::new(),
        }
    }

    /// Jump to `value` at `time`.
    pub fn set_value_at_time(&mut self, value: f64, time: f64) -> Result<()> {
        if !value.is_finite() || !time.is_finite() {
            return Err(EngineError::InvalidRamp { value, time });
        }
        self.check_order(value, time)?;
        self.events.push(Event::SetValue { time, value });
        Ok(())
    }

    /// Ramp exponentially from the previous event's value to `value`, arriving
    /// at `time`. Zero, sign changes and out-of-order times are rejected.
    pub fn exponential_ramp_to_value_at_time(&mut self, value: f64, time: f64) -> Result<()> {
        if value == 0.0 || !value.is_finite() || !time.is_finite() {
            return Err(EngineError::InvalidRamp { value, time });
        }
        let from = self.last_value();
        if from == 0.0 || from.signum() != value.signum() {
            return Err(EngineError::InvalidRamp { value, time });
        }
        self.check_order(value, time)?;
        self.events.push(Event::ExponentialRamp { time, value });
        Ok(())
    }

    fn check_order(&self, value: f64, time: f64) -> Result<()> {
        match self.events.last() {
            Some(prev) if time < prev.time() => Err(EngineError::InvalidRamp { value, time }),
            _ => Ok(()),
        }
    }

    fn last_value(&self) -> f64 {
        self.events
            .last()
            .map(Event::value)
            .unwrap_or(self.default_value)
    }

    /// Drop all scheduled events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_automated(&self) -> bool {
        !self.events.is_empty()
    }

    /// Value of the parameter at device time `t`.
    pub fn value_at(&self, t: f64) -> f64 {
        let mut prev_time = 0.0;
        let mut prev_value = self.default_value;
        let mut started = false;

        for event in &self.events {
            if t < event.time() {
                return match *event {
                    Event::ExponentialRamp { time, value } if started => {
                        let span = time - prev_time;
                        if span <= 0.0 {
                            value
                        } else {
                            let progress = (t - prev_time) / span;
                            prev_value * (value / prev_value).powf(progress)
                        }
                    }
                    _ => prev_value,
                };
            }
            prev_time = event.time();
            prev_value = event.value();
            started = true;
        }

        prev_value
    }
}
