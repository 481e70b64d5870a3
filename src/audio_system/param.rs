/// Scheduled parameter automation
///
/// A value curve over context time built from set/linear/exponential
/// events, evaluated per sample by the renderer.

use crate::error::{AudioError, AudioResult};

/// Floor for envelopes that should fade but stay audible to the tail
pub const SOFT_FLOOR: f32 = 0.01;

/// Floor for envelopes that should end in silence
pub const SILENCE_FLOOR: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParamEvent {
    SetValue { value: f32, time: f64 },
    LinearRamp { value: f32, time: f64 },
    ExponentialRamp { value: f32, time: f64 },
}

impl ParamEvent {
    fn time(&self) -> f64 {
        match *self {
            ParamEvent::SetValue { time, .. }
            | ParamEvent::LinearRamp { time, .. }
            | ParamEvent::ExponentialRamp { time, .. } => time,
        }
    }

    fn value(&self) -> f32 {
        match *self {
            ParamEvent::SetValue { value, .. }
            | ParamEvent::LinearRamp { value, .. }
            | ParamEvent::ExponentialRamp { value, .. } => value,
        }
    }
}

/// Time-varying parameter (frequency, gain)
#[derive(Debug, Clone, PartialEq)]
pub struct AudioParam {
    default: f32,
    events: Vec<ParamEvent>,
}

impl AudioParam {
    /// Create a parameter holding `default` until the first event
    pub fn new(default: f32) -> Self {
        Self {
            default,
            events: Vec::new(),
        }
    }

    pub fn default_value(&self) -> f32 {
        self.default
    }

    /// Number of scheduled events
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Jump to `value` at `time`
    pub fn set_value_at_time(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(ParamEvent::SetValue { value, time });
        self
    }

    /// Linearly approach `value`, reaching it at `time`
    pub fn linear_ramp_to_value_at_time(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(ParamEvent::LinearRamp { value, time });
        self
    }

    /// Exponentially approach `value`, reaching it at `time`.
    ///
    /// Exponential interpolation is undefined at zero, so the target must
    /// be strictly positive. Use [`SOFT_FLOOR`] or [`SILENCE_FLOOR`] for
    /// decays.
    pub fn exponential_ramp_to_value_at_time(
        &mut self,
        value: f32,
        time: f64,
    ) -> AudioResult<&mut Self> {
        if !(value.is_finite() && value > 0.0) {
            return Err(AudioError::NonPositiveRampTarget { value });
        }
        self.insert(ParamEvent::ExponentialRamp { value, time });
        Ok(self)
    }

    /// Evaluate the curve at context time `time`
    pub fn value_at(&self, time: f64) -> f32 {
        let idx = self.events.partition_point(|e| e.time() <= time);

        let (start_value, start_time) = match idx.checked_sub(1) {
            Some(prev) => (self.events[prev].value(), self.events[prev].time()),
            None => (self.default, 0.0),
        };

        match self.events.get(idx) {
            Some(&ParamEvent::LinearRamp { value, time: end }) => {
                let frac = ramp_fraction(time, start_time, end);
                start_value + (value - start_value) * frac
            }
            Some(&ParamEvent::ExponentialRamp { value, time: end }) => {
                // A non-positive start cannot be interpolated; hold it
                if start_value <= 0.0 {
                    return start_value;
                }
                let frac = ramp_fraction(time, start_time, end);
                start_value * (value / start_value).powf(frac)
            }
            _ => start_value,
        }
    }

    fn insert(&mut self, event: ParamEvent) {
        let pos = self.events.partition_point(|e| e.time() <= event.time());
        self.events.insert(pos, event);
    }
}

fn ramp_fraction(time: f64, start: f64, end: f64) -> f32 {
    if end <= start {
        return 1.0;
    }
    ((time - start) / (end - start)).clamp(0.0, 1.0) as f32
}
