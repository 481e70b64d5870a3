/// Voices: one oscillator paired with one amplitude envelope
use std::f64::consts::TAU;
use std::fmt;

use super::graph::BusId;
use super::param::AudioParam;

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
}

impl Waveform {
    /// Sample the waveform at a normalized phase in [0, 1)
    pub fn sample(self, phase: f64) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin() as f32,
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
        }
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waveform::Sine => write!(f, "sine"),
            Waveform::Square => write!(f, "square"),
        }
    }
}

/// A scheduled oscillator with its envelope, routed into a bus.
///
/// Silent outside `[start, stop)`. Once the graph clock passes `stop` the
/// voice is dropped by the renderer without any explicit teardown.
#[derive(Debug, Clone)]
pub struct Voice {
    waveform: Waveform,
    frequency: AudioParam,
    envelope: AudioParam,
    start: f64,
    stop: f64,
    output: BusId,
    phase: f64,
}

impl Voice {
    /// Create a voice playing during `[start, stop)` into `output`.
    ///
    /// Frequency defaults to 440 Hz and the envelope to unity gain until
    /// events are scheduled on them.
    pub fn new(waveform: Waveform, start: f64, stop: f64, output: BusId) -> Self {
        Self {
            waveform,
            frequency: AudioParam::new(440.0),
            envelope: AudioParam::new(1.0),
            start,
            stop: stop.max(start),
            output,
            phase: 0.0,
        }
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn frequency(&self) -> &AudioParam {
        &self.frequency
    }

    pub fn frequency_mut(&mut self) -> &mut AudioParam {
        &mut self.frequency
    }

    pub fn envelope(&self) -> &AudioParam {
        &self.envelope
    }

    pub fn envelope_mut(&mut self) -> &mut AudioParam {
        &mut self.envelope
    }

    pub fn start_time(&self) -> f64 {
        self.start
    }

    pub fn stop_time(&self) -> f64 {
        self.stop
    }

    pub fn output(&self) -> BusId {
        self.output
    }

    /// Move the stop time earlier. A later time never extends the voice.
    pub(crate) fn stop_at(&mut self, when: f64) {
        self.stop = self.stop.min(when.max(self.start));
    }

    pub fn is_active(&self, time: f64) -> bool {
        time >= self.start && time < self.stop
    }

    pub fn is_finished(&self, time: f64) -> bool {
        time >= self.stop
    }

    /// Produce one sample at `time` and advance the phase by `dt`
    pub(crate) fn render_sample(&mut self, time: f64, dt: f64) -> f32 {
        if !self.is_active(time) {
            return 0.0;
        }
        let freq = f64::from(self.frequency.value_at(time));
        let sample = self.waveform.sample(self.phase);
        self.phase = (self.phase + freq * dt).rem_euclid(1.0);
        sample * self.envelope.value_at(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_waveform_samples() {
        assert!(Waveform::Sine.sample(0.0).abs() < 1e-6);
        assert!((Waveform::Sine.sample(0.25) - 1.0).abs() < 1e-6);
        assert_eq!(Waveform::Square.sample(0.1), 1.0);
        assert_eq!(Waveform::Square.sample(0.6), -1.0);
    }

    #[test]
    fn test_waveform_display() {
        assert_eq!(Waveform::Sine.to_string(), "sine");
        assert_eq!(Waveform::Square.to_string(), "square");
    }

    #[test]
    fn test_voice_silent_outside_window() {
        let mut voice = Voice::new(Waveform::Square, 1.0, 2.0, BusId::MASTER);
        assert_eq!(voice.render_sample(0.5, 0.001), 0.0);
        assert_eq!(voice.render_sample(1.0, 0.001), 1.0);
        assert_eq!(voice.render_sample(2.0, 0.001), 0.0);
        assert!(voice.is_finished(2.0));
    }

    #[test]
    fn test_stop_at_only_shortens() {
        let mut voice = Voice::new(Waveform::Sine, 1.0, 3.0, BusId::MASTER);
        voice.stop_at(5.0);
        assert_eq!(voice.stop_time(), 3.0);
        voice.stop_at(2.0);
        assert_eq!(voice.stop_time(), 2.0);
        voice.stop_at(0.0);
        assert_eq!(voice.stop_time(), 1.0);
    }

    #[test]
    fn test_envelope_scales_output() {
        let mut voice = Voice::new(Waveform::Square, 0.0, 1.0, BusId::MASTER);
        voice.envelope_mut().set_value_at_time(0.25, 0.0);
        assert_eq!(voice.render_sample(0.0, 0.001), 0.25);
    }
}
