/// Fade in/out effect
///
/// Click-free linear fades around each background-music note.

use crate::audio_system::param::AudioParam;

/// Note fade configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteFade {
    /// Fade in duration in seconds
    pub fade_in: f64,

    /// Fade out duration in seconds, ending this long before the note ends
    pub fade_out: f64,

    /// Gain held between the fades
    pub level: f32,
}

impl NoteFade {
    pub fn new(fade_in: f64, fade_out: f64, level: f32) -> Self {
        Self {
            fade_in,
            fade_out,
            level,
        }
    }

    /// Schedule the fade on `envelope` for a note at `[start, start + duration)`.
    ///
    /// The gain is back at zero `fade_out` seconds before the note's
    /// nominal end.
    pub fn apply(&self, envelope: &mut AudioParam, start: f64, duration: f64) {
        let peak = start + self.fade_in.min(duration);
        let silent = (start + duration - self.fade_out).max(peak);
        envelope
            .set_value_at_time(0.0, start)
            .linear_ramp_to_value_at_time(self.level, peak)
            .linear_ramp_to_value_at_time(0.0, silent);
    }
}

impl Default for NoteFade {
    fn default() -> Self {
        Self {
            fade_in: 0.1,
            fade_out: 0.1,
            level: 1.0,
        }
    }
}
