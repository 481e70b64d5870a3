/// Sound effect recipes
///
/// Each one-shot effect is a fixed list of voice recipes: one tone
/// generator plus one amplitude envelope, scheduled at offsets from the
/// moment the effect is triggered.

pub mod fade;
pub mod volume;

pub use fade::NoteFade;
pub use volume::{MasterVolume, UnmutePolicy};

use std::fmt;

use super::graph::BusId;
use super::param::{SILENCE_FLOOR, SOFT_FLOOR};
use super::voice::{Voice, Waveform};
use crate::error::AudioResult;

/// One-shot effects the pet can make
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Short falling sine chirp
    Meow,

    /// Interaction blip (also used for "boop")
    Beep,

    /// Long falling tone followed by a square-wave glitch
    Death,
}

impl fmt::Display for SoundEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoundEffect::Meow => write!(f, "Meow"),
            SoundEffect::Beep => write!(f, "Beep"),
            SoundEffect::Death => write!(f, "Death"),
        }
    }
}

impl SoundEffect {
    /// Voices making up this effect, in start order
    pub fn voices(&self) -> Vec<VoiceRecipe> {
        match self {
            SoundEffect::Meow => vec![VoiceRecipe {
                waveform: Waveform::Sine,
                offset: 0.0,
                duration: 0.3,
                frequency: (350.0, Some(200.0)),
                amplitude: (0.2, SOFT_FLOOR),
            }],
            SoundEffect::Beep => vec![VoiceRecipe {
                waveform: Waveform::Sine,
                offset: 0.0,
                duration: 0.1,
                frequency: (800.0, None),
                amplitude: (0.1, SOFT_FLOOR),
            }],
            SoundEffect::Death => vec![
                VoiceRecipe {
                    waveform: Waveform::Sine,
                    offset: 0.0,
                    duration: 1.5,
                    frequency: (800.0, Some(100.0)),
                    amplitude: (0.25, SOFT_FLOOR),
                },
                VoiceRecipe {
                    waveform: Waveform::Square,
                    offset: 1.5,
                    duration: 0.5,
                    frequency: (200.0, Some(50.0)),
                    amplitude: (0.1, SILENCE_FLOOR),
                },
            ],
        }
    }

    /// Time from trigger until the last voice stops
    pub fn total_duration(&self) -> f64 {
        self.voices()
            .iter()
            .map(|v| v.offset + v.duration)
            .fold(0.0, f64::max)
    }
}

/// Blueprint for one effect voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceRecipe {
    pub waveform: Waveform,

    /// Seconds after the trigger time
    pub offset: f64,

    /// Seconds the voice sounds for
    pub duration: f64,

    /// Start frequency and optional exponential sweep target (Hz)
    pub frequency: (f32, Option<f32>),

    /// Start amplitude and the positive floor it decays exponentially toward
    pub amplitude: (f32, f32),
}

impl VoiceRecipe {
    /// Build a self-stopping voice for an effect triggered at `now`
    pub fn build(&self, now: f64, output: BusId) -> AudioResult<Voice> {
        let start = now + self.offset;
        let end = start + self.duration;
        let mut voice = Voice::new(self.waveform, start, end, output);

        let (freq_start, freq_end) = self.frequency;
        voice.frequency_mut().set_value_at_time(freq_start, start);
        if let Some(target) = freq_end {
            voice
                .frequency_mut()
                .exponential_ramp_to_value_at_time(target, end)?;
        }

        let (amp_start, amp_floor) = self.amplitude;
        voice
            .envelope_mut()
            .set_value_at_time(amp_start, start)
            .exponential_ramp_to_value_at_time(amp_floor, end)?;

        Ok(voice)
    }
}
