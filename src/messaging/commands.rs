/// Command types for the audio executor
///
/// Commands mirror the engine's command surface so it can be driven from
/// any thread.
use crossbeam_channel::Sender;

use crate::audio_system::PetAge;

/// Audio commands
#[derive(Debug, Clone)]
pub enum AudioCommand {
    PlayMeow,

    PlayBeep,

    PlayBoop,

    PlayDeathSound,

    /// Start (or keep) the melody for an age
    PlayAgeMusic { age: PetAge },

    StopMusic,

    SetVolume(f32),

    SetMuted(bool),

    /// Reply with the current master level
    GetVolume { reply: Sender<f32> },

    /// Stop music and end the executor thread
    Shutdown,
}

impl AudioCommand {
    /// Get a human-readable description of the command
    pub fn description(&self) -> String {
        match self {
            AudioCommand::PlayMeow => "Play meow".to_string(),
            AudioCommand::PlayBeep => "Play beep".to_string(),
            AudioCommand::PlayBoop => "Play boop".to_string(),
            AudioCommand::PlayDeathSound => "Play death sound".to_string(),
            AudioCommand::PlayAgeMusic { age } => format!("Play {} music", age),
            AudioCommand::StopMusic => "Stop music".to_string(),
            AudioCommand::SetVolume(volume) => format!("Set volume: {}", volume),
            AudioCommand::SetMuted(true) => "Mute".to_string(),
            AudioCommand::SetMuted(false) => "Unmute".to_string(),
            AudioCommand::GetVolume { .. } => "Get volume".to_string(),
            AudioCommand::Shutdown => "Shut down audio".to_string(),
        }
    }
}
