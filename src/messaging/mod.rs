/// Messaging module for driving the audio engine across threads
///
/// ## Architecture
///
/// ```text
/// ┌───────────┐  AudioCommand  ┌──────────────┐   calls   ┌─────────────┐
/// │ Game loop │ ─────────────> │ AudioExecutor│ ────────> │ AudioEngine │
/// │ UI thread │  (crossbeam)   │   thread     │           │             │
/// └───────────┘                └──────────────┘           └─────────────┘
/// ```
///
/// ## Usage
///
/// ```rust,no_run
/// use pixelpet_audio::audio_system::{AudioEngine, PetAge};
/// use pixelpet_audio::messaging::AudioExecutor;
///
/// let executor = AudioExecutor::spawn(AudioEngine::new).unwrap();
/// let audio = executor.handle();
///
/// audio.play_meow();
/// audio.play_age_music(PetAge::Young);
/// executor.shutdown();
/// ```

pub mod commands;
pub mod executor;

// Re-export commonly used types
pub use commands::AudioCommand;
pub use executor::{AudioExecutor, EngineHandle};
