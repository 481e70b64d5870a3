/// Audio system module
///
/// Procedural audio for the pet: synthesized one-shot effects and a
/// looping, age-keyed background melody, all mixed through one master
/// gain.
///
/// ## Architecture
///
/// ```text
/// AudioEngine
///   └── AudioContext (clock + rodio output stream)
///       └── Graph
///           ├── Voice (Meow)          ──────────────┐
///           ├── Voice (Death 1, 2)    ──────────────┤
///           ├── Voice (melody note) ─┐              │
///           ├── Voice (melody note) ─┴─> music bus ─┴─> master bus ─> device
///           └── ...
///
/// Each Voice has:
///   ├── Waveform (sine / square)
///   ├── frequency AudioParam
///   └── envelope AudioParam
/// ```
///
/// ## Usage
///
/// ```rust,no_run
/// use pixelpet_audio::audio_system::{AudioEngine, PetAge};
///
/// let engine = AudioEngine::new();
///
/// engine.play_meow();
/// engine.play_age_music(PetAge::Baby);
///
/// // Same age again is a no-op
/// engine.play_age_music(PetAge::Baby);
///
/// engine.set_volume(0.5);
/// engine.stop_music();
/// ```

pub mod context;
pub mod effects;
pub mod engine;
pub mod graph;
pub mod music;
pub mod param;
pub mod voice;

// Re-export commonly used types
pub use context::AudioContext;
pub use effects::{MasterVolume, NoteFade, SoundEffect, UnmutePolicy, VoiceRecipe};
pub use engine::AudioEngine;
pub use graph::{BusId, Graph, NodeId};
pub use music::{Melody, MusicSession, PetAge, Pitch};
pub use param::{AudioParam, SILENCE_FLOOR, SOFT_FLOOR};
pub use voice::{Voice, Waveform};
