//! PixelPet audio engine
//!
//! Synthesized sound effects and age-keyed background music for a
//! virtual pet, rendered through a small oscillator graph and played with
//! rodio.

pub mod audio_system;
pub mod config;
pub mod error;
pub mod messaging;

pub use audio_system::{AudioEngine, PetAge, SoundEffect};
pub use config::EngineConfig;
pub use error::{AudioError, AudioResult, ConfigError};
