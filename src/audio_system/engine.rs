/// Pet audio engine
///
/// The command surface the game loop talks to: one-shot effects,
/// age-keyed background music, and master volume. Every command is a
/// no-op when no output context could be opened.

use parking_lot::Mutex;

use super::context::AudioContext;
use super::effects::{MasterVolume, SoundEffect};
use super::graph::{BusId, NodeId};
use super::music::{MusicSession, PetAge};
use crate::config::EngineConfig;

pub struct AudioEngine {
    context: Option<AudioContext>,
    config: EngineConfig,
    volume: Mutex<MasterVolume>,
}

impl AudioEngine {
    /// Open the default output device with default settings
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Open the default output device, degrading to a silent engine if
    /// that fails
    pub fn with_config(config: EngineConfig) -> Self {
        match AudioContext::open_default(config.sample_rate, config.block_frames) {
            Ok(context) => Self::from_context(context, config),
            Err(e) => {
                tracing::warn!("Audio output not supported, running silent: {:#}", e);
                Self::degraded(config)
            }
        }
    }

    /// Build on an existing context (e.g. an offline one)
    pub fn from_context(context: AudioContext, config: EngineConfig) -> Self {
        let volume = MasterVolume::new(config.default_volume, config.unmute);
        context.set_master_gain(volume.level());
        Self {
            context: Some(context),
            config,
            volume: Mutex::new(volume),
        }
    }

    /// An engine with no context; every command does nothing
    pub fn degraded(config: EngineConfig) -> Self {
        let volume = MasterVolume::new(config.default_volume, config.unmute);
        Self {
            context: None,
            config,
            volume: Mutex::new(volume),
        }
    }

    pub fn is_available(&self) -> bool {
        self.context.is_some()
    }

    pub fn context(&self) -> Option<&AudioContext> {
        self.context.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn play_meow(&self) {
        self.play_effect(SoundEffect::Meow);
    }

    pub fn play_beep(&self) {
        self.play_effect(SoundEffect::Beep);
    }

    /// Same sound as [`play_beep`](AudioEngine::play_beep)
    pub fn play_boop(&self) {
        self.play_beep();
    }

    pub fn play_death_sound(&self) {
        self.play_effect(SoundEffect::Death);
    }

    /// Schedule every voice of `effect` from the current time. Voices stop
    /// themselves; effects mix on top of each other and the music.
    pub fn play_effect(&self, effect: SoundEffect) {
        let Some(context) = &self.context else {
            return;
        };

        let scheduled = context.with_state(|state| {
            let now = state.graph.current_time();
            let mut ids: Vec<NodeId> = Vec::new();
            for recipe in effect.voices() {
                match recipe.build(now, BusId::MASTER) {
                    Ok(voice) => ids.push(state.graph.insert_voice(voice)),
                    Err(e) => tracing::warn!("Skipping {} voice: {}", effect, e),
                }
            }
            (now, ids)
        });

        tracing::debug!(
            "Scheduled {} at {:.3}s ({} voices)",
            effect,
            scheduled.0,
            scheduled.1.len()
        );
    }

    /// Start the looping melody for `age`.
    ///
    /// Does nothing if that age's melody is already playing. Otherwise the
    /// current session is torn down before the new one is scheduled.
    pub fn play_age_music(&self, age: PetAge) {
        let Some(context) = &self.context else {
            return;
        };

        let music_volume = self.config.music_volume;
        let lookahead = self.config.lookahead_loops;
        let started = context.with_state(|state| {
            if state.music.as_ref().map(MusicSession::age) == Some(age) {
                return false;
            }
            if let Some(previous) = state.music.take() {
                previous.teardown(&mut state.graph);
            }
            state.music = Some(MusicSession::start(
                &mut state.graph,
                age,
                music_volume,
                lookahead,
            ));
            true
        });
        if started {
            tracing::info!("Background music: {}", age);
        }
    }

    /// Silence and release the current melody. Safe with nothing playing.
    pub fn stop_music(&self) {
        let Some(context) = &self.context else {
            return;
        };
        context.with_state(|state| {
            if let Some(session) = state.music.take() {
                session.teardown(&mut state.graph);
            }
        });
    }

    /// Age of the melody currently playing
    pub fn current_music(&self) -> Option<PetAge> {
        self.context
            .as_ref()?
            .with_state(|state| state.music.as_ref().map(MusicSession::age))
    }

    /// Voices retained by the current music session
    pub fn music_nodes(&self) -> Vec<NodeId> {
        self.context
            .as_ref()
            .map(|context| {
                context.with_state(|state| {
                    state
                        .music
                        .as_ref()
                        .map(|session| session.nodes().to_vec())
                        .unwrap_or_default()
                })
            })
            .unwrap_or_default()
    }

    pub fn music_node_count(&self) -> usize {
        self.music_nodes().len()
    }

    /// Bus carrying the current music session
    pub fn music_bus(&self) -> Option<BusId> {
        self.context
            .as_ref()?
            .with_state(|state| state.music.as_ref().map(MusicSession::bus))
    }

    /// Set the master level immediately, clamped to [0, 1]
    pub fn set_volume(&self, value: f32) {
        let Some(context) = &self.context else {
            return;
        };
        let level = self.volume.lock().set_level(value);
        context.set_master_gain(level);
    }

    /// Current master level, 0 without a context
    pub fn volume(&self) -> f32 {
        self.context
            .as_ref()
            .map(AudioContext::master_gain)
            .unwrap_or(0.0)
    }

    /// Mute sets the master level to 0. Unmute applies the configured
    /// [`UnmutePolicy`](super::effects::UnmutePolicy); by default that is
    /// the default level, not the level before muting.
    pub fn set_muted(&self, muted: bool) {
        let Some(context) = &self.context else {
            return;
        };
        let level = self.volume.lock().set_muted(muted);
        context.set_master_gain(level);
    }

    pub fn is_muted(&self) -> bool {
        self.is_available() && self.volume.lock().is_muted()
    }
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}
