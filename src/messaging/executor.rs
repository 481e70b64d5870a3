/// Audio command executor
///
/// Runs the engine on its own thread and applies commands in arrival
/// order. The rodio output stream cannot leave the thread that opened it,
/// so the engine is built inside the executor thread from a factory.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};

use super::commands::AudioCommand;
use crate::audio_system::{AudioEngine, PetAge};

/// Owns the executor thread
pub struct AudioExecutor {
    handle: EngineHandle,
    thread: Option<JoinHandle<()>>,
}

impl AudioExecutor {
    /// Start the executor thread with an engine built by `factory`
    pub fn spawn<F>(factory: F) -> std::io::Result<Self>
    where
        F: FnOnce() -> AudioEngine + Send + 'static,
    {
        let (tx, rx) = unbounded();
        let thread = thread::Builder::new()
            .name("pixelpet-audio".to_string())
            .spawn(move || run(factory(), rx))?;

        Ok(Self {
            handle: EngineHandle { command_tx: tx },
            thread: Some(thread),
        })
    }

    /// Get a handle for submitting commands
    pub fn handle(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// Stop music, end the thread, and wait for it
    pub fn shutdown(mut self) {
        self.stop_thread();
    }

    fn stop_thread(&mut self) {
        self.handle.send(AudioCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("Audio executor thread panicked");
            }
        }
    }
}

impl Drop for AudioExecutor {
    fn drop(&mut self) {
        self.stop_thread();
    }
}

fn run(engine: AudioEngine, rx: Receiver<AudioCommand>) {
    tracing::info!("Audio executor thread started");

    while let Ok(command) = rx.recv() {
        tracing::trace!("Executing command: {}", command.description());
        match command {
            AudioCommand::PlayMeow => engine.play_meow(),
            AudioCommand::PlayBeep => engine.play_beep(),
            AudioCommand::PlayBoop => engine.play_boop(),
            AudioCommand::PlayDeathSound => engine.play_death_sound(),
            AudioCommand::PlayAgeMusic { age } => engine.play_age_music(age),
            AudioCommand::StopMusic => engine.stop_music(),
            AudioCommand::SetVolume(volume) => engine.set_volume(volume),
            AudioCommand::SetMuted(muted) => engine.set_muted(muted),
            AudioCommand::GetVolume { reply } => {
                // Requester may have given up waiting
                let _ = reply.send(engine.volume());
            }
            AudioCommand::Shutdown => {
                engine.stop_music();
                break;
            }
        }
    }

    tracing::info!("Audio executor thread stopped");
}

/// Cloneable, thread-safe front for the engine's command surface.
///
/// Commands are fire-and-forget; once the executor is gone they are
/// dropped silently.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    command_tx: Sender<AudioCommand>,
}

impl EngineHandle {
    /// Submit a raw command
    pub fn send(&self, command: AudioCommand) {
        if self.command_tx.send(command).is_err() {
            tracing::debug!("Audio executor gone, command dropped");
        }
    }

    pub fn play_meow(&self) {
        self.send(AudioCommand::PlayMeow);
    }

    pub fn play_beep(&self) {
        self.send(AudioCommand::PlayBeep);
    }

    pub fn play_boop(&self) {
        self.send(AudioCommand::PlayBoop);
    }

    pub fn play_death_sound(&self) {
        self.send(AudioCommand::PlayDeathSound);
    }

    pub fn play_age_music(&self, age: PetAge) {
        self.send(AudioCommand::PlayAgeMusic { age });
    }

    pub fn stop_music(&self) {
        self.send(AudioCommand::StopMusic);
    }

    pub fn set_volume(&self, volume: f32) {
        self.send(AudioCommand::SetVolume(volume));
    }

    pub fn set_muted(&self, muted: bool) {
        self.send(AudioCommand::SetMuted(muted));
    }

    /// Current master level, after every previously sent command has been
    /// applied. 0 if the executor is gone.
    pub fn volume(&self) -> f32 {
        let (reply, rx) = bounded(1);
        if self.command_tx.send(AudioCommand::GetVolume { reply }).is_err() {
            return 0.0;
        }
        rx.recv().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::AudioContext;
    use crate::config::EngineConfig;

    fn offline_executor() -> AudioExecutor {
        AudioExecutor::spawn(|| {
            AudioEngine::from_context(AudioContext::offline(1000), EngineConfig::default())
        })
        .unwrap()
    }

    #[test]
    fn test_commands_apply_in_order() {
        let executor = offline_executor();
        let handle = executor.handle();

        assert_eq!(handle.volume(), 0.3);
        handle.set_volume(0.7);
        assert_eq!(handle.volume(), 0.7);
        handle.set_muted(true);
        assert_eq!(handle.volume(), 0.0);
        handle.set_muted(false);
        assert_eq!(handle.volume(), 0.3);

        executor.shutdown();
    }

    #[test]
    fn test_handle_from_other_thread() {
        let executor = offline_executor();
        let handle = executor.handle();

        let worker = thread::spawn(move || {
            handle.play_meow();
            handle.play_age_music(PetAge::Baby);
            handle.set_volume(2.0);
            handle.volume()
        });
        assert_eq!(worker.join().unwrap(), 1.0);

        executor.shutdown();
    }

    #[test]
    fn test_handle_after_shutdown() {
        let executor = offline_executor();
        let handle = executor.handle();
        executor.shutdown();

        handle.play_beep();
        assert_eq!(handle.volume(), 0.0);
    }

    #[test]
    fn test_degraded_engine_behind_executor() {
        let executor =
            AudioExecutor::spawn(|| AudioEngine::degraded(EngineConfig::default())).unwrap();
        let handle = executor.handle();
        handle.play_death_sound();
        handle.set_volume(0.5);
        assert_eq!(handle.volume(), 0.0);
    }
}
