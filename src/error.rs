use thiserror::Error;

/// Errors raised by the audio engine internals.
///
/// None of these reach callers of the engine's command surface: the engine
/// logs them and degrades. They exist so the lower layers (context, params,
/// config) can propagate with `?`.
#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Failed to initialize audio output stream")]
    StreamInitFailed(#[source] rodio::StreamError),

    #[error("Failed to start playback on the output stream")]
    PlaybackFailed(#[source] rodio::PlayError),

    #[error("Exponential ramp target must be strictly positive, got {value}")]
    NonPositiveRampTarget { value: f32 },

    #[error("Unknown pet age: {0}")]
    UnknownAge(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to create config directory: {path}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for audio operations
pub type AudioResult<T> = std::result::Result<T, AudioError>;

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;
